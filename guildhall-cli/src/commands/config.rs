use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use guildhall_core::settings::{settings_path, DB_ENV_VAR};
use guildhall_core::{load_settings, save_settings, MatchMode, Settings};

use crate::{CliError, Context};

/// Show effective settings and where each value comes from.
pub(crate) fn run_config_show(ctx: &Context) {
    let path = settings_path();

    log::info!(
        "{}",
        "Guildhall Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let db_source = if std::env::var_os(DB_ENV_VAR).is_some_and(|v| !v.is_empty()) {
        DB_ENV_VAR
    } else if ctx.settings.database.path.is_some() {
        "settings"
    } else {
        "default"
    };
    log::info!(
        "  Guild database:   {} {}",
        ctx.db_path.display(),
        format!("({db_source})").if_supports_color(Stdout, |t| t.dimmed()),
    );

    let flights_source = if ctx.settings.database.flights_path.is_some() {
        "settings"
    } else {
        "next to guild database"
    };
    log::info!(
        "  Flight database:  {} {}",
        ctx.flights_db_path(None).display(),
        format!("({flights_source})").if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("  Filter mode:      {}", ctx.settings.filter.mode);
}

pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

pub(crate) fn run_config_set_db(path: PathBuf) -> Result<(), CliError> {
    update_settings(|s| s.database.path = Some(path))?;
    log::info!("Guild database path saved.");
    Ok(())
}

pub(crate) fn run_config_set_flights_db(path: PathBuf) -> Result<(), CliError> {
    update_settings(|s| s.database.flights_path = Some(path))?;
    log::info!("Flight database path saved.");
    Ok(())
}

pub(crate) fn run_config_set_mode(mode: MatchMode) -> Result<(), CliError> {
    update_settings(|s| s.filter.mode = mode)?;
    log::info!("Default filter mode is now '{mode}'.");
    Ok(())
}

fn update_settings(change: impl FnOnce(&mut Settings)) -> Result<(), CliError> {
    let mut settings = load_settings();
    change(&mut settings);
    save_settings(&settings).map_err(|e| CliError::config(e.to_string()))?;
    log::debug!("Wrote {}", settings_path().display());
    Ok(())
}
