//! Shared application settings (database path, filter mode).
//!
//! The settings file is `~/.config/guildhall/settings.toml`. Database path
//! resolution is consistent across front ends:
//!
//! 1. Explicit override (the `--db` flag)
//! 2. The `GUILDHALL_DB` environment variable
//! 3. `database.path` in `settings.toml`
//! 4. [`DEFAULT_DB_PATH`], relative to the working directory

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::MatchMode;

/// Environment variable naming the database file.
pub const DB_ENV_VAR: &str = "GUILDHALL_DB";

/// Database location used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "data/guild.db";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DatabaseSettings {
    pub path: Option<PathBuf>,
    /// Database used by the flight-records commands.
    pub flights_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FilterSettings {
    #[serde(default)]
    pub mode: MatchMode,
}

/// Returns `~/.config/guildhall/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("guildhall").join("settings.toml")
}

/// Load settings from the standard location.
pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Load settings from disk, returning defaults if missing or corrupt.
pub fn load_settings_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Failed to parse settings at {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Save settings to the standard location.
pub fn save_settings(settings: &Settings) -> Result<(), SettingsError> {
    save_settings_to(&settings_path(), settings)
}

/// Save settings atomically (write to temp, then rename).
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_err = |source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let contents = toml::to_string_pretty(settings)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Resolve the guild database path from the flag, environment and settings.
pub fn resolve_db_path(cli_override: Option<PathBuf>, settings: &Settings) -> PathBuf {
    let env = std::env::var_os(DB_ENV_VAR).map(PathBuf::from);
    resolve_db_path_with(cli_override, env, settings)
}

/// Resolution chain with the environment lookup already done.
pub fn resolve_db_path_with(
    cli_override: Option<PathBuf>,
    env: Option<PathBuf>,
    settings: &Settings,
) -> PathBuf {
    cli_override
        .or(env.filter(|p| !p.as_os_str().is_empty()))
        .or_else(|| settings.database.path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}

/// Resolve the flight-records database path.
///
/// Defaults to `flights.db` next to the guild database.
pub fn resolve_flights_db_path(
    cli_override: Option<PathBuf>,
    settings: &Settings,
    guild_db: &Path,
) -> PathBuf {
    cli_override
        .or_else(|| settings.database.flights_path.clone())
        .unwrap_or_else(|| guild_db.with_file_name("flights.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_prefers_flag_then_env_then_settings() {
        let mut settings = Settings::default();
        settings.database.path = Some(PathBuf::from("from-settings.db"));

        assert_eq!(
            resolve_db_path_with(
                Some(PathBuf::from("flag.db")),
                Some(PathBuf::from("env.db")),
                &settings
            ),
            PathBuf::from("flag.db")
        );
        assert_eq!(
            resolve_db_path_with(None, Some(PathBuf::from("env.db")), &settings),
            PathBuf::from("env.db")
        );
        assert_eq!(
            resolve_db_path_with(None, Some(PathBuf::new()), &settings),
            PathBuf::from("from-settings.db")
        );
        assert_eq!(
            resolve_db_path_with(None, None, &Settings::default()),
            PathBuf::from(DEFAULT_DB_PATH)
        );
    }

    #[test]
    fn flights_path_resolution() {
        let guild = Path::new("srv/guild.db");
        let mut settings = Settings::default();
        assert_eq!(
            resolve_flights_db_path(None, &settings, guild),
            PathBuf::from("srv/flights.db")
        );

        settings.database.flights_path = Some(PathBuf::from("air/flights.db"));
        assert_eq!(
            resolve_flights_db_path(None, &settings, guild),
            PathBuf::from("air/flights.db")
        );
        assert_eq!(
            resolve_flights_db_path(Some(PathBuf::from("x/air.db")), &settings, guild),
            PathBuf::from("x/air.db")
        );
    }

    #[test]
    fn settings_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.database.path = Some(PathBuf::from("/srv/guild.db"));
        settings.filter.mode = MatchMode::All;
        save_settings_to(&path, &settings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("mode = \"all\""));
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn missing_or_corrupt_settings_fall_back_to_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        assert_eq!(load_settings_from(&path), Settings::default());

        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(load_settings_from(&path), Settings::default());
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "[filter]\nmode = \"all\"\n").unwrap();
        let settings = load_settings_from(&path);
        assert_eq!(settings.filter.mode, MatchMode::All);
        assert_eq!(settings.database.path, None);
    }
}
