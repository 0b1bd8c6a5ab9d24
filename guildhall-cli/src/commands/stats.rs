use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::{CliError, Context};

use super::open_guild;

pub(crate) fn run_stats(ctx: &Context) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let stats = guildhall_db::guild_stats(&conn)?;

    log::info!(
        "{}",
        "Guild Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", ctx.db_path.display());
    crate::log_blank();
    log::info!(
        "  Players:        {:>8} ({} active)",
        stats.players,
        stats.active_players
    );
    log::info!("  Classes:        {:>8}", stats.classes);
    log::info!("  Activity rows:  {:>8}", stats.activity_rows);
    log::info!("  Contributions:  {:>8}", stats.contribution_rows);
    log::info!("  Events:         {:>8}", stats.events);

    Ok(())
}
