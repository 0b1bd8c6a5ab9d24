use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::{CliError, Context};

pub(crate) fn run_init(ctx: &Context, seed: Option<&Path>) -> Result<(), CliError> {
    let existed = ctx.db_path.exists();
    let conn = guildhall_db::open_database(&ctx.db_path).map_err(|e| {
        CliError::database(format!("Failed to create {}: {}", ctx.db_path.display(), e))
    })?;

    if existed {
        log::info!("Database already exists at {}", ctx.db_path.display());
    } else {
        log::info!(
            "{} {}",
            "Created".if_supports_color(Stdout, |t| t.green()),
            ctx.db_path.display(),
        );
    }

    if let Some(seed) = seed {
        seed_guild_from(&conn, seed)?;
    }
    Ok(())
}

pub(crate) fn run_seed(ctx: &Context, path: &Path) -> Result<(), CliError> {
    let conn = guildhall_db::open_database(&ctx.db_path).map_err(|e| {
        CliError::database(format!("Failed to open {}: {}", ctx.db_path.display(), e))
    })?;
    seed_guild_from(&conn, path)
}

fn seed_guild_from(conn: &rusqlite::Connection, path: &Path) -> Result<(), CliError> {
    let seed = guildhall_catalog::load_guild_seed(path).map_err(|e| CliError::seed(e.to_string()))?;
    let stats = guildhall_db::seed_guild(conn, &seed).map_err(|e| CliError::seed(e.to_string()))?;

    log::info!(
        "Seeded {} classes, {} players, {} events from {}",
        stats.classes,
        stats.players,
        stats.events,
        path.display(),
    );
    if stats.skipped_players > 0 {
        log::warn!(
            "Skipped {} players whose nickname already exists",
            stats.skipped_players
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seeding_twice_skips_existing_players() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "classes:\n  - name: Маг\nplayers:\n  - nickname: Игрок1\n    tag: \"#1000\"\n    class: Маг\n"
        )
        .unwrap();

        let conn = guildhall_db::open_memory().unwrap();
        seed_guild_from(&conn, file.path()).unwrap();
        seed_guild_from(&conn, file.path()).unwrap();

        assert_eq!(guildhall_db::list_players(&conn).unwrap().len(), 1);
        assert_eq!(guildhall_db::list_classes(&conn).unwrap().len(), 1);
    }

    #[test]
    fn missing_seed_file_is_a_seed_error() {
        let dir = tempfile::tempdir().unwrap();
        let conn = guildhall_db::open_memory().unwrap();
        let err = seed_guild_from(&conn, &dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, CliError::Seed(_)));
    }
}
