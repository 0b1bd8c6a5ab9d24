//! SQLite schema creation and migration.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error creating {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("Migration error: {table} has {count} duplicate rows for {column}; resolve them first")]
    Duplicates {
        table: &'static str,
        column: &'static str,
        count: i64,
    },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 2;

/// Create all tables and indexes if they don't exist.
///
/// Idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(UNIQUE_INDEXES_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a guild database at the given path.
///
/// Creates the parent directory when missing. A database that predates
/// version tracking but already holds the guild tables is treated as
/// version 1 and migrated.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SchemaError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let mut version = get_schema_version(&conn)?;
    if version == 0 && table_exists(&conn, "Players")? {
        log::debug!("Untracked guild database at {}, assuming version 1", path.display());
        conn.execute_batch(VERSION_TABLE_SQL)?;
        set_schema_version(&conn, 1)?;
        version = 1;
    }

    if version == 0 {
        log::debug!("Creating guild schema at {}", path.display());
        create_schema(&conn)?;
    } else if version != CURRENT_VERSION {
        migrate(&conn, version)?;
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub(crate) fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Record a schema version.
pub(crate) fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
pub fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    let mut version = from_version;
    while version < CURRENT_VERSION {
        log::debug!("Migrating guild schema from version {version}");
        if version == 1 {
            ensure_unique(conn, "Players", "nickname")?;
            ensure_unique(conn, "Activity", "player_id")?;
            ensure_unique(conn, "GuildContribution", "player_id")?;
            conn.execute_batch(UNIQUE_INDEXES_SQL)?;
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

/// Refuse to add a unique index over a column that already holds duplicates.
fn ensure_unique(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
) -> Result<(), SchemaError> {
    let count: i64 = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM (SELECT {column} FROM {table}
             WHERE {column} IS NOT NULL GROUP BY {column} HAVING COUNT(*) > 1)"
        ),
        [],
        |row| row.get(0),
    )?;
    if count > 0 {
        return Err(SchemaError::Duplicates {
            table,
            column,
            count,
        });
    }
    Ok(())
}

const VERSION_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Version 1 tables. Table and column names are the on-disk contract.
const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Character classes (reference data)
CREATE TABLE IF NOT EXISTS Classes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS Players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nickname TEXT NOT NULL,
    tag TEXT NOT NULL,
    class_id INTEGER,
    level INTEGER,
    joined_date TEXT,
    guild_status TEXT,
    FOREIGN KEY (class_id) REFERENCES Classes(id)
);

CREATE TABLE IF NOT EXISTS EventParticipation (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER,
    event_date TEXT,
    participated INTEGER CHECK(participated IN (0, 1)),
    FOREIGN KEY (player_id) REFERENCES Players(id)
);
CREATE INDEX IF NOT EXISTS idx_events_player ON EventParticipation(player_id);

CREATE TABLE IF NOT EXISTS Activity (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER,
    weekly_damage INTEGER,
    raid_participation INTEGER,
    weekly_crafts INTEGER,
    FOREIGN KEY (player_id) REFERENCES Players(id)
);

CREATE TABLE IF NOT EXISTS GuildContribution (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER,
    resources_contributed INTEGER,
    help_count INTEGER,
    leadership_rank TEXT,
    FOREIGN KEY (player_id) REFERENCES Players(id)
);
"#;

/// Version 2: one activity/contribution row per player, unique nicknames.
const UNIQUE_INDEXES_SQL: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_players_nickname ON Players(nickname);
CREATE UNIQUE INDEX IF NOT EXISTS idx_activity_player ON Activity(player_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_contribution_player ON GuildContribution(player_id);
"#;
