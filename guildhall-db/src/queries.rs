//! Read queries for the guild database.
//!
//! Typed listings, the generic display tables consumed by the row filter,
//! and summary statistics.

use std::fmt;
use std::str::FromStr;

use guildhall_catalog::types::*;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};

use crate::operations::OperationError;

/// The detailed player overview: every player with class name, activity and
/// contribution folded in. Missing rows read as zero or the default rank.
pub(crate) const PLAYER_OVERVIEW_SQL: &str = "
    SELECT p.id, p.nickname, p.tag, c.name AS class_name, p.level, p.joined_date,
           p.guild_status,
           COALESCE(a.weekly_damage, 0) AS weekly_damage,
           COALESCE(a.raid_participation, 0) AS raid_participation,
           COALESCE(gc.leadership_rank, 'Участник') AS leadership_rank,
           COALESCE(gc.resources_contributed, 0) AS resources_contributed
    FROM Players p
    LEFT JOIN Classes c ON p.class_id = c.id
    LEFT JOIN Activity a ON p.id = a.player_id
    LEFT JOIN GuildContribution gc ON p.id = gc.player_id";

// ── Display Tables ──────────────────────────────────────────────────────────

/// Column names plus rows of optional text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl DisplayTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Run a query and render every cell as display text.
pub(crate) fn fetch_display(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<DisplayTable, OperationError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();
    let rows = stmt.query_map(params, |row| {
        (0..width).map(|i| cell_text(row, i)).collect::<Result<Vec<_>, _>>()
    })?;
    let rows = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(DisplayTable { columns, rows })
}

fn cell_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(format!("<{} bytes>", b.len())),
    })
}

// ── Player Views ────────────────────────────────────────────────────────────

/// The two player list layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerView {
    /// Raw `Players` columns.
    #[default]
    Simple,
    /// The joined overview with class, activity and contribution.
    Detailed,
}

impl PlayerView {
    /// Columns searched by the unified search box in this view.
    pub fn search_columns(self) -> &'static [usize] {
        match self {
            // nickname, tag, guild_status
            PlayerView::Simple => &[1, 2, 6],
            // nickname, tag, class_name, guild_status, leadership_rank
            PlayerView::Detailed => &[1, 2, 3, 6, 9],
        }
    }
}

/// Fetch the player list for a view as a display table.
pub fn player_rows(conn: &Connection, view: PlayerView) -> Result<DisplayTable, OperationError> {
    match view {
        PlayerView::Simple => fetch_display(
            conn,
            "SELECT id, nickname, tag, class_id, level, joined_date, guild_status
             FROM Players ORDER BY id",
            [],
        ),
        PlayerView::Detailed => fetch_display(
            conn,
            &format!("SELECT * FROM ({PLAYER_OVERVIEW_SQL}) ORDER BY nickname"),
            [],
        ),
    }
}

/// List all players ordered by ID.
pub fn list_players(conn: &Connection) -> Result<Vec<Player>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, nickname, tag, class_id, level, joined_date, guild_status
         FROM Players ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Player {
            id: row.get(0)?,
            nickname: row.get(1)?,
            tag: row.get(2)?,
            class_id: row.get(3)?,
            level: row.get(4)?,
            joined_date: row.get(5)?,
            guild_status: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Typed overview rows ordered by nickname.
pub fn list_player_overview(conn: &Connection) -> Result<Vec<PlayerOverview>, OperationError> {
    let sql = format!("SELECT * FROM ({PLAYER_OVERVIEW_SQL}) ORDER BY nickname");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_overview)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Reference Tables ────────────────────────────────────────────────────────

/// Tables editable through the generic reference viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTable {
    Classes,
    Activity,
    GuildContribution,
    EventParticipation,
}

impl ReferenceTable {
    pub const ALL: [ReferenceTable; 4] = [
        ReferenceTable::Classes,
        ReferenceTable::Activity,
        ReferenceTable::GuildContribution,
        ReferenceTable::EventParticipation,
    ];

    /// On-disk table name.
    pub fn table_name(self) -> &'static str {
        match self {
            ReferenceTable::Classes => "Classes",
            ReferenceTable::Activity => "Activity",
            ReferenceTable::GuildContribution => "GuildContribution",
            ReferenceTable::EventParticipation => "EventParticipation",
        }
    }

    fn entity_name(self) -> &'static str {
        match self {
            ReferenceTable::Classes => "class",
            ReferenceTable::Activity => "activity",
            ReferenceTable::GuildContribution => "contribution",
            ReferenceTable::EventParticipation => "event",
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown table '{0}' (expected classes, activity, contribution or events)")]
pub struct UnknownTable(pub String);

impl FromStr for ReferenceTable {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classes" | "class" => Ok(ReferenceTable::Classes),
            "activity" => Ok(ReferenceTable::Activity),
            "contribution" | "guildcontribution" => Ok(ReferenceTable::GuildContribution),
            "events" | "event" | "eventparticipation" => Ok(ReferenceTable::EventParticipation),
            _ => Err(UnknownTable(s.to_string())),
        }
    }
}

/// Fetch every row of a reference table, ordered by ID.
pub fn fetch_table(conn: &Connection, table: ReferenceTable) -> Result<DisplayTable, OperationError> {
    fetch_display(
        conn,
        &format!("SELECT * FROM {} ORDER BY id", table.table_name()),
        [],
    )
}

/// Delete one row of a reference table by ID.
///
/// Deleting a class still referenced by players fails with `Constraint`.
pub fn delete_reference_row(
    conn: &Connection,
    table: ReferenceTable,
    id: i64,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", table.table_name()),
        params![id],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found(table.entity_name(), id));
    }
    Ok(())
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Get row counts for the status bar.
pub fn guild_stats(conn: &Connection) -> Result<GuildStats, OperationError> {
    let count = |table: &str| -> Result<i64, OperationError> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
    };
    let active: i64 = conn.query_row(
        "SELECT COUNT(*) FROM Players WHERE guild_status = ?1",
        params![DEFAULT_STATUS],
        |r| r.get(0),
    )?;

    Ok(GuildStats {
        players: count("Players")?,
        active_players: active,
        classes: count("Classes")?,
        activity_rows: count("Activity")?,
        contribution_rows: count("GuildContribution")?,
        events: count("EventParticipation")?,
    })
}

/// Summary statistics for the guild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuildStats {
    pub players: i64,
    pub active_players: i64,
    pub classes: i64,
    pub activity_rows: i64,
    pub contribution_rows: i64,
    pub events: i64,
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

pub(crate) fn row_to_overview(row: &Row<'_>) -> rusqlite::Result<PlayerOverview> {
    Ok(PlayerOverview {
        id: row.get(0)?,
        nickname: row.get(1)?,
        tag: row.get(2)?,
        class_name: row.get(3)?,
        level: row.get(4)?,
        joined_date: row.get(5)?,
        guild_status: row.get(6)?,
        weekly_damage: row.get(7)?,
        raid_participation: row.get(8)?,
        leadership_rank: row.get(9)?,
        resources_contributed: row.get(10)?,
    })
}
