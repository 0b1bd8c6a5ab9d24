//! CRUD operations for players and their dependent rows.
//!
//! Every function takes the connection explicitly. Multi-statement
//! operations (cascade delete, upserts, the detail-form save) run inside a
//! single transaction; dropping the transaction on an error path rolls it
//! back, so a failure leaves the database in its pre-operation state.

use guildhall_catalog::types::*;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("A player with nickname '{0}' already exists")]
    DuplicateNickname(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<rusqlite::Error> for OperationError {
    fn from(e: rusqlite::Error) -> Self {
        if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
            OperationError::Constraint(e.to_string())
        } else {
            OperationError::Sqlite(e)
        }
    }
}

impl OperationError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Player Operations ───────────────────────────────────────────────────────

/// Create a player. Returns the generated ID.
///
/// Nickname and tag must be non-empty; a duplicate nickname is rejected
/// before anything is written.
pub fn create_player(conn: &Connection, player: &NewPlayer) -> Result<i64, OperationError> {
    insert_player(conn, player)
}

fn insert_player(conn: &Connection, player: &NewPlayer) -> Result<i64, OperationError> {
    let nickname = require_text("nickname", &player.nickname)?;
    let tag = require_text("tag", &player.tag)?;
    ensure_nickname_free(conn, nickname, None)?;

    conn.execute(
        "INSERT INTO Players (nickname, tag, class_id, level, joined_date, guild_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            nickname,
            tag,
            player.class_id,
            player.level,
            player.joined_date,
            player.guild_status,
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("Created player {id} ({nickname})");
    Ok(id)
}

/// Update only the supplied fields of a player.
pub fn update_player(
    conn: &Connection,
    id: i64,
    update: &PlayerUpdate,
) -> Result<(), OperationError> {
    if update.is_empty() {
        return Err(OperationError::validation("no fields to update"));
    }

    let mut fields = Assignments::default();
    if let Some(nickname) = &update.nickname {
        let nickname = require_text("nickname", nickname)?;
        ensure_nickname_free(conn, nickname, Some(id))?;
        fields.set("nickname", nickname.to_string());
    }
    if let Some(tag) = &update.tag {
        fields.set("tag", require_text("tag", tag)?.to_string());
    }
    if let Some(class_id) = update.class_id {
        fields.set("class_id", class_id);
    }
    fields.set_opt("level", update.level);
    fields.set_opt("joined_date", update.joined_date.clone());
    fields.set_opt("guild_status", update.guild_status.clone());

    let changed = fields.update(conn, "Players", "id", id)?;
    if changed == 0 {
        return Err(OperationError::not_found("player", id));
    }
    Ok(())
}

/// Fetch a player together with its class name.
pub fn get_player(conn: &Connection, id: i64) -> Result<Option<PlayerInfo>, OperationError> {
    conn.query_row(
        "SELECT p.id, p.nickname, p.tag, p.class_id, p.level, p.joined_date,
                p.guild_status, c.name
         FROM Players p
         LEFT JOIN Classes c ON p.class_id = c.id
         WHERE p.id = ?1",
        params![id],
        |row| {
            Ok(PlayerInfo {
                player: Player {
                    id: row.get(0)?,
                    nickname: row.get(1)?,
                    tag: row.get(2)?,
                    class_id: row.get(3)?,
                    level: row.get(4)?,
                    joined_date: row.get(5)?,
                    guild_status: row.get(6)?,
                },
                class_name: row.get(7)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// Find a player ID by exact nickname.
pub fn find_player_by_nickname(
    conn: &Connection,
    nickname: &str,
) -> Result<Option<i64>, OperationError> {
    conn.query_row(
        "SELECT id FROM Players WHERE nickname = ?1",
        params![nickname],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Delete a player and every row that references it, atomically.
///
/// Event participation, activity and contribution rows go first, then the
/// player itself. If the player does not exist the transaction is rolled
/// back and `NotFound` is returned.
pub fn delete_player(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;

    let events = tx.execute(
        "DELETE FROM EventParticipation WHERE player_id = ?1",
        params![id],
    )?;
    let activity = tx.execute("DELETE FROM Activity WHERE player_id = ?1", params![id])?;
    let contribution = tx.execute(
        "DELETE FROM GuildContribution WHERE player_id = ?1",
        params![id],
    )?;
    let players = tx.execute("DELETE FROM Players WHERE id = ?1", params![id])?;

    if players == 0 {
        tx.rollback()?;
        return Err(OperationError::not_found("player", id));
    }

    tx.commit()?;
    log::debug!(
        "Deleted player {id} with {events} events, {activity} activity and {contribution} contribution rows"
    );
    Ok(())
}

/// Create or update a player together with its activity and contribution,
/// as the player detail form does on save. Returns the player ID.
pub fn save_player(
    conn: &Connection,
    id: Option<i64>,
    form: &PlayerForm,
) -> Result<i64, OperationError> {
    let tx = conn.unchecked_transaction()?;

    let id = match id {
        Some(id) => {
            let update = PlayerUpdate {
                nickname: Some(form.player.nickname.clone()),
                tag: Some(form.player.tag.clone()),
                class_id: Some(form.player.class_id),
                level: form.player.level,
                joined_date: form.player.joined_date.clone(),
                guild_status: form.player.guild_status.clone(),
            };
            update_player(&tx, id, &update)?;
            id
        }
        None => insert_player(&tx, &form.player)?,
    };

    if !form.activity.is_empty() {
        write_activity(&tx, id, &form.activity)?;
    }
    if !form.contribution.is_empty() {
        write_contribution(&tx, id, &form.contribution)?;
    }

    tx.commit()?;
    Ok(id)
}

// ── Activity / Contribution ─────────────────────────────────────────────────

/// Fetch a player's activity row.
pub fn get_player_activity(
    conn: &Connection,
    player_id: i64,
) -> Result<Option<Activity>, OperationError> {
    conn.query_row(
        "SELECT id, player_id, weekly_damage, raid_participation, weekly_crafts
         FROM Activity WHERE player_id = ?1",
        params![player_id],
        |row| {
            Ok(Activity {
                id: row.get(0)?,
                player_id: row.get(1)?,
                weekly_damage: row.get(2)?,
                raid_participation: row.get(3)?,
                weekly_crafts: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// Fetch a player's guild contribution row.
pub fn get_player_contribution(
    conn: &Connection,
    player_id: i64,
) -> Result<Option<GuildContribution>, OperationError> {
    conn.query_row(
        "SELECT id, player_id, resources_contributed, help_count, leadership_rank
         FROM GuildContribution WHERE player_id = ?1",
        params![player_id],
        |row| {
            Ok(GuildContribution {
                id: row.get(0)?,
                player_id: row.get(1)?,
                resources_contributed: row.get(2)?,
                help_count: row.get(3)?,
                leadership_rank: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// Insert or update a player's activity. Only supplied fields are written.
pub fn upsert_activity(
    conn: &Connection,
    player_id: i64,
    fields: &ActivityFields,
) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    write_activity(&tx, player_id, fields)?;
    tx.commit()?;
    Ok(())
}

/// Insert or update a player's contribution. Only supplied fields are written.
pub fn upsert_contribution(
    conn: &Connection,
    player_id: i64,
    fields: &ContributionFields,
) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    write_contribution(&tx, player_id, fields)?;
    tx.commit()?;
    Ok(())
}

pub(crate) fn write_activity(
    conn: &Connection,
    player_id: i64,
    fields: &ActivityFields,
) -> Result<(), OperationError> {
    let mut values = Assignments::default();
    values.set_opt("weekly_damage", fields.weekly_damage);
    values.set_opt("raid_participation", fields.raid_participation);
    values.set_opt("weekly_crafts", fields.weekly_crafts);
    upsert_child(conn, "Activity", player_id, values)
}

pub(crate) fn write_contribution(
    conn: &Connection,
    player_id: i64,
    fields: &ContributionFields,
) -> Result<(), OperationError> {
    let mut values = Assignments::default();
    values.set_opt("resources_contributed", fields.resources_contributed);
    values.set_opt("help_count", fields.help_count);
    values.set_opt("leadership_rank", fields.leadership_rank.clone());
    upsert_child(conn, "GuildContribution", player_id, values)
}

/// Update the player's row in a one-per-player table, or insert it.
fn upsert_child(
    conn: &Connection,
    table: &'static str,
    player_id: i64,
    mut values: Assignments,
) -> Result<(), OperationError> {
    ensure_player_exists(conn, player_id)?;

    let existing: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {table} WHERE player_id = ?1"),
            params![player_id],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(_) if values.is_empty() => {}
        Some(_) => {
            values.update(conn, table, "player_id", player_id)?;
        }
        None => {
            values.set("player_id", player_id);
            values.insert(conn, table)?;
        }
    }
    Ok(())
}

// ── Event Participation ─────────────────────────────────────────────────────

/// Record a player's participation in an event. Returns the generated ID.
pub fn add_event(
    conn: &Connection,
    player_id: i64,
    event_date: &str,
    participated: bool,
) -> Result<i64, OperationError> {
    ensure_player_exists(conn, player_id)?;
    conn.execute(
        "INSERT INTO EventParticipation (player_id, event_date, participated)
         VALUES (?1, ?2, ?3)",
        params![player_id, event_date, participated],
    )?;
    Ok(conn.last_insert_rowid())
}

/// A player's most recent events, newest first.
pub fn player_events(
    conn: &Connection,
    player_id: i64,
    limit: Option<u32>,
) -> Result<Vec<EventParticipation>, OperationError> {
    let limit = limit.unwrap_or(10);
    let mut stmt = conn.prepare(
        "SELECT id, player_id, event_date, participated
         FROM EventParticipation WHERE player_id = ?1
         ORDER BY event_date DESC, id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![player_id, limit], |row| {
        Ok(EventParticipation {
            id: row.get(0)?,
            player_id: row.get(1)?,
            event_date: row.get(2)?,
            participated: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Delete a single event participation row.
pub fn delete_event(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let changed = conn.execute(
        "DELETE FROM EventParticipation WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found("event", id));
    }
    Ok(())
}

// ── Class Operations ────────────────────────────────────────────────────────

/// List all classes by name.
pub fn list_classes(conn: &Connection) -> Result<Vec<Class>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM Classes ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Class {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Insert a class. Returns the generated ID.
pub fn insert_class(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
) -> Result<i64, OperationError> {
    let name = require_text("class name", name)?;
    conn.execute(
        "INSERT INTO Classes (name, description) VALUES (?1, ?2)",
        params![name, description],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Rename a class and replace its description.
pub fn update_class(
    conn: &Connection,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<(), OperationError> {
    let name = require_text("class name", name)?;
    let changed = conn.execute(
        "UPDATE Classes SET name = ?2, description = ?3 WHERE id = ?1",
        params![id, name, description],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found("class", id));
    }
    Ok(())
}

/// Delete a class. Fails with `Constraint` while players still reference it.
pub fn delete_class(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let changed = conn.execute("DELETE FROM Classes WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(OperationError::not_found("class", id));
    }
    Ok(())
}

/// Find a class ID by name (case-insensitive).
pub fn find_class_by_name(conn: &Connection, name: &str) -> Result<Option<i64>, OperationError> {
    conn.query_row(
        "SELECT id FROM Classes WHERE LOWER(name) = LOWER(?1) ORDER BY id LIMIT 1",
        params![name.trim()],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Column/value pairs for a dynamic INSERT or UPDATE.
///
/// Column names only ever come from string literals in this crate; values
/// are always bound as parameters.
#[derive(Debug, Default)]
pub(crate) struct Assignments {
    columns: Vec<&'static str>,
    values: Vec<Value>,
}

impl Assignments {
    pub(crate) fn set(&mut self, column: &'static str, value: impl Into<Value>) {
        self.columns.push(column);
        self.values.push(value.into());
    }

    pub(crate) fn set_opt<T: Into<Value>>(&mut self, column: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.set(column, value);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `UPDATE table SET … WHERE key = ?`. Returns the number of changed rows.
    pub(crate) fn update(
        self,
        conn: &Connection,
        table: &'static str,
        key: &'static str,
        key_value: i64,
    ) -> Result<usize, OperationError> {
        let set = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} SET {set} WHERE {key} = ?{}",
            self.columns.len() + 1
        );
        let mut values = self.values;
        values.push(Value::Integer(key_value));
        Ok(conn.execute(&sql, params_from_iter(values))?)
    }

    /// `INSERT INTO table (…) VALUES (…)`. Returns the new row ID.
    pub(crate) fn insert(self, conn: &Connection, table: &'static str) -> Result<i64, OperationError> {
        let placeholders = (1..=self.columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            self.columns.join(", ")
        );
        conn.execute(&sql, params_from_iter(self.values))?;
        Ok(conn.last_insert_rowid())
    }
}

fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, OperationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OperationError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

fn ensure_nickname_free(
    conn: &Connection,
    nickname: &str,
    except_id: Option<i64>,
) -> Result<(), OperationError> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM Players WHERE nickname = ?1 AND id IS NOT ?2)",
        params![nickname, except_id],
        |row| row.get(0),
    )?;
    if taken {
        return Err(OperationError::DuplicateNickname(nickname.to_string()));
    }
    Ok(())
}

pub(crate) fn ensure_player_exists(conn: &Connection, player_id: i64) -> Result<(), OperationError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM Players WHERE id = ?1)",
        params![player_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(OperationError::not_found("player", player_id));
    }
    Ok(())
}
