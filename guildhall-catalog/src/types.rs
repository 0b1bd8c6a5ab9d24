//! Data model types for the guild database.
//!
//! These types mirror the persistent schema: classes, players, activity,
//! guild contribution, event participation, and the flight-records variant.
//! Row types carry the database id; `New*`, `*Update` and `*Fields` types
//! carry user input on its way into the database.

use serde::{Deserialize, Serialize};

/// Rank shown for players that have no contribution row yet.
pub const DEFAULT_RANK: &str = "Участник";

/// Status assigned to players created without one.
pub const DEFAULT_STATUS: &str = "Активен";

// ── Class ───────────────────────────────────────────────────────────────────

/// A character class (reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ── Player ──────────────────────────────────────────────────────────────────

/// A stored player row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub nickname: String,
    pub tag: String,
    pub class_id: Option<i64>,
    pub level: Option<i64>,
    pub joined_date: Option<String>,
    pub guild_status: Option<String>,
}

/// A player together with the name of its class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    #[serde(flatten)]
    pub player: Player,
    pub class_name: Option<String>,
}

/// Input for creating a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub nickname: String,
    pub tag: String,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub joined_date: Option<String>,
    #[serde(default)]
    pub guild_status: Option<String>,
}

/// Partial update of a player. `None` leaves the column untouched.
///
/// `class_id` is doubly optional: `Some(None)` clears the class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub nickname: Option<String>,
    pub tag: Option<String>,
    pub class_id: Option<Option<i64>>,
    pub level: Option<i64>,
    pub joined_date: Option<String>,
    pub guild_status: Option<String>,
}

impl PlayerUpdate {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.tag.is_none()
            && self.class_id.is_none()
            && self.level.is_none()
            && self.joined_date.is_none()
            && self.guild_status.is_none()
    }
}

/// Everything the player detail form edits at once: the player row plus
/// its activity and contribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerForm {
    pub player: NewPlayer,
    pub activity: ActivityFields,
    pub contribution: ContributionFields,
}

/// One row of the detailed player view (players joined with class,
/// activity and contribution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOverview {
    pub id: i64,
    pub nickname: String,
    pub tag: String,
    pub class_name: Option<String>,
    pub level: Option<i64>,
    pub joined_date: Option<String>,
    pub guild_status: Option<String>,
    pub weekly_damage: i64,
    pub raid_participation: i64,
    pub leadership_rank: String,
    pub resources_contributed: i64,
}

// ── Activity ────────────────────────────────────────────────────────────────

/// Weekly activity of a player (at most one row per player).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub player_id: i64,
    pub weekly_damage: Option<i64>,
    pub raid_participation: Option<i64>,
    pub weekly_crafts: Option<i64>,
}

/// Fields supplied to an activity upsert. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFields {
    #[serde(default)]
    pub weekly_damage: Option<i64>,
    #[serde(default)]
    pub raid_participation: Option<i64>,
    #[serde(default)]
    pub weekly_crafts: Option<i64>,
}

impl ActivityFields {
    pub fn is_empty(&self) -> bool {
        self.weekly_damage.is_none()
            && self.raid_participation.is_none()
            && self.weekly_crafts.is_none()
    }
}

// ── Guild Contribution ──────────────────────────────────────────────────────

/// A player's contribution to the guild (at most one row per player).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildContribution {
    pub id: i64,
    pub player_id: i64,
    pub resources_contributed: Option<i64>,
    pub help_count: Option<i64>,
    pub leadership_rank: Option<String>,
}

/// Fields supplied to a contribution upsert. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionFields {
    #[serde(default)]
    pub resources_contributed: Option<i64>,
    #[serde(default)]
    pub help_count: Option<i64>,
    #[serde(default)]
    pub leadership_rank: Option<String>,
}

impl ContributionFields {
    pub fn is_empty(&self) -> bool {
        self.resources_contributed.is_none()
            && self.help_count.is_none()
            && self.leadership_rank.is_none()
    }
}

// ── Event Participation ─────────────────────────────────────────────────────

/// Whether a player took part in a guild event on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParticipation {
    pub id: i64,
    pub player_id: i64,
    pub event_date: Option<String>,
    pub participated: bool,
}

// ── Flights ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftType {
    pub id: i64,
    pub model: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// A flight status (reference data, e.g. "On Time").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightStatus {
    pub id: i64,
    pub name: String,
}

/// A stored flight row, referencing its reference data by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    pub airline_id: Option<i64>,
    pub aircraft_type_id: Option<i64>,
    pub departure_airport_id: Option<i64>,
    pub arrival_airport_id: Option<i64>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub status_id: Option<i64>,
    pub gate: Option<String>,
}

/// A flight joined with the display names of its references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRow {
    pub id: i64,
    pub flight_number: String,
    pub airline: Option<String>,
    pub aircraft: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub status: Option<String>,
    pub gate: Option<String>,
}

// ── Seed Data ───────────────────────────────────────────────────────────────

/// Demo data for the guild database, loaded from YAML.
///
/// Players refer to their class by name; events, activity and contribution
/// are nested under the player they belong to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuildSeed {
    #[serde(default)]
    pub classes: Vec<SeedClass>,
    #[serde(default)]
    pub players: Vec<SeedPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedClass {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPlayer {
    pub nickname: String,
    pub tag: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub joined_date: Option<String>,
    #[serde(default)]
    pub guild_status: Option<String>,
    #[serde(default)]
    pub activity: Option<ActivityFields>,
    #[serde(default)]
    pub contribution: Option<ContributionFields>,
    #[serde(default)]
    pub events: Vec<SeedEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEvent {
    pub date: String,
    pub participated: bool,
}

/// Demo data for the flight-records database, loaded from YAML.
///
/// Flights refer to airlines by name, aircraft by model, airports by code
/// and statuses by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightSeed {
    #[serde(default)]
    pub airlines: Vec<SeedAirline>,
    #[serde(default)]
    pub aircraft_types: Vec<SeedAircraftType>,
    #[serde(default)]
    pub airports: Vec<SeedAirport>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub flights: Vec<SeedFlight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAirline {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAircraftType {
    pub model: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAirport {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFlight {
    pub flight_number: String,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub aircraft: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gate: Option<String>,
}
