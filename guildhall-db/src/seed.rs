//! Load demo data documents into the guild and flight databases.
//!
//! Each seed runs in one transaction. Rows that already exist (same class
//! name, player nickname, airline name, aircraft model, airport code or
//! status name) are left untouched, so seeding twice is harmless.

use guildhall_catalog::types::*;
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::flights::{insert_flight, lookup_id};
use crate::operations::{
    add_event, create_player, find_class_by_name, find_player_by_nickname, insert_class,
    write_activity, write_contribution, OperationError,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error("{owner} refers to unknown {kind} '{name}'")]
    UnknownReference {
        kind: &'static str,
        name: String,
        owner: String,
    },
}

impl From<rusqlite::Error> for SeedError {
    fn from(e: rusqlite::Error) -> Self {
        SeedError::Operation(e.into())
    }
}

/// What a guild seed inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedStats {
    pub classes: usize,
    pub players: usize,
    pub events: usize,
    pub skipped_players: usize,
}

/// Insert classes, then players with their activity, contribution and
/// event history.
pub fn seed_guild(conn: &Connection, seed: &GuildSeed) -> Result<SeedStats, SeedError> {
    let tx = conn.unchecked_transaction()?;
    let mut stats = SeedStats::default();

    for class in &seed.classes {
        if find_class_by_name(&tx, &class.name)?.is_none() {
            insert_class(&tx, &class.name, class.description.as_deref())?;
            stats.classes += 1;
        }
    }

    for player in &seed.players {
        if find_player_by_nickname(&tx, &player.nickname)?.is_some() {
            log::debug!("Seed: player '{}' already exists, skipping", player.nickname);
            stats.skipped_players += 1;
            continue;
        }

        let class_id = match &player.class {
            Some(name) => Some(find_class_by_name(&tx, name)?.ok_or_else(|| {
                SeedError::UnknownReference {
                    kind: "class",
                    name: name.clone(),
                    owner: format!("player '{}'", player.nickname),
                }
            })?),
            None => None,
        };

        let id = create_player(
            &tx,
            &NewPlayer {
                nickname: player.nickname.clone(),
                tag: player.tag.clone(),
                class_id,
                level: player.level,
                joined_date: player.joined_date.clone(),
                guild_status: player.guild_status.clone(),
            },
        )?;

        if let Some(activity) = player.activity.as_ref().filter(|a| !a.is_empty()) {
            write_activity(&tx, id, activity)?;
        }
        if let Some(contribution) = player.contribution.as_ref().filter(|c| !c.is_empty()) {
            write_contribution(&tx, id, contribution)?;
        }
        for event in &player.events {
            add_event(&tx, id, &event.date, event.participated)?;
            stats.events += 1;
        }
        stats.players += 1;
    }

    tx.commit()?;
    log::debug!("Guild seed: {stats:?}");
    Ok(stats)
}

/// What a flight seed inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlightSeedStats {
    pub airlines: usize,
    pub aircraft_types: usize,
    pub airports: usize,
    pub statuses: usize,
    pub flights: usize,
}

/// Insert reference data, then flights resolved by natural key.
pub fn seed_flights(conn: &Connection, seed: &FlightSeed) -> Result<FlightSeedStats, SeedError> {
    let tx = conn.unchecked_transaction()?;
    let mut stats = FlightSeedStats::default();

    for airline in &seed.airlines {
        stats.airlines += tx.execute(
            "INSERT OR IGNORE INTO airlines (name, country) VALUES (?1, ?2)",
            params![airline.name, airline.country],
        )?;
    }
    for aircraft in &seed.aircraft_types {
        stats.aircraft_types += tx.execute(
            "INSERT OR IGNORE INTO aircraft_types (model, manufacturer, capacity)
             VALUES (?1, ?2, ?3)",
            params![aircraft.model, aircraft.manufacturer, aircraft.capacity],
        )?;
    }
    for airport in &seed.airports {
        stats.airports += tx.execute(
            "INSERT OR IGNORE INTO airports (name, city, country, code) VALUES (?1, ?2, ?3, ?4)",
            params![
                airport.name,
                airport.city,
                airport.country,
                airport.code.trim().to_ascii_uppercase()
            ],
        )?;
    }
    for status in &seed.statuses {
        stats.statuses += tx.execute(
            "INSERT OR IGNORE INTO statuses (name) VALUES (?1)",
            params![status],
        )?;
    }

    for flight in &seed.flights {
        let owner = format!("flight {}", flight.flight_number);
        let resolve = |kind: &'static str,
                       table: &'static str,
                       column: &'static str,
                       key: Option<&String>|
         -> Result<Option<i64>, SeedError> {
            let Some(key) = key else {
                return Ok(None);
            };
            let key = if column == "code" {
                key.trim().to_ascii_uppercase()
            } else {
                key.clone()
            };
            match lookup_id(&tx, table, column, &key)? {
                Some(id) => Ok(Some(id)),
                None => Err(SeedError::UnknownReference {
                    kind,
                    name: key,
                    owner: owner.clone(),
                }),
            }
        };

        let row = Flight {
            id: 0,
            flight_number: flight.flight_number.clone(),
            airline_id: resolve("airline", "airlines", "name", flight.airline.as_ref())?,
            aircraft_type_id: resolve(
                "aircraft type",
                "aircraft_types",
                "model",
                flight.aircraft.as_ref(),
            )?,
            departure_airport_id: resolve("airport", "airports", "code", flight.from.as_ref())?,
            arrival_airport_id: resolve("airport", "airports", "code", flight.to.as_ref())?,
            departure_time: flight.departure_time.clone(),
            arrival_time: flight.arrival_time.clone(),
            status_id: resolve("status", "statuses", "name", flight.status.as_ref())?,
            gate: flight.gate.clone(),
        };
        insert_flight(&tx, &row)?;
        stats.flights += 1;
    }

    tx.commit()?;
    log::debug!("Flight seed: {stats:?}");
    Ok(stats)
}
