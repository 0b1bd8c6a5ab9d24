//! Flight-records database: schema, record access and search.
//!
//! A separate SQLite file from the guild database, sharing the same query
//! builder. Flights have no cascade delete; removing referenced reference
//! data fails with `Constraint`.

use std::path::Path;

use guildhall_catalog::types::*;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::operations::OperationError;
use crate::schema::SchemaError;
use crate::search::{DateRange, SearchClause, WhereBuilder, DATETIME_DOMAIN};

const FLIGHT_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS airlines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    country TEXT
);

CREATE TABLE IF NOT EXISTS aircraft_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model TEXT NOT NULL UNIQUE,
    manufacturer TEXT,
    capacity INTEGER
);

CREATE TABLE IF NOT EXISTS airports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    city TEXT,
    country TEXT,
    code TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS statuses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS flights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    flight_number TEXT NOT NULL,
    airline_id INTEGER,
    aircraft_type_id INTEGER,
    departure_airport_id INTEGER,
    arrival_airport_id INTEGER,
    departure_time TEXT,
    arrival_time TEXT,
    status_id INTEGER,
    gate TEXT,
    FOREIGN KEY (airline_id) REFERENCES airlines(id),
    FOREIGN KEY (aircraft_type_id) REFERENCES aircraft_types(id),
    FOREIGN KEY (departure_airport_id) REFERENCES airports(id),
    FOREIGN KEY (arrival_airport_id) REFERENCES airports(id),
    FOREIGN KEY (status_id) REFERENCES statuses(id)
);
CREATE INDEX IF NOT EXISTS idx_flights_departure ON flights(departure_time);
"#;

// ── Schema ──────────────────────────────────────────────────────────────────

/// Create the flight tables if they don't exist.
pub fn create_flight_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(FLIGHT_SCHEMA_SQL)?;
    Ok(())
}

/// Open or create a flight-records database at the given path.
pub fn open_flights_database(path: &Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SchemaError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    create_flight_schema(&conn)?;
    Ok(conn)
}

/// In-memory flight database for tests.
pub fn open_flights_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_flight_schema(&conn)?;
    Ok(conn)
}

// ── Reference Data ──────────────────────────────────────────────────────────

pub fn insert_airline(
    conn: &Connection,
    name: &str,
    country: Option<&str>,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO airlines (name, country) VALUES (?1, ?2)",
        params![name, country],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_aircraft_type(
    conn: &Connection,
    model: &str,
    manufacturer: Option<&str>,
    capacity: Option<i64>,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO aircraft_types (model, manufacturer, capacity) VALUES (?1, ?2, ?3)",
        params![model, manufacturer, capacity],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_airport(
    conn: &Connection,
    name: &str,
    city: Option<&str>,
    country: Option<&str>,
    code: Option<&str>,
) -> Result<i64, OperationError> {
    // Codes are looked up upper-cased.
    let code = code.map(|c| c.trim().to_ascii_uppercase());
    conn.execute(
        "INSERT INTO airports (name, city, country, code) VALUES (?1, ?2, ?3, ?4)",
        params![name, city, country, code],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_status(conn: &Connection, name: &str) -> Result<i64, OperationError> {
    conn.execute("INSERT INTO statuses (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_airlines(conn: &Connection) -> Result<Vec<Airline>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name, country FROM airlines ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Airline {
            id: row.get(0)?,
            name: row.get(1)?,
            country: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn list_aircraft_types(conn: &Connection) -> Result<Vec<AircraftType>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT id, model, manufacturer, capacity FROM aircraft_types ORDER BY model")?;
    let rows = stmt.query_map([], |row| {
        Ok(AircraftType {
            id: row.get(0)?,
            model: row.get(1)?,
            manufacturer: row.get(2)?,
            capacity: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn list_airports(conn: &Connection) -> Result<Vec<Airport>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT id, name, city, country, code FROM airports ORDER BY code")?;
    let rows = stmt.query_map([], |row| {
        Ok(Airport {
            id: row.get(0)?,
            name: row.get(1)?,
            city: row.get(2)?,
            country: row.get(3)?,
            code: row.get(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn list_statuses(conn: &Connection) -> Result<Vec<FlightStatus>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name FROM statuses ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(FlightStatus {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Look up a reference row ID by its natural key.
pub(crate) fn lookup_id(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
    value: &str,
) -> Result<Option<i64>, OperationError> {
    conn.query_row(
        &format!("SELECT id FROM {table} WHERE {column} = ?1"),
        params![value],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Find an airport ID by IATA code (case-insensitive).
pub fn find_airport_by_code(conn: &Connection, code: &str) -> Result<Option<i64>, OperationError> {
    lookup_id(conn, "airports", "code", &code.trim().to_ascii_uppercase())
}

pub fn find_airline_by_name(conn: &Connection, name: &str) -> Result<Option<i64>, OperationError> {
    lookup_id(conn, "airlines", "name", name.trim())
}

pub fn find_aircraft_by_model(conn: &Connection, model: &str) -> Result<Option<i64>, OperationError> {
    lookup_id(conn, "aircraft_types", "model", model.trim())
}

pub fn find_status_by_name(conn: &Connection, name: &str) -> Result<Option<i64>, OperationError> {
    lookup_id(conn, "statuses", "name", name.trim())
}

// ── Flights ─────────────────────────────────────────────────────────────────

/// Insert a flight. `flight.id` is ignored. Returns the generated ID.
pub fn insert_flight(conn: &Connection, flight: &Flight) -> Result<i64, OperationError> {
    if flight.flight_number.trim().is_empty() {
        return Err(OperationError::validation("flight number must not be empty"));
    }
    conn.execute(
        "INSERT INTO flights (flight_number, airline_id, aircraft_type_id,
             departure_airport_id, arrival_airport_id, departure_time, arrival_time,
             status_id, gate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            flight.flight_number.trim(),
            flight.airline_id,
            flight.aircraft_type_id,
            flight.departure_airport_id,
            flight.arrival_airport_id,
            flight.departure_time,
            flight.arrival_time,
            flight.status_id,
            flight.gate,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replace every column of an existing flight.
pub fn update_flight(conn: &Connection, flight: &Flight) -> Result<(), OperationError> {
    if flight.flight_number.trim().is_empty() {
        return Err(OperationError::validation("flight number must not be empty"));
    }
    let changed = conn.execute(
        "UPDATE flights SET flight_number = ?2, airline_id = ?3, aircraft_type_id = ?4,
             departure_airport_id = ?5, arrival_airport_id = ?6, departure_time = ?7,
             arrival_time = ?8, status_id = ?9, gate = ?10
         WHERE id = ?1",
        params![
            flight.id,
            flight.flight_number.trim(),
            flight.airline_id,
            flight.aircraft_type_id,
            flight.departure_airport_id,
            flight.arrival_airport_id,
            flight.departure_time,
            flight.arrival_time,
            flight.status_id,
            flight.gate,
        ],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found("flight", flight.id));
    }
    Ok(())
}

pub fn delete_flight(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let changed = conn.execute("DELETE FROM flights WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(OperationError::not_found("flight", id));
    }
    Ok(())
}

pub fn get_flight(conn: &Connection, id: i64) -> Result<Option<Flight>, OperationError> {
    conn.query_row(
        "SELECT id, flight_number, airline_id, aircraft_type_id, departure_airport_id,
                arrival_airport_id, departure_time, arrival_time, status_id, gate
         FROM flights WHERE id = ?1",
        params![id],
        |row| {
            Ok(Flight {
                id: row.get(0)?,
                flight_number: row.get(1)?,
                airline_id: row.get(2)?,
                aircraft_type_id: row.get(3)?,
                departure_airport_id: row.get(4)?,
                arrival_airport_id: row.get(5)?,
                departure_time: row.get(6)?,
                arrival_time: row.get(7)?,
                status_id: row.get(8)?,
                gate: row.get(9)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// How airports appear in joined flight rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AirportLabel {
    #[default]
    Code,
    Name,
}

impl AirportLabel {
    fn column(self) -> &'static str {
        match self {
            AirportLabel::Code => "code",
            AirportLabel::Name => "name",
        }
    }
}

fn flights_sql(label: AirportLabel) -> String {
    let field = label.column();
    format!(
        "SELECT f.id, f.flight_number, al.name AS airline, ac.model AS aircraft,
                dap.{field} AS departure, aap.{field} AS arrival,
                f.departure_time, f.arrival_time, st.name AS status, f.gate
         FROM flights f
         LEFT JOIN airlines al ON f.airline_id = al.id
         LEFT JOIN aircraft_types ac ON f.aircraft_type_id = ac.id
         LEFT JOIN airports dap ON f.departure_airport_id = dap.id
         LEFT JOIN airports aap ON f.arrival_airport_id = aap.id
         LEFT JOIN statuses st ON f.status_id = st.id"
    )
}

/// All flights joined with reference names, by departure time.
pub fn list_flights(conn: &Connection, label: AirportLabel) -> Result<Vec<FlightRow>, OperationError> {
    let sql = format!("{} ORDER BY f.departure_time, f.id", flights_sql(label));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_flight_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Flight Search ───────────────────────────────────────────────────────────

/// Flight search criteria. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightCriteria {
    /// Substring of flight number, airline or either airport name.
    pub text: Option<String>,
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub gate: Option<String>,
    pub status: Option<String>,
    pub departure_time: DateRange,
    pub arrival_time: DateRange,
}

/// Build the WHERE fragment for a flight search over the joined columns.
pub fn build_flight_clause(criteria: &FlightCriteria) -> SearchClause {
    let mut b = WhereBuilder::new();
    b.contains_any(
        &["flight_number", "airline", "departure", "arrival"],
        criteria.text.as_deref(),
    )
    .contains("flight_number", criteria.flight_number.as_deref())
    .contains("airline", criteria.airline.as_deref())
    .contains("departure", criteria.departure.as_deref())
    .contains("arrival", criteria.destination.as_deref())
    .contains("gate", criteria.gate.as_deref())
    .equals("status", criteria.status.as_deref())
    .text_range("departure_time", &criteria.departure_time, DATETIME_DOMAIN)
    .text_range("arrival_time", &criteria.arrival_time, DATETIME_DOMAIN);
    b.build()
}

/// Search flights. Airports are matched and shown by name.
pub fn search_flights(
    conn: &Connection,
    criteria: &FlightCriteria,
) -> Result<Vec<FlightRow>, OperationError> {
    let clause = build_flight_clause(criteria);
    let sql = format!(
        "SELECT * FROM ({}){} ORDER BY departure_time, id",
        flights_sql(AirportLabel::Name),
        clause.where_sql()
    );
    log::debug!("Flight search: {sql} {:?}", clause.params);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(clause.params.iter()), row_to_flight_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_flight_row(row: &Row<'_>) -> rusqlite::Result<FlightRow> {
    Ok(FlightRow {
        id: row.get(0)?,
        flight_number: row.get(1)?,
        airline: row.get(2)?,
        aircraft: row.get(3)?,
        departure: row.get(4)?,
        arrival: row.get(5)?,
        departure_time: row.get(6)?,
        arrival_time: row.get(7)?,
        status: row.get(8)?,
        gate: row.get(9)?,
    })
}
