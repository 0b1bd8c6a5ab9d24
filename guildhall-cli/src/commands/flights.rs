//! Commands for the flight-records database.

use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;

use guildhall_catalog::types::{Flight, FlightRow};
use guildhall_core::normalize_datetime;
use guildhall_db::{AirportLabel, DateRange, FlightCriteria, OperationError};

use crate::cli_types::{FlightAddArgs, FlightReferenceItem, FlightSearchArgs};
use crate::CliError;

use super::{open_flights, or_dash, print_table};

pub(crate) fn run_init(path: &Path, seed: Option<&Path>) -> Result<(), CliError> {
    let existed = path.exists();
    let conn = guildhall_db::open_flights_database(path)
        .map_err(|e| CliError::database(format!("Failed to create {}: {}", path.display(), e)))?;
    if existed {
        log::info!("Flight database already exists at {}", path.display());
    } else {
        log::info!(
            "{} {}",
            "Created".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        );
    }
    if let Some(seed) = seed {
        seed_from(&conn, seed)?;
    }
    Ok(())
}

pub(crate) fn run_seed(path: &Path, seed: &Path) -> Result<(), CliError> {
    let conn = guildhall_db::open_flights_database(path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", path.display(), e)))?;
    seed_from(&conn, seed)
}

fn seed_from(conn: &Connection, path: &Path) -> Result<(), CliError> {
    let seed =
        guildhall_catalog::load_flight_seed(path).map_err(|e| CliError::seed(e.to_string()))?;
    let stats = guildhall_db::seed_flights(conn, &seed).map_err(|e| CliError::seed(e.to_string()))?;
    log::info!(
        "Seeded {} airlines, {} aircraft types, {} airports, {} statuses, {} flights",
        stats.airlines,
        stats.aircraft_types,
        stats.airports,
        stats.statuses,
        stats.flights,
    );
    Ok(())
}

pub(crate) fn run_list(path: &Path, names: bool) -> Result<(), CliError> {
    let conn = open_flights(path)?;
    let label = if names {
        AirportLabel::Name
    } else {
        AirportLabel::Code
    };
    print_flights(&guildhall_db::list_flights(&conn, label)?);
    Ok(())
}

pub(crate) fn run_add(path: &Path, args: FlightAddArgs) -> Result<(), CliError> {
    let conn = open_flights(path)?;

    let datetime = |value: Option<&str>| -> Result<Option<String>, CliError> {
        Ok(value.map(normalize_datetime).transpose()?)
    };

    let flight = Flight {
        id: 0,
        flight_number: args.number.trim().to_string(),
        airline_id: resolve(
            &conn,
            "airline",
            args.airline.as_deref(),
            guildhall_db::find_airline_by_name,
        )?,
        aircraft_type_id: resolve(
            &conn,
            "aircraft",
            args.aircraft.as_deref(),
            guildhall_db::find_aircraft_by_model,
        )?,
        departure_airport_id: resolve(
            &conn,
            "airport",
            args.from.as_deref(),
            guildhall_db::find_airport_by_code,
        )?,
        arrival_airport_id: resolve(
            &conn,
            "airport",
            args.to.as_deref(),
            guildhall_db::find_airport_by_code,
        )?,
        departure_time: datetime(args.departure.as_deref())?,
        arrival_time: datetime(args.arrival.as_deref())?,
        status_id: resolve(
            &conn,
            "status",
            args.status.as_deref(),
            guildhall_db::find_status_by_name,
        )?,
        gate: args.gate.filter(|g| !g.trim().is_empty()),
    };
    if let (Some(dep), Some(arr)) = (&flight.departure_time, &flight.arrival_time) {
        if arr < dep {
            log::warn!("Arrival {arr} is before departure {dep}");
        }
    }

    let id = guildhall_db::insert_flight(&conn, &flight)?;
    log::info!(
        "{} flight {} (id {id})",
        "Added".if_supports_color(Stdout, |t| t.green()),
        flight.flight_number,
    );
    Ok(())
}

type Finder = fn(&Connection, &str) -> Result<Option<i64>, OperationError>;

/// Look up a reference by natural key. Blank input means "not set".
fn resolve(
    conn: &Connection,
    kind: &str,
    value: Option<&str>,
    find: Finder,
) -> Result<Option<i64>, CliError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    find(conn, value)?
        .map(Some)
        .ok_or_else(|| CliError::input(format!("unknown {kind} '{value}'")))
}

pub(crate) fn run_delete(path: &Path, id: i64) -> Result<(), CliError> {
    let conn = open_flights(path)?;
    guildhall_db::delete_flight(&conn, id)?;
    log::info!("Deleted flight {id}");
    Ok(())
}

pub(crate) fn run_search(path: &Path, args: FlightSearchArgs) -> Result<(), CliError> {
    let range = |after: Option<String>, before: Option<String>| -> Result<DateRange, CliError> {
        Ok(DateRange::new(
            after.as_deref().map(normalize_datetime).transpose()?,
            before.as_deref().map(normalize_datetime).transpose()?,
        ))
    };
    let criteria = FlightCriteria {
        text: args.text,
        flight_number: args.number,
        airline: args.airline,
        departure: args.from,
        destination: args.to,
        gate: args.gate,
        status: args.status,
        departure_time: range(args.departs_after, args.departs_before)?,
        arrival_time: range(args.arrives_after, args.arrives_before)?,
    };

    let conn = open_flights(path)?;
    let flights = guildhall_db::search_flights(&conn, &criteria)?;
    print_flights(&flights);
    Ok(())
}

pub(crate) fn run_reference_list(path: &Path) -> Result<(), CliError> {
    let conn = open_flights(path)?;
    let heading = |title: &str| {
        log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
    };

    heading("Airlines");
    for a in guildhall_db::list_airlines(&conn)? {
        log::info!("  {:>4}  {}  {}", a.id, a.name, or_dash(a.country.as_deref()));
    }
    crate::log_blank();
    heading("Aircraft types");
    for a in guildhall_db::list_aircraft_types(&conn)? {
        log::info!(
            "  {:>4}  {}  {}  {}",
            a.id,
            a.model,
            or_dash(a.manufacturer.as_deref()),
            or_dash(a.capacity),
        );
    }
    crate::log_blank();
    heading("Airports");
    for a in guildhall_db::list_airports(&conn)? {
        log::info!(
            "  {:>4}  {}  {}  {}",
            a.id,
            or_dash(a.code.as_deref()),
            a.name,
            or_dash(a.city.as_deref()),
        );
    }
    crate::log_blank();
    heading("Statuses");
    for s in guildhall_db::list_statuses(&conn)? {
        log::info!("  {:>4}  {}", s.id, s.name);
    }
    Ok(())
}

pub(crate) fn run_reference_add(path: &Path, item: FlightReferenceItem) -> Result<(), CliError> {
    let conn = open_flights(path)?;
    let (kind, id) = add_reference(&conn, item)?;
    log::info!(
        "{} {kind} (id {id})",
        "Added".if_supports_color(Stdout, |t| t.green()),
    );
    Ok(())
}

fn add_reference(
    conn: &Connection,
    item: FlightReferenceItem,
) -> Result<(&'static str, i64), CliError> {
    let required = |kind: &str, value: &str| -> Result<String, CliError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CliError::input(format!("{kind} must not be empty")));
        }
        Ok(value.to_string())
    };
    let added = match item {
        FlightReferenceItem::Airline { name, country } => (
            "airline",
            guildhall_db::insert_airline(
                conn,
                &required("airline name", &name)?,
                country.as_deref(),
            )?,
        ),
        FlightReferenceItem::Aircraft {
            model,
            manufacturer,
            capacity,
        } => (
            "aircraft type",
            guildhall_db::insert_aircraft_type(
                conn,
                &required("aircraft model", &model)?,
                manufacturer.as_deref(),
                capacity,
            )?,
        ),
        FlightReferenceItem::Airport {
            code,
            name,
            city,
            country,
        } => (
            "airport",
            guildhall_db::insert_airport(
                conn,
                &required("airport name", &name)?,
                city.as_deref(),
                country.as_deref(),
                Some(required("airport code", &code)?.as_str()),
            )?,
        ),
        FlightReferenceItem::Status { name } => (
            "status",
            guildhall_db::insert_status(conn, &required("status", &name)?)?,
        ),
    };
    Ok(added)
}

fn print_flights(flights: &[FlightRow]) {
    if flights.is_empty() {
        log::info!("No flights.");
        return;
    }
    let columns = [
        "id", "flight", "airline", "aircraft", "from", "to", "departs", "arrives", "status",
        "gate",
    ]
    .map(String::from);
    let rows: Vec<Vec<Option<String>>> = flights
        .iter()
        .map(|f| {
            vec![
                Some(f.id.to_string()),
                Some(f.flight_number.clone()),
                f.airline.clone(),
                f.aircraft.clone(),
                f.departure.clone(),
                f.arrival.clone(),
                f.departure_time.clone(),
                f.arrival_time.clone(),
                f.status.clone(),
                f.gate.clone(),
            ]
        })
        .collect();
    print_table(&columns, &rows);
    crate::log_blank();
    log::info!("{} flights", flights.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_references_resolve_for_new_flights() {
        let conn = guildhall_db::open_flights_memory().unwrap();
        add_reference(
            &conn,
            FlightReferenceItem::Airport {
                code: "svo".into(),
                name: "Sheremetyevo".into(),
                city: Some("Moscow".into()),
                country: None,
            },
        )
        .unwrap();
        let (kind, status) = add_reference(
            &conn,
            FlightReferenceItem::Status {
                name: " Boarding ".into(),
            },
        )
        .unwrap();
        assert_eq!(kind, "status");

        assert!(resolve(&conn, "airport", Some("SVO"), guildhall_db::find_airport_by_code)
            .unwrap()
            .is_some());
        assert_eq!(
            resolve(&conn, "status", Some("Boarding"), guildhall_db::find_status_by_name).unwrap(),
            Some(status)
        );
    }

    #[test]
    fn blank_reference_names_are_rejected() {
        let conn = guildhall_db::open_flights_memory().unwrap();
        let err = add_reference(
            &conn,
            FlightReferenceItem::Airline {
                name: "  ".into(),
                country: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Input(_)));
        assert!(guildhall_db::list_airlines(&conn).unwrap().is_empty());
    }

    #[test]
    fn unknown_reference_is_an_input_error() {
        let conn = guildhall_db::open_flights_memory().unwrap();
        let err =
            resolve(&conn, "airline", Some("Nowhere Air"), guildhall_db::find_airline_by_name)
                .unwrap_err();
        assert!(matches!(err, CliError::Input(_)));
    }
}
