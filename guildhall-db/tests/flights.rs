use guildhall_catalog::types::*;
use guildhall_db::search::Range;
use guildhall_db::*;
use rusqlite::types::Value;

struct Refs {
    aeroflot: i64,
    a320: i64,
    svo: i64,
    fra: i64,
    on_time: i64,
    delayed: i64,
}

fn setup_db() -> (rusqlite::Connection, Refs) {
    let conn = open_flights_memory().unwrap();
    let refs = Refs {
        aeroflot: insert_airline(&conn, "Aeroflot", Some("Russia")).unwrap(),
        a320: insert_aircraft_type(&conn, "A320", Some("Airbus"), Some(180)).unwrap(),
        svo: insert_airport(
            &conn,
            "Sheremetyevo International Airport",
            Some("Moscow"),
            Some("Russia"),
            Some("SVO"),
        )
        .unwrap(),
        fra: insert_airport(
            &conn,
            "Frankfurt Airport",
            Some("Frankfurt"),
            Some("Germany"),
            Some("FRA"),
        )
        .unwrap(),
        on_time: insert_status(&conn, "On Time").unwrap(),
        delayed: insert_status(&conn, "Delayed").unwrap(),
    };
    insert_airline(&conn, "Lufthansa", Some("Germany")).unwrap();
    (conn, refs)
}

fn flight(refs: &Refs, number: &str, from: i64, to: i64, dep: &str, arr: &str) -> Flight {
    Flight {
        id: 0,
        flight_number: number.to_string(),
        airline_id: Some(refs.aeroflot),
        aircraft_type_id: Some(refs.a320),
        departure_airport_id: Some(from),
        arrival_airport_id: Some(to),
        departure_time: Some(dep.to_string()),
        arrival_time: Some(arr.to_string()),
        status_id: Some(refs.on_time),
        gate: Some("A12".to_string()),
    }
}

#[test]
fn reference_lists() {
    let (conn, _) = setup_db();
    let airlines: Vec<String> = list_airlines(&conn)
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(airlines, vec!["Aeroflot", "Lufthansa"]);
    assert_eq!(list_aircraft_types(&conn).unwrap()[0].capacity, Some(180));
    assert_eq!(list_airports(&conn).unwrap()[0].code.as_deref(), Some("FRA"));
    assert_eq!(list_statuses(&conn).unwrap().len(), 2);

    let dup = insert_airline(&conn, "Aeroflot", None).unwrap_err();
    assert!(matches!(dup, OperationError::Constraint(_)));
}

#[test]
fn flight_crud() {
    let (conn, refs) = setup_db();
    let id = insert_flight(
        &conn,
        &flight(&refs, "SU123", refs.svo, refs.fra, "2025-06-01 08:00", "2025-06-01 11:00"),
    )
    .unwrap();

    let mut stored = get_flight(&conn, id).unwrap().unwrap();
    assert_eq!(stored.flight_number, "SU123");
    assert_eq!(stored.departure_airport_id, Some(refs.svo));

    stored.status_id = Some(refs.delayed);
    stored.gate = Some("B4".to_string());
    update_flight(&conn, &stored).unwrap();

    let rows = list_flights(&conn, AirportLabel::Code).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].departure.as_deref(), Some("SVO"));
    assert_eq!(rows[0].arrival.as_deref(), Some("FRA"));
    assert_eq!(rows[0].status.as_deref(), Some("Delayed"));
    assert_eq!(rows[0].gate.as_deref(), Some("B4"));

    let named = list_flights(&conn, AirportLabel::Name).unwrap();
    assert_eq!(named[0].arrival.as_deref(), Some("Frankfurt Airport"));

    delete_flight(&conn, id).unwrap();
    assert!(get_flight(&conn, id).unwrap().is_none());
    assert!(delete_flight(&conn, id).unwrap_err().is_not_found());

    stored.id = id;
    assert!(update_flight(&conn, &stored).unwrap_err().is_not_found());
}

#[test]
fn flight_requires_number_and_known_references() {
    let (conn, refs) = setup_db();
    let mut f = flight(&refs, " ", refs.svo, refs.fra, "2025-06-01 08:00", "2025-06-01 11:00");
    assert!(matches!(
        insert_flight(&conn, &f).unwrap_err(),
        OperationError::Validation(_)
    ));

    f.flight_number = "SU1".to_string();
    f.airline_id = Some(999);
    assert!(matches!(
        insert_flight(&conn, &f).unwrap_err(),
        OperationError::Constraint(_)
    ));
}

#[test]
fn referenced_airport_cannot_be_deleted() {
    let (conn, refs) = setup_db();
    insert_flight(
        &conn,
        &flight(&refs, "SU123", refs.svo, refs.fra, "2025-06-01 08:00", "2025-06-01 11:00"),
    )
    .unwrap();
    let err = conn
        .execute("DELETE FROM airports WHERE id = ?1", [refs.fra])
        .map_err(OperationError::from)
        .unwrap_err();
    assert!(matches!(err, OperationError::Constraint(_)));
}

#[test]
fn clause_composition() {
    assert!(build_flight_clause(&FlightCriteria::default()).is_empty());

    let clause = build_flight_clause(&FlightCriteria {
        text: Some("su".to_string()),
        status: Some("On Time".to_string()),
        departure_time: Range::at_least("2025-06-01 00:00".to_string()),
        ..Default::default()
    });
    assert_eq!(
        clause.sql,
        "(flight_number LIKE ? ESCAPE '\\' OR airline LIKE ? ESCAPE '\\' OR departure LIKE ? ESCAPE '\\' \
         OR arrival LIKE ? ESCAPE '\\') AND status = ? AND departure_time BETWEEN ? AND ?"
    );
    assert_eq!(clause.params.len(), 7);
    assert_eq!(clause.params[4], Value::Text("On Time".into()));
    assert_eq!(clause.params[6], Value::Text("9999-12-31 23:59".into()));
}

#[test]
fn search_by_airport_name_and_time() {
    let (conn, refs) = setup_db();
    insert_flight(
        &conn,
        &flight(&refs, "SU123", refs.svo, refs.fra, "2025-06-01 08:00", "2025-06-01 11:00"),
    )
    .unwrap();
    insert_flight(
        &conn,
        &flight(&refs, "SU124", refs.fra, refs.svo, "2025-06-02 13:00", "2025-06-02 17:30"),
    )
    .unwrap();

    let to_frankfurt = search_flights(
        &conn,
        &FlightCriteria {
            destination: Some("frankfurt".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(to_frankfurt.len(), 1);
    assert_eq!(to_frankfurt[0].flight_number, "SU123");

    let later = search_flights(
        &conn,
        &FlightCriteria {
            departure_time: Range::at_least("2025-06-02 00:00".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(later.len(), 1);
    assert_eq!(later[0].flight_number, "SU124");

    let everything = search_flights(&conn, &FlightCriteria::default()).unwrap();
    assert_eq!(everything.len(), 2);
    assert_eq!(everything[0].departure.as_deref(), Some("Sheremetyevo International Airport"));
}

#[test]
fn natural_key_lookups() {
    let (conn, refs) = setup_db();
    assert_eq!(find_airport_by_code(&conn, " svo ").unwrap(), Some(refs.svo));
    assert_eq!(find_airline_by_name(&conn, "Aeroflot").unwrap(), Some(refs.aeroflot));
    assert_eq!(find_aircraft_by_model(&conn, "A320").unwrap(), Some(refs.a320));
    assert_eq!(find_status_by_name(&conn, "Delayed").unwrap(), Some(refs.delayed));
    assert_eq!(find_status_by_name(&conn, "Boarding").unwrap(), None);
}

#[test]
fn airport_codes_are_stored_upper_case() {
    let conn = open_flights_memory().unwrap();
    let id = insert_airport(&conn, "Pulkovo", Some("Saint Petersburg"), None, Some(" led ")).unwrap();

    assert_eq!(find_airport_by_code(&conn, "led").unwrap(), Some(id));
    assert_eq!(find_airport_by_code(&conn, "LED").unwrap(), Some(id));
    assert_eq!(list_airports(&conn).unwrap()[0].code.as_deref(), Some("LED"));
}
