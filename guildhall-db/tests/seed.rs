use guildhall_catalog::{parse_seed, FlightSeed, GuildSeed};
use guildhall_db::*;

const GUILD_YAML: &str = r#"
classes:
  - name: Воин
    description: "Фронтовой танк"
  - name: Маг
players:
  - nickname: Игрок1
    tag: "@user001"
    class: Воин
    level: 42
    joined_date: "2024-01-01"
    guild_status: Активен
    activity:
      weekly_damage: 12000
      raid_participation: 3
    contribution:
      resources_contributed: 500
      leadership_rank: Офицер
    events:
      - date: "2024-02-01"
        participated: true
      - date: "2024-02-08"
        participated: false
  - nickname: Игрок2
    tag: "@user002"
"#;

const FLIGHTS_YAML: &str = r#"
airlines:
  - name: Aeroflot
    country: Russia
aircraft_types:
  - model: A320
    manufacturer: Airbus
    capacity: 180
airports:
  - name: Sheremetyevo International Airport
    code: SVO
    city: Moscow
  - name: Frankfurt Airport
    code: fra
statuses: ["On Time", "Delayed"]
flights:
  - flight_number: SU123
    airline: Aeroflot
    aircraft: A320
    from: SVO
    to: FRA
    departure_time: "2025-06-01 08:00"
    arrival_time: "2025-06-01 11:00"
    status: On Time
    gate: A12
"#;

#[test]
fn seed_guild_inserts_everything() {
    let conn = open_memory().unwrap();
    let seed: GuildSeed = parse_seed(GUILD_YAML, "guild.yaml").unwrap();

    let stats = seed_guild(&conn, &seed).unwrap();
    assert_eq!(
        stats,
        SeedStats {
            classes: 2,
            players: 2,
            events: 2,
            skipped_players: 0,
        }
    );

    let id = find_player_by_nickname(&conn, "Игрок1").unwrap().unwrap();
    let info = get_player(&conn, id).unwrap().unwrap();
    assert_eq!(info.class_name.as_deref(), Some("Воин"));
    assert_eq!(
        get_player_activity(&conn, id).unwrap().unwrap().weekly_damage,
        Some(12000)
    );
    assert_eq!(player_events(&conn, id, None).unwrap().len(), 2);

    let bare = find_player_by_nickname(&conn, "Игрок2").unwrap().unwrap();
    assert!(get_player_activity(&conn, bare).unwrap().is_none());
}

#[test]
fn seeding_twice_skips_existing_rows() {
    let conn = open_memory().unwrap();
    let seed: GuildSeed = parse_seed(GUILD_YAML, "guild.yaml").unwrap();
    seed_guild(&conn, &seed).unwrap();

    let again = seed_guild(&conn, &seed).unwrap();
    assert_eq!(again.classes, 0);
    assert_eq!(again.players, 0);
    assert_eq!(again.skipped_players, 2);
    assert_eq!(guild_stats(&conn).unwrap().events, 2);
}

#[test]
fn unknown_class_rolls_back_the_whole_seed() {
    let conn = open_memory().unwrap();
    let yaml = "
players:
  - nickname: Fine
    tag: '@fine'
  - nickname: Lost
    tag: '@lost'
    class: Некромант
";
    let seed: GuildSeed = parse_seed(yaml, "bad.yaml").unwrap();
    let err = seed_guild(&conn, &seed).unwrap_err();
    match err {
        SeedError::UnknownReference { kind, name, .. } => {
            assert_eq!(kind, "class");
            assert_eq!(name, "Некромант");
        }
        other => panic!("expected UnknownReference, got {other:?}"),
    }
    assert_eq!(guild_stats(&conn).unwrap().players, 0);
}

#[test]
fn seed_flights_resolves_natural_keys() {
    let conn = open_flights_memory().unwrap();
    let seed: FlightSeed = parse_seed(FLIGHTS_YAML, "flights.yaml").unwrap();

    let stats = seed_flights(&conn, &seed).unwrap();
    assert_eq!(stats.airports, 2);
    assert_eq!(stats.statuses, 2);
    assert_eq!(stats.flights, 1);

    let rows = list_flights(&conn, AirportLabel::Code).unwrap();
    assert_eq!(rows[0].departure.as_deref(), Some("SVO"));
    assert_eq!(rows[0].arrival.as_deref(), Some("FRA"));
    assert_eq!(rows[0].airline.as_deref(), Some("Aeroflot"));
    assert_eq!(rows[0].status.as_deref(), Some("On Time"));

    // Reference data is not duplicated on a second run
    let again = seed_flights(&conn, &seed).unwrap();
    assert_eq!(again.airlines, 0);
    assert_eq!(list_airports(&conn).unwrap().len(), 2);
}

#[test]
fn seed_flights_rejects_unknown_airport() {
    let conn = open_flights_memory().unwrap();
    let seed: FlightSeed = parse_seed(
        "flights:\n  - flight_number: XX1\n    from: LED\n",
        "flights.yaml",
    )
    .unwrap();
    let err = seed_flights(&conn, &seed).unwrap_err();
    assert!(matches!(err, SeedError::UnknownReference { kind: "airport", .. }));
}

#[test]
fn bundled_demo_data_loads() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/seed");

    let conn = open_memory().unwrap();
    let guild = guildhall_catalog::load_guild_seed(&root.join("guild.yaml")).unwrap();
    let stats = seed_guild(&conn, &guild).unwrap();
    assert_eq!(stats.classes, 5);
    assert_eq!(stats.players, guild.players.len());
    assert_eq!(stats.skipped_players, 0);

    let flights_conn = open_flights_memory().unwrap();
    let flights = guildhall_catalog::load_flight_seed(&root.join("flights.yaml")).unwrap();
    let stats = seed_flights(&flights_conn, &flights).unwrap();
    assert_eq!(stats.flights, flights.flights.len());
    assert_eq!(list_flights(&flights_conn, AirportLabel::Code).unwrap()[0].flight_number, "SU123");
}
