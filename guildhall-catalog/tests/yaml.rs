use guildhall_catalog::{load_flight_seed, load_guild_seed, GuildSeed, YamlError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_yaml(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn load_guild_seed_from_file() {
    let tmp = TempDir::new().unwrap();
    write_yaml(
        tmp.path(),
        "guild.yaml",
        r#"
classes:
  - name: Воин
    description: "Фронтовой танк с высокой выживаемостью."
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
"#,
    );

    let seed = load_guild_seed(&tmp.path().join("guild.yaml")).unwrap();
    assert_eq!(seed.classes.len(), 2);
    assert_eq!(seed.classes[1].description, None);
    assert_eq!(seed.players.len(), 1);

    let player = &seed.players[0];
    assert_eq!(player.nickname, "Игрок1");
    assert_eq!(player.class.as_deref(), Some("Воин"));
    let activity = player.activity.as_ref().unwrap();
    assert_eq!(activity.weekly_damage, Some(12000));
    assert_eq!(activity.weekly_crafts, None);
    assert_eq!(
        player.contribution.as_ref().unwrap().leadership_rank.as_deref(),
        Some("Офицер")
    );
    assert_eq!(player.events.len(), 2);
    assert!(player.events[0].participated);
}

#[test]
fn load_guild_seed_merges_directory_in_name_order() {
    let tmp = TempDir::new().unwrap();
    write_yaml(
        tmp.path(),
        "b_players.yaml",
        r#"
players:
  - nickname: Second
    tag: "@second"
"#,
    );
    write_yaml(
        tmp.path(),
        "a_classes.yaml",
        r#"
classes:
  - name: Лучник
players:
  - nickname: First
    tag: "@first"
"#,
    );
    write_yaml(tmp.path(), "notes.txt", "not yaml at all: [");

    let seed: GuildSeed = load_guild_seed(tmp.path()).unwrap();
    assert_eq!(seed.classes.len(), 1);
    let names: Vec<_> = seed.players.iter().map(|p| p.nickname.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[test]
fn missing_seed_source_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_guild_seed(&tmp.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, YamlError::NotFound(_)));
}

#[test]
fn malformed_yaml_reports_path() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "bad.yaml", "players: [ { nickname: 1 ");
    let err = load_guild_seed(&tmp.path().join("bad.yaml")).unwrap_err();
    match err {
        YamlError::Parse { path, .. } => assert!(path.ends_with("bad.yaml")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn load_flight_seed_from_file() {
    let tmp = TempDir::new().unwrap();
    write_yaml(
        tmp.path(),
        "flights.yaml",
        r#"
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
    code: FRA
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
"#,
    );

    let seed = load_flight_seed(&tmp.path().join("flights.yaml")).unwrap();
    assert_eq!(seed.airlines.len(), 1);
    assert_eq!(seed.aircraft_types[0].capacity, Some(180));
    assert_eq!(seed.airports[1].city, None);
    assert_eq!(seed.statuses, vec!["On Time", "Delayed"]);
    let flight = &seed.flights[0];
    assert_eq!(flight.from.as_deref(), Some("SVO"));
    assert_eq!(flight.gate.as_deref(), Some("A12"));
}
