use guildhall_catalog::types::*;
use guildhall_db::*;

fn add(conn: &rusqlite::Connection, nickname: &str, level: i64, joined: &str, status: &str) -> i64 {
    create_player(
        conn,
        &NewPlayer {
            nickname: nickname.to_string(),
            tag: format!("@{nickname}"),
            class_id: None,
            level: Some(level),
            joined_date: Some(joined.to_string()),
            guild_status: Some(status.to_string()),
        },
    )
    .unwrap()
}

fn setup_db() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    let healer = insert_class(&conn, "Хиллер", None).unwrap();

    let low = add(&conn, "low", 5, "2022-03-01", "Активен");
    let mid = add(&conn, "mid", 15, "2023-07-10", "Активен");
    add(&conn, "high", 60, "2024-01-20", "В отпуске");
    let wild = add(&conn, "100%_wild", 20, "2024-05-05", "Активен");

    update_player(
        &conn,
        mid,
        &PlayerUpdate {
            class_id: Some(Some(healer)),
            ..Default::default()
        },
    )
    .unwrap();
    upsert_activity(
        &conn,
        mid,
        &ActivityFields {
            weekly_damage: Some(40_000),
            raid_participation: Some(12),
            ..Default::default()
        },
    )
    .unwrap();
    upsert_contribution(
        &conn,
        low,
        &ContributionFields {
            resources_contributed: Some(300),
            leadership_rank: Some("Лидер".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    upsert_activity(
        &conn,
        wild,
        &ActivityFields {
            weekly_damage: Some(900),
            ..Default::default()
        },
    )
    .unwrap();
    conn
}

fn nicknames(rows: &[PlayerOverview]) -> Vec<&str> {
    rows.iter().map(|p| p.nickname.as_str()).collect()
}

#[test]
fn no_criteria_returns_everyone() {
    let conn = setup_db();
    let rows = search_players(&conn, &PlayerCriteria::default()).unwrap();
    assert_eq!(rows.len(), 4);
}

#[test]
fn level_range() {
    let conn = setup_db();
    let rows = search_players(
        &conn,
        &PlayerCriteria {
            level: Range::between(10, 20),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&rows), vec!["100%_wild", "mid"]);
}

#[test]
fn open_ended_ranges_use_domain() {
    let conn = setup_db();
    let rows = search_players(
        &conn,
        &PlayerCriteria {
            level: Range::at_least(50),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&rows), vec!["high"]);

    // Missing activity reads as 0 damage and falls inside an upper-only range
    let rows = search_players(
        &conn,
        &PlayerCriteria {
            damage: Range::at_most(1_000),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&rows), vec!["100%_wild", "high", "low"]);
}

#[test]
fn joined_date_range() {
    let conn = setup_db();
    let rows = search_players(
        &conn,
        &PlayerCriteria {
            joined: Range::between("2023-01-01".to_string(), "2024-01-31".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&rows), vec!["high", "mid"]);
}

#[test]
fn exact_and_substring_criteria_combine() {
    let conn = setup_db();
    let rows = search_players(
        &conn,
        &PlayerCriteria {
            status: Some("Активен".to_string()),
            text: Some("i".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&rows), vec!["100%_wild", "mid"]);

    let rows = search_players(
        &conn,
        &PlayerCriteria {
            class_name: Some("Хиллер".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&rows), vec!["mid"]);
}

#[test]
fn role_matches_default_rank() {
    let conn = setup_db();
    let leaders = search_players(
        &conn,
        &PlayerCriteria {
            role: Some("Лидер".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&leaders), vec!["low"]);

    let members = search_players(
        &conn,
        &PlayerCriteria {
            role: Some(DEFAULT_RANK.to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(members.len(), 3);
}

#[test]
fn like_wildcards_match_literally() {
    let conn = setup_db();
    let rows = search_players(
        &conn,
        &PlayerCriteria {
            nickname: Some("%_".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(nicknames(&rows), vec!["100%_wild"]);
}

#[test]
fn user_text_is_never_spliced_into_sql() {
    let conn = setup_db();
    let hostile = "'; DROP TABLE Players; --";
    let clause = build_search_clause(&PlayerCriteria {
        nickname: Some(hostile.to_string()),
        ..Default::default()
    });
    assert!(!clause.sql.contains("DROP"));

    let rows = search_players(
        &conn,
        &PlayerCriteria {
            nickname: Some(hostile.to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(rows.is_empty());
    assert_eq!(list_players(&conn).unwrap().len(), 4);
}
