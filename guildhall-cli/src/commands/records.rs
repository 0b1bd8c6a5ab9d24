//! Activity, contribution and event commands.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use guildhall_catalog::types::{ActivityFields, ContributionFields};
use guildhall_core::{normalize_date, today};

use crate::{CliError, Context};

use super::{open_guild, or_dash, print_table};

pub(crate) fn run_activity_set(
    ctx: &Context,
    player_id: i64,
    damage: Option<i64>,
    raids: Option<i64>,
    crafts: Option<i64>,
) -> Result<(), CliError> {
    let fields = ActivityFields {
        weekly_damage: damage,
        raid_participation: raids,
        weekly_crafts: crafts,
    };
    if fields.is_empty() {
        return Err(CliError::input(
            "nothing to set (use --damage, --raids or --crafts)",
        ));
    }
    let conn = open_guild(ctx)?;
    guildhall_db::upsert_activity(&conn, player_id, &fields)?;
    log::info!("Activity saved for player {player_id}");
    Ok(())
}

pub(crate) fn run_contribution_set(
    ctx: &Context,
    player_id: i64,
    resources: Option<i64>,
    help: Option<i64>,
    rank: Option<String>,
) -> Result<(), CliError> {
    let fields = ContributionFields {
        resources_contributed: resources,
        help_count: help,
        leadership_rank: rank,
    };
    if fields.is_empty() {
        return Err(CliError::input(
            "nothing to set (use --resources, --help or --rank)",
        ));
    }
    let conn = open_guild(ctx)?;
    guildhall_db::upsert_contribution(&conn, player_id, &fields)?;
    log::info!("Contribution saved for player {player_id}");
    Ok(())
}

pub(crate) fn run_event_add(
    ctx: &Context,
    player_id: i64,
    date: Option<String>,
    participated: bool,
) -> Result<(), CliError> {
    let date = match date {
        Some(d) => normalize_date(&d)?,
        None => today(),
    };
    let conn = open_guild(ctx)?;
    let id = guildhall_db::add_event(&conn, player_id, &date, participated)?;
    log::info!(
        "Recorded event {} on {} ({})",
        id,
        date,
        if participated { "participated" } else { "missed" },
    );
    Ok(())
}

pub(crate) fn run_event_list(ctx: &Context, player_id: i64, limit: u32) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let events = guildhall_db::player_events(&conn, player_id, Some(limit))?;
    if events.is_empty() {
        log::info!("No events recorded for player {player_id}");
        return Ok(());
    }

    let columns = ["id", "date", "participated"].map(String::from);
    let rows: Vec<Vec<Option<String>>> = events
        .iter()
        .map(|e| {
            vec![
                Some(e.id.to_string()),
                Some(or_dash(e.event_date.as_deref())),
                Some(if e.participated { "yes" } else { "no" }.to_string()),
            ]
        })
        .collect();
    print_table(&columns, &rows);

    let attended = events.iter().filter(|e| e.participated).count();
    log::info!(
        "{}",
        format!("{attended} of {} attended", events.len())
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

pub(crate) fn run_event_delete(ctx: &Context, id: i64) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    guildhall_db::delete_event(&conn, id)?;
    log::info!("Deleted event {id}");
    Ok(())
}
