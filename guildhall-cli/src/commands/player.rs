use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use guildhall_catalog::types::*;
use guildhall_core::{normalize_date, today};
use guildhall_db::PlayerView;

use crate::cli_types::{PlayerAddArgs, PlayerUpdateArgs};
use crate::{CliError, Context};

use super::{confirm, open_guild, or_dash, print_table};

pub(crate) fn run_list(ctx: &Context, detailed: bool) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let view = if detailed {
        PlayerView::Detailed
    } else {
        PlayerView::Simple
    };
    let table = guildhall_db::player_rows(&conn, view)?;

    if table.is_empty() {
        log::info!("No players yet.");
        return Ok(());
    }
    print_table(&table.columns, &table.rows);
    crate::log_blank();
    log::info!("{} players", table.len());
    Ok(())
}

/// Everything the detail view shows for one player.
#[derive(Serialize)]
struct PlayerDetails {
    #[serde(flatten)]
    info: PlayerInfo,
    activity: Option<Activity>,
    contribution: Option<GuildContribution>,
    recent_events: Vec<EventParticipation>,
}

pub(crate) fn run_show(ctx: &Context, id: i64, json: bool) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let info = guildhall_db::get_player(&conn, id)?
        .ok_or_else(|| CliError::input(format!("No player with id {id}")))?;
    let details = PlayerDetails {
        activity: guildhall_db::get_player_activity(&conn, id)?,
        contribution: guildhall_db::get_player_contribution(&conn, id)?,
        recent_events: guildhall_db::player_events(&conn, id, None)?,
        info,
    };

    if json {
        let text = serde_json::to_string_pretty(&details)
            .map_err(|e| CliError::input(format!("Failed to serialize player: {e}")))?;
        log::info!("{text}");
        return Ok(());
    }

    let p = &details.info.player;
    log::info!(
        "{} {}",
        p.nickname.if_supports_color(Stdout, |t| t.bold()),
        p.tag.if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("  ID:       {}", p.id);
    log::info!("  Class:    {}", or_dash(details.info.class_name.as_deref()));
    log::info!("  Level:    {}", or_dash(p.level));
    log::info!("  Joined:   {}", or_dash(p.joined_date.as_deref()));
    log::info!("  Status:   {}", or_dash(p.guild_status.as_deref()));

    crate::log_blank();
    log::info!("{}", "Activity".if_supports_color(Stdout, |t| t.bold()));
    match &details.activity {
        Some(a) => {
            log::info!("  Weekly damage:       {}", or_dash(a.weekly_damage));
            log::info!("  Raid participation:  {}", or_dash(a.raid_participation));
            log::info!("  Weekly crafts:       {}", or_dash(a.weekly_crafts));
        }
        None => log::info!("  (none)"),
    }

    crate::log_blank();
    log::info!("{}", "Contribution".if_supports_color(Stdout, |t| t.bold()));
    match &details.contribution {
        Some(c) => {
            log::info!("  Resources:  {}", or_dash(c.resources_contributed));
            log::info!("  Help count: {}", or_dash(c.help_count));
            log::info!(
                "  Rank:       {}",
                c.leadership_rank.as_deref().unwrap_or(DEFAULT_RANK)
            );
        }
        None => log::info!("  (none)"),
    }

    crate::log_blank();
    log::info!("{}", "Recent events".if_supports_color(Stdout, |t| t.bold()));
    if details.recent_events.is_empty() {
        log::info!("  (none)");
    }
    for event in &details.recent_events {
        let mark = if event.participated {
            "yes".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "no".if_supports_color(Stdout, |t| t.red()).to_string()
        };
        log::info!("  {}  {}", or_dash(event.event_date.as_deref()), mark);
    }
    Ok(())
}

pub(crate) fn run_add(ctx: &Context, args: PlayerAddArgs) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let joined = match args.joined {
        Some(d) => normalize_date(&d)?,
        None => today(),
    };
    let player = NewPlayer {
        nickname: args.nickname,
        tag: args.tag,
        class_id: args.class_id,
        level: args.level,
        joined_date: Some(joined),
        guild_status: Some(args.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
    };
    let id = guildhall_db::create_player(&conn, &player)?;
    log::info!(
        "{} player {} (id {})",
        "Added".if_supports_color(Stdout, |t| t.green()),
        player.nickname.trim(),
        id,
    );
    Ok(())
}

pub(crate) fn run_update(ctx: &Context, args: PlayerUpdateArgs) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let class_id = if args.clear_class {
        Some(None)
    } else {
        args.class_id.map(Some)
    };
    let update = PlayerUpdate {
        nickname: args.nickname,
        tag: args.tag,
        class_id,
        level: args.level,
        joined_date: args.joined.as_deref().map(normalize_date).transpose()?,
        guild_status: args.status,
    };
    guildhall_db::update_player(&conn, args.id, &update)?;
    log::info!("Updated player {}", args.id);
    Ok(())
}

pub(crate) fn run_delete(ctx: &Context, id: i64, yes: bool) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let info = guildhall_db::get_player(&conn, id)?
        .ok_or_else(|| CliError::input(format!("No player with id {id}")))?;

    if !yes
        && !confirm(&format!(
            "Delete player {} and all of their activity, contribution and event records?",
            info.player.nickname
        ))?
    {
        log::info!("Cancelled.");
        return Ok(());
    }

    guildhall_db::delete_player(&conn, id)?;
    log::info!(
        "{} player {}",
        "Deleted".if_supports_color(Stdout, |t| t.red()),
        info.player.nickname,
    );
    Ok(())
}
