use guildhall_catalog::types::PlayerOverview;
use guildhall_core::normalize_date;
use guildhall_db::{DateRange, IntRange, PlayerCriteria};

use crate::cli_types::SearchArgs;
use crate::{CliError, Context};

use super::{open_guild, or_dash, print_table};

pub(crate) fn run_search(ctx: &Context, args: SearchArgs) -> Result<(), CliError> {
    let criteria = criteria_from_args(args)?;
    let conn = open_guild(ctx)?;
    let players = guildhall_db::search_players(&conn, &criteria)?;

    if players.is_empty() {
        log::info!("No players match.");
        return Ok(());
    }

    let columns = [
        "id", "nickname", "tag", "class", "level", "joined", "status", "damage", "raids",
        "rank", "resources",
    ]
    .map(String::from);
    let rows: Vec<Vec<Option<String>>> = players.iter().map(overview_cells).collect();
    print_table(&columns, &rows);
    crate::log_blank();
    log::info!("{} players found", players.len());
    Ok(())
}

fn criteria_from_args(args: SearchArgs) -> Result<PlayerCriteria, CliError> {
    let date = |value: Option<String>| -> Result<Option<String>, CliError> {
        Ok(value.as_deref().map(normalize_date).transpose()?)
    };
    Ok(PlayerCriteria {
        text: args.text,
        nickname: args.nickname,
        tag: args.tag,
        status: args.status,
        role: args.role,
        class_name: args.class_name,
        level: IntRange::new(args.level_min, args.level_max),
        contribution: IntRange::new(args.contribution_min, args.contribution_max),
        damage: IntRange::new(args.damage_min, args.damage_max),
        raid: IntRange::new(args.raid_min, args.raid_max),
        joined: DateRange::new(date(args.joined_from)?, date(args.joined_to)?),
    })
}

fn overview_cells(p: &PlayerOverview) -> Vec<Option<String>> {
    vec![
        Some(p.id.to_string()),
        Some(p.nickname.clone()),
        Some(p.tag.clone()),
        p.class_name.clone(),
        p.level.map(|l| l.to_string()),
        p.joined_date.clone(),
        Some(or_dash(p.guild_status.as_deref())),
        Some(p.weekly_damage.to_string()),
        Some(p.raid_participation.to_string()),
        Some(p.leadership_rank.clone()),
        Some(p.resources_contributed.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SearchArgs {
        SearchArgs {
            text: None,
            nickname: None,
            tag: None,
            status: None,
            role: None,
            class_name: None,
            level_min: None,
            level_max: None,
            contribution_min: None,
            contribution_max: None,
            damage_min: None,
            damage_max: None,
            raid_min: None,
            raid_max: None,
            joined_from: None,
            joined_to: None,
        }
    }

    #[test]
    fn empty_args_give_empty_criteria() {
        assert_eq!(criteria_from_args(args()).unwrap(), PlayerCriteria::default());
    }

    #[test]
    fn ranges_and_dates_are_carried_over() {
        let criteria = criteria_from_args(SearchArgs {
            level_min: Some(10),
            raid_max: Some(5),
            joined_from: Some("2024-03-01".into()),
            ..args()
        })
        .unwrap();
        assert_eq!(criteria.level, IntRange::at_least(10));
        assert_eq!(criteria.raid, IntRange::at_most(5));
        assert_eq!(criteria.joined, DateRange::at_least("2024-03-01".to_string()));
    }

    #[test]
    fn bad_dates_are_input_errors() {
        let err = criteria_from_args(SearchArgs {
            joined_to: Some("not a date".into()),
            ..args()
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Input(_)));
    }
}
