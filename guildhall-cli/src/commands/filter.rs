//! Quick filter over the player list.
//!
//! Rows are fetched once and filtered in memory with [`RowFilter`], so
//! matching is case-insensitive for Cyrillic text as well. `--live` reads
//! search text from stdin and re-filters after typing pauses.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use guildhall_core::{Debouncer, RowFilter, DEFAULT_SEARCH_DELAY};
use guildhall_db::{DisplayTable, PlayerView};

use crate::cli_types::FilterArgs;
use crate::{CliError, Context};

use super::{open_guild, print_table};

/// How long the live loop waits for input when nothing is pending.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

pub(crate) fn run_filter(ctx: &Context, args: FilterArgs) -> Result<(), CliError> {
    let view = if args.detailed {
        PlayerView::Detailed
    } else {
        PlayerView::Simple
    };
    let mode = args.mode.unwrap_or(ctx.settings.filter.mode);

    let conn = open_guild(ctx)?;
    let table = guildhall_db::player_rows(&conn, view)?;
    let column_filters = parse_column_filters(&table, &args.columns)?;
    log::debug!(
        "Filtering {} rows in {} mode over columns {:?}",
        table.len(),
        mode,
        view.search_columns()
    );

    let mut filter = RowFilter::new(mode);
    if args.live {
        return run_live(&table, view, &mut filter, &column_filters, args.text);
    }

    configure(&mut filter, view, args.text.as_deref(), &column_filters);
    show(&table, &filter);
    Ok(())
}

/// Text goes to the view's searchable columns; explicit column patterns
/// are added on top and win for the same column.
fn configure(
    filter: &mut RowFilter,
    view: PlayerView,
    text: Option<&str>,
    column_filters: &[(usize, String)],
) {
    let text = text.unwrap_or("");
    let combined = view
        .search_columns()
        .iter()
        .map(|&c| (c, text.to_string()))
        .filter(|(c, _)| !column_filters.iter().any(|(fc, _)| fc == c))
        .chain(column_filters.iter().cloned());
    filter.set_filters(combined);
}

fn show(table: &DisplayTable, filter: &RowFilter) {
    let rows = filter.apply(&table.rows);
    if rows.is_empty() {
        log::info!("No matching players.");
        return;
    }
    print_table(&table.columns, &rows);
    crate::log_blank();
    log::info!(
        "{}",
        format!("{} of {} players", rows.len(), table.len())
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
}

fn run_live(
    table: &DisplayTable,
    view: PlayerView,
    filter: &mut RowFilter,
    column_filters: &[(usize, String)],
    initial: Option<String>,
) -> Result<(), CliError> {
    let (tx, rx) = mpsc::channel::<std::io::Result<String>>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    log::info!("Type to filter; results refresh after a short pause. Ctrl-D to quit.");
    let mut first = true;
    live_loop(&rx, initial.unwrap_or_default(), DEFAULT_SEARCH_DELAY, |text| {
        if !first {
            crate::log_blank();
        }
        first = false;
        configure(filter, view, Some(text), column_filters);
        show(table, filter);
    })
}

/// Render `initial` at once, then re-render with the latest line each time
/// input has been quiet for `delay`. Returns when the sender hangs up.
fn live_loop(
    rx: &Receiver<std::io::Result<String>>,
    initial: String,
    delay: Duration,
    mut render: impl FnMut(&str),
) -> Result<(), CliError> {
    render(&initial);

    let mut debouncer = Debouncer::new(delay);
    let mut latest = initial;
    loop {
        let wait = debouncer.remaining(Instant::now()).unwrap_or(IDLE_WAIT);
        match rx.recv_timeout(wait) {
            Ok(line) => {
                latest = line?;
                debouncer.trigger(Instant::now());
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if debouncer.is_pending() {
                    render(&latest);
                }
                return Ok(());
            }
        }
        if debouncer.poll(Instant::now()) {
            render(&latest);
        }
    }
}

/// Parse `COLUMN=TEXT` pairs where COLUMN is a column name or index.
fn parse_column_filters(
    table: &DisplayTable,
    specs: &[String],
) -> Result<Vec<(usize, String)>, CliError> {
    specs
        .iter()
        .map(|spec| {
            let (column, text) = spec.split_once('=').ok_or_else(|| {
                CliError::input(format!("column filter '{spec}' must look like COLUMN=TEXT"))
            })?;
            let column = column.trim();
            let index = table
                .column_index(column)
                .or_else(|| column.parse::<usize>().ok())
                .filter(|&i| i < table.columns.len())
                .ok_or_else(|| {
                    CliError::input(format!(
                        "unknown column '{}' (available: {})",
                        column,
                        table.columns.join(", ")
                    ))
                })?;
            Ok((index, text.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildhall_core::MatchMode;

    fn table() -> DisplayTable {
        let row = |id: &str, nick: &str, tag: &str, status: &str| {
            vec![
                Some(id.to_string()),
                Some(nick.to_string()),
                Some(tag.to_string()),
                None,
                Some("10".to_string()),
                Some("2024-01-01".to_string()),
                Some(status.to_string()),
            ]
        };
        DisplayTable {
            columns: [
                "id",
                "nickname",
                "tag",
                "class_id",
                "level",
                "joined_date",
                "guild_status",
            ]
            .map(String::from)
            .to_vec(),
            rows: vec![
                row("1", "Игрок1", "#1000", "Активен"),
                row("2", "Игрок2", "#1001", "Неактивен"),
                row("3", "Strider", "#2000", "Активен"),
            ],
        }
    }

    #[test]
    fn column_specs_accept_names_and_indices() {
        let t = table();
        let parsed =
            parse_column_filters(&t, &["nickname=игрок".into(), "6=неактив".into()]).unwrap();
        assert_eq!(parsed, vec![(1, "игрок".to_string()), (6, "неактив".to_string())]);
    }

    #[test]
    fn bad_column_specs_are_rejected() {
        let t = table();
        assert!(parse_column_filters(&t, &["nickname".into()]).is_err());
        assert!(parse_column_filters(&t, &["bogus=x".into()]).is_err());
        assert!(parse_column_filters(&t, &["7=x".into()]).is_err());
    }

    #[test]
    fn text_searches_every_view_column() {
        let t = table();
        let mut filter = RowFilter::new(MatchMode::Any);
        configure(&mut filter, PlayerView::Simple, Some("ИГРОК"), &[]);
        assert_eq!(filter.apply(&t.rows).len(), 2);

        configure(&mut filter, PlayerView::Simple, Some("#2000"), &[]);
        let hits = filter.apply(&t.rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0][1].as_deref(), Some("Strider"));
    }

    #[test]
    fn column_pattern_overrides_text_for_its_column() {
        let t = table();
        let mut filter = RowFilter::new(MatchMode::All);
        configure(
            &mut filter,
            PlayerView::Simple,
            None,
            &[(1, "игрок".to_string()), (6, "неактив".to_string())],
        );
        let hits = filter.apply(&t.rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0][0].as_deref(), Some("2"));
    }

    #[test]
    fn live_search_starts_from_given_text() {
        let (tx, rx) = mpsc::channel();
        tx.send(Ok("игрок".to_string())).unwrap();
        drop(tx);

        let mut rendered = Vec::new();
        live_loop(&rx, "#2000".to_string(), Duration::from_millis(5), |text| {
            rendered.push(text.to_string())
        })
        .unwrap();
        assert_eq!(rendered, vec!["#2000", "игрок"]);
    }

    #[test]
    fn live_search_without_input_renders_once() {
        let (tx, rx) = mpsc::channel::<std::io::Result<String>>();
        drop(tx);

        let mut rendered = Vec::new();
        live_loop(&rx, String::new(), Duration::from_millis(5), |text| {
            rendered.push(text.to_string())
        })
        .unwrap();
        assert_eq!(rendered, vec![""]);
    }

    #[test]
    fn blank_text_shows_everything() {
        let t = table();
        let mut filter = RowFilter::new(MatchMode::Any);
        configure(&mut filter, PlayerView::Simple, Some("   "), &[]);
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&t.rows).len(), 3);
    }
}
