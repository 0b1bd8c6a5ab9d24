pub(crate) mod class;
pub(crate) mod config;
pub(crate) mod filter;
pub(crate) mod flights;
pub(crate) mod init;
pub(crate) mod player;
pub(crate) mod records;
pub(crate) mod reference;
pub(crate) mod search;
pub(crate) mod stats;

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;

use crate::{CliError, Context};

/// Widest a table cell may be before it is truncated.
const MAX_CELL_WIDTH: usize = 40;

/// Open the guild database, refusing to create one implicitly.
pub(crate) fn open_guild(ctx: &Context) -> Result<Connection, CliError> {
    open_existing(&ctx.db_path, "guildhall init", guildhall_db::open_database)
}

/// Open the flight database, refusing to create one implicitly.
pub(crate) fn open_flights(path: &Path) -> Result<Connection, CliError> {
    open_existing(path, "guildhall flights init", guildhall_db::open_flights_database)
}

fn open_existing(
    path: &Path,
    init_hint: &str,
    open: fn(&Path) -> Result<Connection, guildhall_db::SchemaError>,
) -> Result<Connection, CliError> {
    if !path.exists() {
        return Err(CliError::database(format!(
            "No database found at {} (run '{}' to create one)",
            path.display(),
            init_hint,
        )));
    }
    open(path).map_err(|e| {
        CliError::database(format!("Failed to open {}: {}", path.display(), e))
    })
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

/// `-` for missing values.
pub(crate) fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Print rows as an aligned text table with a bold header.
pub(crate) fn print_table<R>(columns: &[String], rows: &[R])
where
    R: AsRef<[Option<String>]>,
{
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..columns.len())
                .map(|i| {
                    let text = row.as_ref().get(i).and_then(|c| c.as_deref()).unwrap_or("");
                    truncate_str(text, MAX_CELL_WIDTH)
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| pad(name, *w))
        .collect::<Vec<_>>()
        .join("  ");
    log::info!("{}", header.if_supports_color(Stdout, |t| t.bold()));

    for row in &cells {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join("  ");
        log::info!("{}", line.trim_end());
    }
}

/// Left-align to a width counted in characters (Cyrillic is multi-byte).
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

/// Ask a yes/no question on stdin. Anything but "y"/"yes" is a no.
pub(crate) fn confirm(prompt: &str) -> Result<bool, CliError> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
