use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use guildhall_db::ReferenceTable;

use crate::{CliError, Context};

use super::{confirm, open_guild, print_table};

pub(crate) fn run_show(ctx: &Context, table: ReferenceTable) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let rows = guildhall_db::fetch_table(&conn, table)?;

    log::info!("{}", table.if_supports_color(Stdout, |t| t.bold()));
    if rows.is_empty() {
        log::info!("  (empty)");
        return Ok(());
    }
    print_table(&rows.columns, &rows.rows);
    crate::log_blank();
    log::info!("{} rows", rows.len());
    Ok(())
}

pub(crate) fn run_delete(
    ctx: &Context,
    table: ReferenceTable,
    id: i64,
    yes: bool,
) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    if !yes && !confirm(&format!("Delete row {id} from {table}?"))? {
        log::info!("Cancelled.");
        return Ok(());
    }
    guildhall_db::delete_reference_row(&conn, table, id)?;
    log::info!("Deleted row {id} from {table}");
    Ok(())
}
