use guildhall_db::OperationError;

use crate::{CliError, Context};

use super::{open_guild, or_dash, print_table};

pub(crate) fn run_list(ctx: &Context) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let classes = guildhall_db::list_classes(&conn)?;
    if classes.is_empty() {
        log::info!("No classes defined.");
        return Ok(());
    }

    let columns = ["id", "name", "description"].map(String::from);
    let rows: Vec<Vec<Option<String>>> = classes
        .into_iter()
        .map(|c| vec![Some(c.id.to_string()), Some(c.name), c.description])
        .collect();
    print_table(&columns, &rows);
    Ok(())
}

pub(crate) fn run_add(ctx: &Context, name: &str, description: Option<&str>) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    let id = guildhall_db::insert_class(&conn, name, description)?;
    log::info!("Added class {} (id {id})", name.trim());
    Ok(())
}

pub(crate) fn run_update(
    ctx: &Context,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    guildhall_db::update_class(&conn, id, name, description)?;
    log::info!("Class {id} is now {} ({})", name.trim(), or_dash(description));
    Ok(())
}

pub(crate) fn run_delete(ctx: &Context, id: i64) -> Result<(), CliError> {
    let conn = open_guild(ctx)?;
    match guildhall_db::delete_class(&conn, id) {
        Ok(()) => {
            log::info!("Deleted class {id}");
            Ok(())
        }
        Err(OperationError::Constraint(_)) => Err(CliError::input(format!(
            "class {id} is still assigned to players; reassign them first"
        ))),
        Err(e) => Err(e.into()),
    }
}
