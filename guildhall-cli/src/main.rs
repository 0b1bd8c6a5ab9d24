//! guildhall CLI
//!
//! Command-line front end for the guild player database and the companion
//! flight-records database.

mod cli_types;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;

use clap::Parser;

use guildhall_core::settings::{resolve_db_path, resolve_flights_db_path};
use guildhall_core::{load_settings, Settings};

use cli_types::*;
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

/// Resolved global options shared by every command.
pub(crate) struct Context {
    pub db_path: PathBuf,
    pub settings: Settings,
}

impl Context {
    pub(crate) fn flights_db_path(&self, flag: Option<PathBuf>) -> PathBuf {
        resolve_flights_db_path(flag, &self.settings, &self.db_path)
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to initialise logging: {e}");
        std::process::exit(2);
    }

    let settings = load_settings();
    let ctx = Context {
        db_path: resolve_db_path(cli.db.clone(), &settings),
        settings,
    };
    log::debug!("Using database {}", ctx.db_path.display());

    if let Err(e) = run(&ctx, cli.command) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    use commands::*;

    match command {
        Commands::Init { seed } => init::run_init(ctx, seed.as_deref()),
        Commands::Seed { path } => init::run_seed(ctx, &path),
        Commands::Stats => stats::run_stats(ctx),
        Commands::Player { action } => match action {
            PlayerAction::List { detailed } => player::run_list(ctx, detailed),
            PlayerAction::Show { id, json } => player::run_show(ctx, id, json),
            PlayerAction::Add(args) => player::run_add(ctx, args),
            PlayerAction::Update(args) => player::run_update(ctx, args),
            PlayerAction::Delete { id, yes } => player::run_delete(ctx, id, yes),
        },
        Commands::Activity {
            action:
                ActivityAction::Set {
                    player_id,
                    damage,
                    raids,
                    crafts,
                },
        } => records::run_activity_set(ctx, player_id, damage, raids, crafts),
        Commands::Contribution {
            action:
                ContributionAction::Set {
                    player_id,
                    resources,
                    help,
                    rank,
                },
        } => records::run_contribution_set(ctx, player_id, resources, help, rank),
        Commands::Event { action } => match action {
            EventAction::Add {
                player_id,
                date,
                missed,
            } => records::run_event_add(ctx, player_id, date, !missed),
            EventAction::List { player_id, limit } => {
                records::run_event_list(ctx, player_id, limit)
            }
            EventAction::Delete { id } => records::run_event_delete(ctx, id),
        },
        Commands::Class { action } => match action {
            ClassAction::List => class::run_list(ctx),
            ClassAction::Add { name, description } => {
                class::run_add(ctx, &name, description.as_deref())
            }
            ClassAction::Update {
                id,
                name,
                description,
            } => class::run_update(ctx, id, &name, description.as_deref()),
            ClassAction::Delete { id } => class::run_delete(ctx, id),
        },
        Commands::Reference { action } => match action {
            ReferenceAction::Show { table } => reference::run_show(ctx, table),
            ReferenceAction::Delete { table, id, yes } => {
                reference::run_delete(ctx, table, id, yes)
            }
        },
        Commands::Filter(args) => filter::run_filter(ctx, args),
        Commands::Search(args) => search::run_search(ctx, args),
        Commands::Flights { flights_db, action } => {
            let path = ctx.flights_db_path(flights_db);
            match action {
                FlightsAction::Init { seed } => flights::run_init(&path, seed.as_deref()),
                FlightsAction::Seed { path: seed } => flights::run_seed(&path, &seed),
                FlightsAction::List { names } => flights::run_list(&path, names),
                FlightsAction::Add(args) => flights::run_add(&path, args),
                FlightsAction::Delete { id } => flights::run_delete(&path, id),
                FlightsAction::Search(args) => flights::run_search(&path, args),
                FlightsAction::Reference { action } => match action {
                    FlightReferenceAction::List => flights::run_reference_list(&path),
                    FlightReferenceAction::Add { item } => flights::run_reference_add(&path, item),
                },
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::run_config_show(ctx);
                Ok(())
            }
            ConfigAction::Path => {
                config::run_config_path();
                Ok(())
            }
            ConfigAction::SetDb { path } => config::run_config_set_db(path),
            ConfigAction::SetFlightsDb { path } => config::run_config_set_flights_db(path),
            ConfigAction::SetMode { mode } => config::run_config_set_mode(mode),
        },
    }
}
