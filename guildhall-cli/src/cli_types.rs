//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use guildhall_core::MatchMode;
use guildhall_db::ReferenceTable;

#[derive(Parser)]
#[command(name = "guildhall")]
#[command(about = "Manage guild player records in a local SQLite database", long_about = None)]
pub(crate) struct Cli {
    /// Guild database file (overrides GUILDHALL_DB and settings)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the database, optionally loading demo data
    Init {
        /// YAML seed file or directory to load after creating the schema
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Load demo data from a YAML file or directory
    Seed {
        /// Seed file or directory of .yaml files
        path: PathBuf,
    },

    /// Show row counts for every table
    Stats,

    /// Manage players
    Player {
        #[command(subcommand)]
        action: PlayerAction,
    },

    /// Set a player's weekly activity
    Activity {
        #[command(subcommand)]
        action: ActivityAction,
    },

    /// Set a player's guild contribution
    Contribution {
        #[command(subcommand)]
        action: ContributionAction,
    },

    /// Record or review event participation
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Manage character classes
    Class {
        #[command(subcommand)]
        action: ClassAction,
    },

    /// View or prune reference tables
    Reference {
        #[command(subcommand)]
        action: ReferenceAction,
    },

    /// Quick filter over the player list (same text across the searchable columns)
    Filter(FilterArgs),

    /// Advanced player search
    Search(SearchArgs),

    /// Flight-records database
    Flights {
        /// Flight database file (default: flights.db next to the guild database)
        #[arg(long, global = true)]
        flights_db: Option<PathBuf>,

        #[command(subcommand)]
        action: FlightsAction,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// ── Players ─────────────────────────────────────────────────────────────────

#[derive(Subcommand)]
pub(crate) enum PlayerAction {
    /// List players
    List {
        /// Include class, activity and contribution columns
        #[arg(long)]
        detailed: bool,
    },

    /// Show one player with activity, contribution and recent events
    Show {
        id: i64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a player
    Add(PlayerAddArgs),

    /// Change selected fields of a player
    Update(PlayerUpdateArgs),

    /// Delete a player and all of their records
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub(crate) struct PlayerAddArgs {
    #[arg(long)]
    pub nickname: String,

    #[arg(long)]
    pub tag: String,

    #[arg(long)]
    pub class_id: Option<i64>,

    #[arg(long)]
    pub level: Option<i64>,

    /// Join date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub joined: Option<String>,

    /// Guild status (default: Активен)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub(crate) struct PlayerUpdateArgs {
    pub id: i64,

    #[arg(long)]
    pub nickname: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long, conflicts_with = "clear_class")]
    pub class_id: Option<i64>,

    /// Remove the player's class
    #[arg(long)]
    pub clear_class: bool,

    #[arg(long)]
    pub level: Option<i64>,

    #[arg(long)]
    pub joined: Option<String>,

    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum ActivityAction {
    /// Insert or update activity; omitted fields keep their value
    Set {
        player_id: i64,

        #[arg(long)]
        damage: Option<i64>,

        #[arg(long)]
        raids: Option<i64>,

        #[arg(long)]
        crafts: Option<i64>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ContributionAction {
    /// Insert or update contribution; omitted fields keep their value
    Set {
        player_id: i64,

        #[arg(long)]
        resources: Option<i64>,

        #[arg(long)]
        help: Option<i64>,

        #[arg(long)]
        rank: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum EventAction {
    /// Record an event for a player
    Add {
        player_id: i64,

        /// Event date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// The player did not take part
        #[arg(long)]
        missed: bool,
    },

    /// Show a player's most recent events
    List {
        player_id: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Delete one event row
    Delete { id: i64 },
}

// ── Reference data ──────────────────────────────────────────────────────────

#[derive(Subcommand)]
pub(crate) enum ClassAction {
    /// List classes
    List,

    /// Add a class
    Add {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Rename a class and replace its description
    Update {
        id: i64,
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a class that no player uses
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub(crate) enum ReferenceAction {
    /// Print a table (classes, activity, contribution, events)
    Show { table: ReferenceTable },

    /// Delete one row by ID
    Delete {
        table: ReferenceTable,
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

// ── Search ──────────────────────────────────────────────────────────────────

#[derive(Args)]
pub(crate) struct FilterArgs {
    /// Text to look for (case-insensitive substring)
    pub text: Option<String>,

    /// Filter the detailed view instead of the simple one
    #[arg(long)]
    pub detailed: bool,

    /// Any or all configured columns must match (default from settings)
    #[arg(long)]
    pub mode: Option<MatchMode>,

    /// Per-column pattern, COLUMN=TEXT (column name or index); repeatable
    #[arg(short, long = "column", value_name = "COLUMN=TEXT")]
    pub columns: Vec<String>,

    /// Read search text line by line from stdin, re-filtering after a pause
    /// (TEXT, if given, is the starting search)
    #[arg(long)]
    pub live: bool,
}

#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Substring of nickname, tag or status
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub nickname: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    /// Exact guild status
    #[arg(long)]
    pub status: Option<String>,

    /// Exact leadership rank
    #[arg(long)]
    pub role: Option<String>,

    /// Exact class name
    #[arg(long = "class")]
    pub class_name: Option<String>,

    #[arg(long)]
    pub level_min: Option<i64>,

    #[arg(long)]
    pub level_max: Option<i64>,

    #[arg(long)]
    pub contribution_min: Option<i64>,

    #[arg(long)]
    pub contribution_max: Option<i64>,

    #[arg(long)]
    pub damage_min: Option<i64>,

    #[arg(long)]
    pub damage_max: Option<i64>,

    #[arg(long)]
    pub raid_min: Option<i64>,

    #[arg(long)]
    pub raid_max: Option<i64>,

    /// Joined on or after, YYYY-MM-DD
    #[arg(long)]
    pub joined_from: Option<String>,

    /// Joined on or before, YYYY-MM-DD
    #[arg(long)]
    pub joined_to: Option<String>,
}

// ── Flights ─────────────────────────────────────────────────────────────────

#[derive(Subcommand)]
pub(crate) enum FlightsAction {
    /// Create the flight database, optionally loading demo data
    Init {
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Load flight demo data from YAML
    Seed { path: PathBuf },

    /// List flights
    List {
        /// Show airport names instead of codes
        #[arg(long)]
        names: bool,
    },

    /// Add a flight; references are given by natural key
    Add(FlightAddArgs),

    /// Delete a flight
    Delete { id: i64 },

    /// Search flights
    Search(FlightSearchArgs),

    /// Airlines, aircraft types, airports and statuses
    Reference {
        #[command(subcommand)]
        action: FlightReferenceAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum FlightReferenceAction {
    /// List all reference data
    List,

    /// Add one reference row
    Add {
        #[command(subcommand)]
        item: FlightReferenceItem,
    },
}

#[derive(Subcommand)]
pub(crate) enum FlightReferenceItem {
    Airline {
        name: String,

        #[arg(long)]
        country: Option<String>,
    },

    Aircraft {
        model: String,

        #[arg(long)]
        manufacturer: Option<String>,

        #[arg(long)]
        capacity: Option<i64>,
    },

    /// Airports are referred to by code (stored upper-case)
    Airport {
        code: String,
        name: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },

    Status { name: String },
}

#[derive(Args)]
pub(crate) struct FlightAddArgs {
    #[arg(long)]
    pub number: String,

    /// Airline name
    #[arg(long)]
    pub airline: Option<String>,

    /// Aircraft model
    #[arg(long)]
    pub aircraft: Option<String>,

    /// Departure airport code
    #[arg(long)]
    pub from: Option<String>,

    /// Arrival airport code
    #[arg(long)]
    pub to: Option<String>,

    /// YYYY-MM-DD HH:MM
    #[arg(long)]
    pub departure: Option<String>,

    /// YYYY-MM-DD HH:MM
    #[arg(long)]
    pub arrival: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub gate: Option<String>,
}

#[derive(Args)]
pub(crate) struct FlightSearchArgs {
    /// Substring of flight number, airline or airport name
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub airline: Option<String>,

    /// Departure airport name contains
    #[arg(long)]
    pub from: Option<String>,

    /// Arrival airport name contains
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub gate: Option<String>,

    /// Exact status
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub departs_after: Option<String>,

    #[arg(long)]
    pub departs_before: Option<String>,

    #[arg(long)]
    pub arrives_after: Option<String>,

    #[arg(long)]
    pub arrives_before: Option<String>,
}

// ── Config ──────────────────────────────────────────────────────────────────

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and where they come from
    Show,

    /// Print the settings file path
    Path,

    /// Store the guild database path in settings
    SetDb { path: PathBuf },

    /// Store the flight database path in settings
    SetFlightsDb { path: PathBuf },

    /// Store the default filter mode (any or all)
    SetMode { mode: MatchMode },
}
