//! SQLite persistence layer for the guild manager.
//!
//! Provides schema creation and migration, record access with transactional
//! cascade delete and upserts, the parameterized search clause builder, and
//! the separate flight-records database.

pub mod flights;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod search;
pub mod seed;

pub use flights::{
    build_flight_clause, create_flight_schema, delete_flight, find_aircraft_by_model,
    find_airline_by_name, find_airport_by_code, find_status_by_name, get_flight,
    insert_aircraft_type, insert_airline, insert_airport, insert_flight, insert_status,
    list_aircraft_types,
    list_airlines, list_airports, list_flights, list_statuses, open_flights_database,
    open_flights_memory, search_flights, update_flight, AirportLabel, FlightCriteria,
};
pub use operations::{
    add_event, create_player, delete_class, delete_event, delete_player, find_class_by_name,
    find_player_by_nickname, get_player, get_player_activity, get_player_contribution,
    insert_class, list_classes, player_events, save_player, update_class, update_player,
    upsert_activity, upsert_contribution, OperationError,
};
pub use queries::{
    delete_reference_row, fetch_table, guild_stats, list_player_overview, list_players,
    player_rows, DisplayTable, GuildStats, PlayerView, ReferenceTable, UnknownTable,
};
pub use schema::{open_database, open_memory, SchemaError};
pub use search::{
    build_search_clause, search_players, DateRange, IntRange, PlayerCriteria, Range, SearchClause,
};
pub use seed::{seed_flights, seed_guild, FlightSeedStats, SeedError, SeedStats};
