//! Guild data model types and YAML seed loading.
//!
//! This crate defines the persistent data model without any database
//! dependencies. Consumers can use these types directly for serialization,
//! display, or passing to `guildhall-db` for persistence.

pub mod types;
pub mod yaml;

pub use types::*;
pub use yaml::{load_flight_seed, load_guild_seed, parse_seed, YamlError};
