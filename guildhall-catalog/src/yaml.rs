//! YAML loading for demo/seed data.
//!
//! A seed source is either a single `.yaml` file or a directory of them.
//! Directory entries are read in file-name order and merged, so large
//! rosters can be split across several files.

use crate::types::{FlightSeed, GuildSeed};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("Seed source not found: {0}")]
    NotFound(String),
}

/// Seed documents that can be concatenated.
pub trait Mergeable: serde::de::DeserializeOwned + Default {
    fn merge(&mut self, other: Self);
}

impl Mergeable for GuildSeed {
    fn merge(&mut self, other: Self) {
        self.classes.extend(other.classes);
        self.players.extend(other.players);
    }
}

impl Mergeable for FlightSeed {
    fn merge(&mut self, other: Self) {
        self.airlines.extend(other.airlines);
        self.aircraft_types.extend(other.aircraft_types);
        self.airports.extend(other.airports);
        self.statuses.extend(other.statuses);
        self.flights.extend(other.flights);
    }
}

/// Load guild seed data from a YAML file or directory.
pub fn load_guild_seed(path: &Path) -> Result<GuildSeed, YamlError> {
    load_seed(path)
}

/// Load flight seed data from a YAML file or directory.
pub fn load_flight_seed(path: &Path) -> Result<FlightSeed, YamlError> {
    load_seed(path)
}

/// Parse a seed document from a YAML string.
pub fn parse_seed<T: Mergeable>(contents: &str, origin: &str) -> Result<T, YamlError> {
    serde_yml::from_str(contents).map_err(|e| YamlError::Parse {
        path: origin.to_string(),
        source: e,
    })
}

/// Generic helper: load one file, or every YAML file in a directory merged in name order.
fn load_seed<T: Mergeable>(path: &Path) -> Result<T, YamlError> {
    if !path.exists() {
        return Err(YamlError::NotFound(path.display().to_string()));
    }
    if path.is_file() {
        return load_file(path);
    }

    let mut entries: Vec<_> = std::fs::read_dir(path)
        .map_err(|e| YamlError::Io {
            path: path.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut merged = T::default();
    for entry in entries {
        merged.merge(load_file(&entry.path())?);
    }
    Ok(merged)
}

fn load_file<T: Mergeable>(path: &Path) -> Result<T, YamlError> {
    let contents = std::fs::read_to_string(path).map_err(|e| YamlError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed(&contents, &path.display().to_string())
}
