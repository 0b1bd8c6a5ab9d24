use thiserror::Error;

use guildhall_db::OperationError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Opening or migrating the database failed
    #[error("Database error: {0}")]
    Database(String),

    /// A record operation was rejected or failed
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// Bad command-line input (dates, unknown names, missing fields)
    #[error("Invalid input: {0}")]
    Input(String),

    /// Seed file could not be loaded or applied
    #[error("Seed error: {0}")]
    Seed(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub(crate) fn seed(msg: impl Into<String>) -> Self {
        Self::Seed(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<guildhall_core::DateError> for CliError {
    fn from(e: guildhall_core::DateError) -> Self {
        Self::Input(e.to_string())
    }
}
