//! Error types for the simulator

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading reference data or running a simulation
///
/// An unreachable break-even is not an error; see [`crate::BreakEven`].
#[derive(Error, Debug)]
pub enum Error {
    /// A GPU selection names a model missing from the catalog
    #[error("Unknown GPU model: {model}")]
    UnknownModel { model: String },

    /// The input names a competitor offer missing from the table
    #[error("Unknown competitor offer: {name}")]
    UnknownCompetitor { name: String },

    /// An input value violates its invariant
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A reference table violates its invariant
    #[error("Invalid {table} table: {reason}")]
    InvalidReference { table: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_reference(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidReference {
            table: table.into(),
            reason: reason.into(),
        }
    }
}
