//! Error types for benefit-graph
//!
//! Only conditions that stop the pipeline are errors. Everything caused by
//! the shape of a particular export (missing anchor, ragged rows, references
//! to items that do not exist) is recovered where it happens and reported
//! through logging and the extraction report instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input CSV does not exist
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A column address that is not made of letters A-Z
    #[error("invalid column address: {0:?}")]
    InvalidAddress(String),

    /// Inconsistent configuration (e.g. overlapping dependency ranges)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::FileNotFound(PathBuf::from("missing.csv"));
        assert_eq!(err.to_string(), "input file not found: missing.csv");

        let err = Error::InvalidAddress("A1".into());
        assert_eq!(err.to_string(), "invalid column address: \"A1\"");
    }
}
