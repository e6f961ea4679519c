//! Structured error types for data loading and lookups.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons the data file could not be turned into indexes.
///
/// Loading is all or nothing: any of these leaves the service without data.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The configured path does not exist
    #[error("data file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be opened or read
    #[error("failed to read data file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row lacks one or more required columns
    #[error(
        "CSV must contain the columns: subject, question, answer (missing: {})",
        .missing.join(", ")
    )]
    MissingColumns { missing: Vec<String> },

    /// Malformed CSV, e.g. a record with the wrong number of fields
    #[error("failed to parse CSV data: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    /// Short category name used as a structured logging field.
    pub fn category(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "not_found",
            LoadError::Io { .. } => "io",
            LoadError::MissingColumns { .. } => "missing_columns",
            LoadError::Csv(_) => "parse",
        }
    }
}

/// Failures of the read operations.
///
/// The messages are part of the HTTP contract and are returned verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No usable data was loaded at startup
    #[error("API Data failed to load.")]
    DataUnavailable,

    /// The subject is not a key of the question index
    #[error("Subject '{subject}' not found.")]
    SubjectNotFound { subject: String },
}
