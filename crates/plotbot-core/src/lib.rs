//! Core functionality for the PlotBot question/answer service.
//!
//! This crate loads a flat `(subject, question, answer)` table once, groups it
//! by subject and answers read-only lookups against the resulting immutable
//! indexes. The HTTP surface lives in `plotbot-api`.

/// Error types for loading and querying
pub mod error;
/// Subject and question indexes built from the row table
pub mod index;
/// CSV data loading
pub mod loader;
/// Read-only query operations shared by request handlers
pub mod service;
/// Row and answer types
pub mod types;

pub use error::{LoadError, QueryError};
pub use index::{Dataset, QaIndex};
pub use loader::{load, load_from_reader, try_load};
pub use service::QaService;
pub use types::{Answer, FALLBACK_ANSWER, REQUIRED_COLUMNS, Row};
