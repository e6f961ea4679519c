//! Startup loading of the question table.
//!
//! The table is a CSV file with a header row naming at least the
//! [`REQUIRED_COLUMNS`]. Columns may appear in any order and extra columns are
//! ignored. Field values are kept as-is: no trimming, no type coercion.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, error, info};

use crate::error::LoadError;
use crate::index::{Dataset, QaIndex};
use crate::types::{REQUIRED_COLUMNS, Row};

/// Load `path` for serving.
///
/// Never fails: on any error the diagnostic is logged and
/// [`Dataset::Unavailable`] is returned so the service can start degraded.
pub fn load(path: impl AsRef<Path>) -> Dataset {
    let path = path.as_ref();
    match try_load(path) {
        Ok(index) => {
            info!(
                path = %path.display(),
                rows = index.row_count(),
                subjects = index.subject_count(),
                "Loaded question data"
            );
            Dataset::Loaded(index)
        }
        Err(err) => {
            error!(
                path = %path.display(),
                category = err.category(),
                error = %err,
                "Failed to load question data, serving without data"
            );
            Dataset::Unavailable { reason: err.to_string() }
        }
    }
}

/// Load `path`, returning the first error encountered.
pub fn try_load(path: impl AsRef<Path>) -> Result<QaIndex, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Io { path: path.to_path_buf(), source },
    })?;
    debug!(path = %path.display(), "Reading question data");
    load_from_reader(file)
}

/// Parse CSV from any reader and build the indexes.
pub fn load_from_reader<R: Read>(reader: R) -> Result<QaIndex, LoadError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let columns = Columns::locate(reader.headers()?)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(columns.row(&record?));
    }

    Ok(QaIndex::from_rows(rows))
}

/// Positions of the required columns within a record.
#[derive(Debug, Clone, Copy)]
struct Columns {
    subject: usize,
    question: usize,
    answer: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let position = |name: &str| headers.iter().position(|header| header == name);

        let found = REQUIRED_COLUMNS.map(position);
        match found {
            [Some(subject), Some(question), Some(answer)] => {
                Ok(Self { subject, question, answer })
            }
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .zip(found)
                    .filter(|(_, position)| position.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                Err(LoadError::MissingColumns { missing })
            }
        }
    }

    fn row(&self, record: &csv::StringRecord) -> Row {
        let field = |index: usize| record.get(index).unwrap_or_default();
        Row::new(field(self.subject), field(self.question), field(self.answer))
    }
}
