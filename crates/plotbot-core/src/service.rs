//! Read operations over the startup dataset.

use std::sync::Arc;

use tracing::debug;

use crate::error::QueryError;
use crate::index::{Dataset, QaIndex};
use crate::types::{Answer, FALLBACK_ANSWER, Row};

/// Query handle shared by every request handler.
///
/// Cloning is cheap; all clones read the same immutable dataset without
/// locking.
#[derive(Debug, Clone)]
pub struct QaService {
    dataset: Arc<Dataset>,
}

impl QaService {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset: Arc::new(dataset) }
    }

    /// Service over an in-memory table.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(Dataset::Loaded(QaIndex::from_rows(rows)))
    }

    /// Service that answers every data query with [`QueryError::DataUnavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(Dataset::Unavailable { reason: reason.into() })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn index(&self) -> Result<&QaIndex, QueryError> {
        self.dataset.index().ok_or(QueryError::DataUnavailable)
    }

    /// Subjects in first-appearance order.
    pub fn subjects(&self) -> Result<&[String], QueryError> {
        Ok(self.index()?.subjects())
    }

    /// Questions of `subject` in row order.
    pub fn questions(&self, subject: &str) -> Result<&[String], QueryError> {
        self.index()?
            .questions(subject)
            .ok_or_else(|| QueryError::SubjectNotFound { subject: subject.to_string() })
    }

    /// Answer for `question`, falling back to [`FALLBACK_ANSWER`] when no row
    /// matches. A loaded but empty table counts as unavailable.
    pub fn answer(&self, question: &str) -> Result<Answer, QueryError> {
        let index = self.index()?;
        if index.is_empty() {
            return Err(QueryError::DataUnavailable);
        }

        let answer = match index.find_answer(question) {
            Some(answer) => answer,
            None => {
                debug!(question, "No row matches question, using fallback answer");
                FALLBACK_ANSWER
            }
        };

        Ok(Answer { question: question.to_string(), answer: answer.to_string() })
    }
}
