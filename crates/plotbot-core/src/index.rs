//! Immutable indexes over the loaded row table.

use std::collections::HashMap;

use crate::types::Row;

/// Subject list, per-subject question lists and the row table, built once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaIndex {
    /// Distinct subjects in first-appearance order
    subjects: Vec<String>,
    /// Questions per subject in row order, duplicates kept
    questions: HashMap<String, Vec<String>>,
    /// Every row in file order
    rows: Vec<Row>,
    /// Position of the first row carrying each question
    first_match: HashMap<String, usize>,
}

impl QaIndex {
    /// Group `rows` by subject.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut subjects = Vec::new();
        let mut questions: HashMap<String, Vec<String>> = HashMap::new();
        let mut first_match = HashMap::with_capacity(rows.len());

        for (position, row) in rows.iter().enumerate() {
            match questions.get_mut(&row.subject) {
                Some(list) => list.push(row.question.clone()),
                None => {
                    subjects.push(row.subject.clone());
                    questions.insert(row.subject.clone(), vec![row.question.clone()]);
                }
            }
            first_match.entry(row.question.clone()).or_insert(position);
        }

        Self { subjects, questions, rows, first_match }
    }

    /// Subjects in the order they first appear in the table.
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Questions of `subject`, compared by exact equality.
    pub fn questions(&self, subject: &str) -> Option<&[String]> {
        self.questions.get(subject).map(Vec::as_slice)
    }

    /// Answer of the first row whose question equals `question` byte for byte.
    pub fn find_answer(&self, question: &str) -> Option<&str> {
        self.first_match.get(question).map(|&position| self.rows[position].answer.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of the startup load.
///
/// There is no transition between the two states: whichever is produced at
/// startup is served for the life of the process.
#[derive(Debug, Clone)]
pub enum Dataset {
    /// The data file was read and indexed
    Loaded(QaIndex),
    /// Loading failed; every data query reports the service as unavailable
    Unavailable { reason: String },
}

impl Dataset {
    /// The index, if loading succeeded.
    pub fn index(&self) -> Option<&QaIndex> {
        match self {
            Dataset::Loaded(index) => Some(index),
            Dataset::Unavailable { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Dataset::Loaded(_))
    }
}

impl From<QaIndex> for Dataset {
    fn from(index: QaIndex) -> Self {
        Dataset::Loaded(index)
    }
}
