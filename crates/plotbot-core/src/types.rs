use serde::{Deserialize, Serialize};

/// Answer returned when no row matches the requested question.
pub const FALLBACK_ANSWER: &str =
    "I'm sorry, I could not find a specific answer for that question in my database.";

/// Header columns every data file must provide. Any other column is ignored.
pub const REQUIRED_COLUMNS: [&str; 3] = ["subject", "question", "answer"];

/// One `(subject, question, answer)` record from the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Grouping category shown in the main menu
    pub subject: String,
    /// Question text, matched byte for byte
    pub question: String,
    /// Answer text returned for the question
    pub answer: String,
}

impl Row {
    /// Build a row from anything convertible to strings.
    pub fn new(
        subject: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self { subject: subject.into(), question: question.into(), answer: answer.into() }
    }
}

/// Result of an answer lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The question exactly as it was asked
    pub question: String,
    /// Matched answer, or [`FALLBACK_ANSWER`]
    pub answer: String,
}

impl Answer {
    /// True when no row matched and the fallback sentence was used.
    pub fn is_fallback(&self) -> bool {
        self.answer == FALLBACK_ANSWER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_new_accepts_str_and_string() {
        let row = Row::new("Math", String::from("2+2?"), "4");
        assert_eq!(row.subject, "Math");
        assert_eq!(row.question, "2+2?");
        assert_eq!(row.answer, "4");
    }

    #[test]
    fn test_answer_is_fallback() {
        let found = Answer { question: "2+2?".into(), answer: "4".into() };
        let missing = Answer { question: "9+9?".into(), answer: FALLBACK_ANSWER.into() };
        assert!(!found.is_fallback());
        assert!(missing.is_fallback());
    }
}
