//! Property tests for subject grouping and answer lookup.

use plotbot_core::{QaIndex, QaService, Row};
use proptest::prelude::*;

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        prop::sample::select(vec!["Math", "Science", "History", "Art"]),
        "[a-d]{1,2}\\?",
        "[a-z]{1,6}",
    )
        .prop_map(|(subject, question, answer)| Row::new(subject, question, answer))
}

proptest! {
    #[test]
    fn subjects_are_distinct_in_first_appearance_order(
        rows in prop::collection::vec(row_strategy(), 0..40)
    ) {
        let index = QaIndex::from_rows(rows.clone());

        let mut expected: Vec<String> = Vec::new();
        for row in &rows {
            if !expected.contains(&row.subject) {
                expected.push(row.subject.clone());
            }
        }

        prop_assert_eq!(index.subjects(), expected.as_slice());
    }

    #[test]
    fn questions_match_rows_of_subject(rows in prop::collection::vec(row_strategy(), 1..40)) {
        let index = QaIndex::from_rows(rows.clone());

        for subject in index.subjects() {
            let expected: Vec<String> = rows
                .iter()
                .filter(|row| &row.subject == subject)
                .map(|row| row.question.clone())
                .collect();
            prop_assert_eq!(index.questions(subject).unwrap(), expected.as_slice());
        }

        let total: usize =
            index.subjects().iter().map(|s| index.questions(s).unwrap().len()).sum();
        prop_assert_eq!(total, rows.len());
    }

    #[test]
    fn answer_comes_from_first_matching_row(
        rows in prop::collection::vec(row_strategy(), 1..40),
        question in "[a-d]{1,2}\\?"
    ) {
        let service = QaService::from_rows(rows.clone());
        let answer = service.answer(&question).unwrap();

        match rows.iter().find(|row| row.question == question) {
            Some(row) => prop_assert_eq!(answer.answer, row.answer.clone()),
            None => prop_assert!(answer.is_fallback()),
        }
    }

    #[test]
    fn unknown_subject_is_not_found(rows in prop::collection::vec(row_strategy(), 0..20)) {
        let service = QaService::from_rows(rows);
        prop_assert!(service.questions("Geography").is_err());
    }
}
