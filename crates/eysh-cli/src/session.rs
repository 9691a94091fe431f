//! Diagnostic-test session files.
//!
//! A session is JSON with either pre-graded `results` or raw `answers`
//! that are graded against a question bank:
//!
//! ```json
//! { "user_id": "u-1", "answers": [{ "question_id": "alg-1", "answer": 2 }] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use eysh_core::grading::{grade_submission, normalize_topic, GradedSession};
use eysh_core::model::{AnswerSubmission, QuestionResult};
use eysh_core::parser::load_bank_path;
use eysh_core::report::load_json;

#[derive(Debug, Deserialize)]
pub struct SessionFile {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub results: Vec<QuestionResult>,
    #[serde(default)]
    pub answers: Vec<AnswerSubmission>,
    /// Overrides the wrong topics derived from grading.
    #[serde(default)]
    pub topics_wrong: Option<Vec<String>>,
}

impl SessionFile {
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path).context("failed to load session")
    }

    /// Grade `answers` against the bank, or take `results` as already graded.
    pub fn grade(&self, bank: Option<&Path>) -> Result<GradedSession> {
        let mut graded = if self.answers.is_empty() {
            GradedSession::from_results(self.results.clone())
        } else {
            let Some(bank_path) = bank else {
                anyhow::bail!("session contains answers; pass --bank to grade them");
            };
            let bank = load_bank_path(bank_path)?;
            let graded = grade_submission(&bank, &self.answers);
            if !graded.unknown_questions.is_empty() {
                tracing::warn!(
                    count = graded.unknown_questions.len(),
                    "answers reference questions missing from {}",
                    bank_path.display()
                );
            }
            graded
        };

        if let Some(topics) = &self.topics_wrong {
            graded.topics_wrong = topics.iter().map(|t| normalize_topic(t)).collect();
        }
        Ok(graded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_are_taken_as_graded() {
        let session: SessionFile = serde_json::from_str(
            r#"{
                "user_id": "u-1",
                "results": [
                    { "question_id": "q1", "topic": "algebra", "is_correct": false },
                    { "question_id": "q2", "topic": "geometry", "is_correct": true, "time_spent": 30 }
                ]
            }"#,
        )
        .unwrap();
        let graded = session.grade(None).unwrap();
        assert_eq!(graded.total_questions, 2);
        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.topics_wrong, vec!["algebra"]);
    }

    #[test]
    fn answers_need_a_bank() {
        let session: SessionFile =
            serde_json::from_str(r#"{ "answers": [{ "question_id": "q1", "answer": 0 }] }"#)
                .unwrap();
        let err = session.grade(None).unwrap_err();
        assert!(err.to_string().contains("--bank"));
    }

    #[test]
    fn explicit_wrong_topics_win() {
        let session: SessionFile = serde_json::from_str(
            r#"{ "results": [], "topics_wrong": ["vectors", "vectors"] }"#,
        )
        .unwrap();
        let graded = session.grade(None).unwrap();
        assert_eq!(graded.topics_wrong, vec!["vectors", "vectors"]);
        assert_eq!(graded.total_questions, 0);
    }
}
