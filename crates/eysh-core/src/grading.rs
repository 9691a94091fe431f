//! Grading submitted answers against the question bank.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerSubmission, QuestionBank, QuestionResult};

/// A diagnostic test after grading, ready for the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradedSession {
    pub results: Vec<QuestionResult>,
    /// Topic of every wrong answer, in answer order, repeats kept.
    pub topics_wrong: Vec<String>,
    pub correct_count: usize,
    /// Every submitted answer, including ones for unknown questions.
    pub total_questions: usize,
    /// Question ids that weren't found in the bank.
    #[serde(default)]
    pub unknown_questions: Vec<String>,
}

impl GradedSession {
    /// Build from already-graded results. Topic keys are normalized first.
    pub fn from_results(mut results: Vec<QuestionResult>) -> Self {
        for result in &mut results {
            result.topic = normalize_topic(&result.topic);
        }
        let topics_wrong = wrong_topics(&results);
        let correct_count = results.iter().filter(|r| r.is_correct).count();
        let total_questions = results.len();
        Self {
            results,
            topics_wrong,
            correct_count,
            total_questions,
            unknown_questions: Vec::new(),
        }
    }

    /// Percentage of correct answers over all submitted answers.
    pub fn score(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.total_questions as f64 * 100.0
    }
}

/// Lowercased and trimmed, so `Algebra ` and `algebra` tally together.
pub fn normalize_topic(topic: &str) -> String {
    topic.trim().to_lowercase()
}

/// Topics of the incorrect results, in order.
pub fn wrong_topics(results: &[QuestionResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| !r.is_correct)
        .map(|r| r.topic.clone())
        .collect()
}

/// Grade answers against the bank.
///
/// Answers to questions missing from the bank are skipped but still count
/// toward the total, so they lower the score.
pub fn grade_submission(bank: &QuestionBank, answers: &[AnswerSubmission]) -> GradedSession {
    let index: HashMap<&str, _> = bank
        .questions
        .iter()
        .map(|q| (q.id.as_str(), q))
        .collect();

    let mut session = GradedSession {
        total_questions: answers.len(),
        ..Default::default()
    };

    for answer in answers {
        let Some(question) = index.get(answer.question_id.as_str()) else {
            tracing::debug!(question_id = %answer.question_id, "answer for unknown question skipped");
            session.unknown_questions.push(answer.question_id.clone());
            continue;
        };

        let is_correct = question.correct_answer == answer.answer;
        let topic = normalize_topic(&question.topic);
        if is_correct {
            session.correct_count += 1;
        } else {
            session.topics_wrong.push(topic.clone());
        }

        session.results.push(QuestionResult {
            question_id: answer.question_id.clone(),
            topic,
            difficulty: question.difficulty,
            is_correct,
            time_taken: f64::from(answer.time_spent),
        });
    }

    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::weakness::{FrequencyWeakness, WeaknessStrategy};

    fn question(id: &str, topic: &str, correct_answer: usize) -> Question {
        Question {
            id: id.into(),
            subject: "math".into(),
            topic: topic.into(),
            difficulty: 3,
            content: format!("question {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer,
            explanation: None,
            tags: vec![],
        }
    }

    fn bank() -> QuestionBank {
        QuestionBank {
            id: "diag".into(),
            name: "Diagnostic".into(),
            description: String::new(),
            questions: vec![
                question("q1", "algebra", 0),
                question("q2", "algebra", 1),
                question("q3", "geometry", 2),
            ],
        }
    }

    fn answer(id: &str, answer: usize) -> AnswerSubmission {
        AnswerSubmission {
            question_id: id.into(),
            answer,
            time_spent: 40,
        }
    }

    #[test]
    fn grades_against_bank() {
        let session = grade_submission(
            &bank(),
            &[answer("q1", 0), answer("q2", 3), answer("q3", 0)],
        );
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.total_questions, 3);
        assert_eq!(session.topics_wrong, vec!["algebra", "geometry"]);
        assert_eq!(session.results.len(), 3);
        assert_eq!(session.results[0].difficulty, 3);
        assert_eq!(session.results[0].time_taken, 40.0);
        assert!((session.score() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_questions_count_in_total() {
        let session = grade_submission(&bank(), &[answer("q1", 0), answer("missing", 0)]);
        assert_eq!(session.results.len(), 1);
        assert_eq!(session.total_questions, 2);
        assert_eq!(session.unknown_questions, vec!["missing"]);
        assert_eq!(session.score(), 50.0);
    }

    #[test]
    fn empty_submission() {
        let session = grade_submission(&bank(), &[]);
        assert_eq!(session.score(), 0.0);
        assert!(session.results.is_empty());
    }

    #[test]
    fn from_results_derives_wrong_topics() {
        let results = vec![
            QuestionResult {
                question_id: "a".into(),
                topic: "vectors".into(),
                difficulty: 2,
                is_correct: false,
                time_taken: 10.0,
            },
            QuestionResult {
                question_id: "b".into(),
                topic: "algebra".into(),
                difficulty: 2,
                is_correct: true,
                time_taken: 10.0,
            },
        ];
        let session = GradedSession::from_results(results);
        assert_eq!(session.topics_wrong, vec!["vectors"]);
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.score(), 50.0);
    }

    #[test]
    fn from_results_normalizes_topic_case() {
        let results = ["Algebra", " algebra", "geometry"]
            .iter()
            .enumerate()
            .map(|(i, topic)| QuestionResult {
                question_id: format!("q{i}"),
                topic: topic.to_string(),
                difficulty: 2,
                is_correct: false,
                time_taken: 10.0,
            })
            .collect();
        let session = GradedSession::from_results(results);
        assert_eq!(session.topics_wrong, vec!["algebra", "algebra", "geometry"]);
        assert!(session.results.iter().all(|r| r.topic == r.topic.to_lowercase()));
        assert_eq!(
            FrequencyWeakness.detect(&session.results, &session.topics_wrong),
            vec!["algebra"]
        );
    }
}
