//! Feature extraction from a test session.

use serde::{Deserialize, Serialize};

use crate::model::{QuestionResult, Topic, TOPIC_COUNT};

/// Mean time per question assumed when there is no data.
pub const DEFAULT_AVG_TIME_SECS: f64 = 60.0;
/// Questions at or above this difficulty count as hard.
pub const HARD_DIFFICULTY: u8 = 3;
/// Accuracy percentage assigned to a topic with no observations.
pub const NEUTRAL_TOPIC_SCORE_PCT: f64 = 50.0;

/// Numeric summary of a test session, in model input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub correct_ratio: f64,
    pub avg_time: f64,
    pub hard_correct_ratio: f64,
    /// Accuracy percentage per topic, indexed like [`Topic::ALL`].
    pub topic_scores: [f64; TOPIC_COUNT],
}

impl FeatureVector {
    /// Number of values produced by [`FeatureVector::to_row`].
    pub const LEN: usize = 3 + TOPIC_COUNT;

    /// Flatten into a model input row.
    pub fn to_row(&self) -> Vec<f64> {
        let mut row = Vec::with_capacity(Self::LEN);
        row.push(self.correct_ratio);
        row.push(self.avg_time);
        row.push(self.hard_correct_ratio);
        row.extend_from_slice(&self.topic_scores);
        row
    }

    pub fn topic_score(&self, topic: Topic) -> f64 {
        let idx = Topic::ALL
            .iter()
            .position(|t| *t == topic)
            .unwrap_or_default();
        self.topic_scores[idx]
    }
}

/// Build the feature vector for a list of results.
pub fn extract_features(results: &[QuestionResult]) -> FeatureVector {
    let mut topic_scores = [NEUTRAL_TOPIC_SCORE_PCT; TOPIC_COUNT];
    for (slot, topic) in topic_scores.iter_mut().zip(Topic::ALL) {
        if let Some(acc) = topic_accuracy(results, topic.key()) {
            *slot = acc * 100.0;
        }
    }

    FeatureVector {
        correct_ratio: correct_ratio(results),
        avg_time: average_time(results),
        hard_correct_ratio: hard_correct_ratio(results),
        topic_scores,
    }
}

/// Fraction of correct answers; 0 for an empty list.
pub fn correct_ratio(results: &[QuestionResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().filter(|r| r.is_correct).count() as f64 / results.len() as f64
}

fn average_time(results: &[QuestionResult]) -> f64 {
    if results.is_empty() {
        return DEFAULT_AVG_TIME_SECS;
    }
    results.iter().map(|r| r.time_taken).sum::<f64>() / results.len() as f64
}

fn hard_correct_ratio(results: &[QuestionResult]) -> f64 {
    let hard: Vec<&QuestionResult> = results
        .iter()
        .filter(|r| r.difficulty >= HARD_DIFFICULTY)
        .collect();
    if hard.is_empty() {
        return 0.0;
    }
    hard.iter().filter(|r| r.is_correct).count() as f64 / hard.len() as f64
}

/// Fraction of correct answers on `topic`, or `None` when it wasn't asked.
///
/// Topic identifiers are compared case-insensitively.
pub fn topic_accuracy(results: &[QuestionResult], topic: &str) -> Option<f64> {
    let topic = topic.trim();
    let (seen, correct) = results
        .iter()
        .filter(|r| r.topic.trim().eq_ignore_ascii_case(topic))
        .fold((0usize, 0usize), |(seen, correct), r| {
            (seen + 1, correct + usize::from(r.is_correct))
        });
    if seen == 0 {
        None
    } else {
        Some(correct as f64 / seen as f64)
    }
}
