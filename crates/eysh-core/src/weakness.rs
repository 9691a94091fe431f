//! Weak-topic detection.

use crate::error::PredictionError;
use crate::features::topic_accuracy;
use crate::model::{QuestionResult, Topic};
use crate::traits::PretrainedModel;

/// Upper bound on the length of a weak-topic list.
pub const MAX_WEAK_TOPICS: usize = 3;
/// Topics answered correctly less often than this are weak.
pub const WEAKNESS_THRESHOLD: f64 = 0.5;
/// Accuracy assumed for a topic that wasn't asked.
pub const UNSEEN_TOPIC_ACCURACY: f64 = 0.5;
/// Wrong answers on one topic needed to flag it under the frequency rule.
pub const MIN_WRONG_ANSWERS: usize = 2;

/// Strategy for picking the topics a student should work on first.
pub trait WeaknessStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Returns at most [`MAX_WEAK_TOPICS`] distinct topics, most significant
    /// first.
    fn detect(&self, results: &[QuestionResult], wrong_topics: &[String]) -> Vec<String>;
}

/// Flags topics that were answered wrong repeatedly.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyWeakness;

impl WeaknessStrategy for FrequencyWeakness {
    fn name(&self) -> &str {
        "frequency"
    }

    fn detect(&self, _results: &[QuestionResult], wrong_topics: &[String]) -> Vec<String> {
        let counts = tally(wrong_topics);

        let mut weak: Vec<String> = counts
            .iter()
            .filter(|(_, count)| *count >= MIN_WRONG_ANSWERS)
            .map(|(topic, _)| topic.to_string())
            .collect();

        if weak.is_empty() {
            if let Some(topic) = most_frequent(&counts) {
                weak.push(topic.to_string());
            }
        }

        weak.truncate(MAX_WEAK_TOPICS);
        weak
    }
}

/// Count occurrences, keeping first-seen order.
fn tally(topics: &[String]) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for topic in topics {
        match counts.iter_mut().find(|(seen, _)| *seen == topic.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((topic.as_str(), 1)),
        }
    }
    counts
}

/// Highest count wins; the earliest entry wins a tie.
fn most_frequent<'a>(counts: &[(&'a str, usize)]) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for &(topic, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((topic, count));
        }
    }
    best.map(|(topic, _)| topic)
}

/// Classifier that predicts the single weakest topic from per-topic accuracy.
///
/// The predicted topic is always reported, even when its accuracy is above
/// the threshold.
#[derive(Debug, Clone)]
pub struct LearnedWeakness {
    model: PretrainedModel,
    topics: Vec<String>,
}

impl LearnedWeakness {
    /// Uses the model's topic labels, or the fixed topic set when the
    /// artifact carries none.
    pub fn new(model: PretrainedModel) -> Self {
        let topics = if model.topics.is_empty() {
            Topic::ALL.iter().map(|t| t.key().to_string()).collect()
        } else {
            model.topics.clone()
        };
        Self { model, topics }
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    fn predict_weakest(&self, accuracies: &[f64]) -> Result<usize, PredictionError> {
        let label = self.model.predict(accuracies)?;
        let len = self.topics.len();
        if label < 0.0 || label.round() as usize >= len {
            return Err(PredictionError::UnknownClass {
                index: label.max(0.0).round() as usize,
                len,
            });
        }
        Ok(label.round() as usize)
    }
}

impl WeaknessStrategy for LearnedWeakness {
    fn name(&self) -> &str {
        "learned"
    }

    fn detect(&self, results: &[QuestionResult], wrong_topics: &[String]) -> Vec<String> {
        let accuracies: Vec<f64> = self
            .topics
            .iter()
            .map(|t| topic_accuracy(results, t).unwrap_or(UNSEEN_TOPIC_ACCURACY))
            .collect();

        let weakest = match self.predict_weakest(&accuracies) {
            Ok(idx) => self.topics[idx].clone(),
            Err(e) => {
                tracing::warn!(model = %self.model.name, "weakness prediction failed, using frequency rule: {e}");
                return FrequencyWeakness.detect(results, wrong_topics);
            }
        };

        let mut weak: Vec<String> = Vec::new();
        for (topic, acc) in self.topics.iter().zip(&accuracies) {
            if *acc < WEAKNESS_THRESHOLD && !weak.contains(topic) {
                weak.push(topic.clone());
            }
        }

        if !weak.contains(&weakest) {
            weak.insert(0, weakest);
        }
        weak.truncate(MAX_WEAK_TOPICS);
        weak
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::traits::Predictor;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn answer(topic: &str, is_correct: bool) -> QuestionResult {
        QuestionResult {
            question_id: format!("{topic}-{is_correct}"),
            topic: topic.into(),
            difficulty: 2,
            is_correct,
            time_taken: 45.0,
        }
    }

    #[test]
    fn frequency_no_wrong_answers() {
        assert!(FrequencyWeakness.detect(&[], &[]).is_empty());
    }

    #[test]
    fn frequency_repeated_topics() {
        let wrong = topics(&["algebra", "algebra", "geometry"]);
        assert_eq!(FrequencyWeakness.detect(&[], &wrong), vec!["algebra"]);
    }

    #[test]
    fn frequency_all_unique_returns_first_seen() {
        let wrong = topics(&["vectors", "calculus", "geometry"]);
        assert_eq!(FrequencyWeakness.detect(&[], &wrong), vec!["vectors"]);
    }

    #[test]
    fn frequency_keeps_first_seen_order() {
        let wrong = topics(&["geometry", "algebra", "geometry", "algebra", "algebra"]);
        assert_eq!(
            FrequencyWeakness.detect(&[], &wrong),
            vec!["geometry", "algebra"]
        );
    }

    #[test]
    fn frequency_caps_at_three() {
        let wrong = topics(&["a", "a", "b", "b", "c", "c", "d", "d"]);
        assert_eq!(FrequencyWeakness.detect(&[], &wrong), vec!["a", "b", "c"]);
    }

    struct Label(f64);

    impl Predictor for Label {
        fn n_features(&self) -> Option<usize> {
            None
        }

        fn predict(&self, _: &[f64]) -> Result<f64, PredictionError> {
            Ok(self.0)
        }
    }

    fn learned(label: f64) -> LearnedWeakness {
        LearnedWeakness::new(
            PretrainedModel::new("weakness", Arc::new(Label(label)))
                .with_topics(topics(&["algebra", "geometry", "calculus", "vectors"])),
        )
    }

    #[test]
    fn learned_prepends_predicted_topic() {
        let results = vec![
            answer("algebra", true),
            answer("geometry", false),
            answer("calculus", false),
        ];
        // predicted: algebra (accuracy 1.0, above the threshold)
        let weak = learned(0.0).detect(&results, &[]);
        assert_eq!(weak, vec!["algebra", "geometry", "calculus"]);
    }

    #[test]
    fn learned_keeps_order_when_predicted_present() {
        let results = vec![answer("geometry", false), answer("vectors", false)];
        let weak = learned(3.0).detect(&results, &[]);
        assert_eq!(weak, vec!["geometry", "vectors"]);
    }

    #[test]
    fn learned_truncates_to_three() {
        let results = vec![
            answer("algebra", false),
            answer("geometry", false),
            answer("calculus", false),
            answer("vectors", false),
        ];
        assert_eq!(learned(0.0).detect(&results, &[]).len(), MAX_WEAK_TOPICS);
    }

    #[test]
    fn learned_out_of_range_label_falls_back() {
        let wrong = topics(&["geometry", "geometry"]);
        let weak = learned(12.0).detect(&[answer("geometry", false)], &wrong);
        assert_eq!(weak, vec!["geometry"]);
    }

    #[test]
    fn learned_never_repeats_a_topic() {
        let strategy = LearnedWeakness::new(
            PretrainedModel::new("weakness", Arc::new(Label(0.0)))
                .with_topics(topics(&["algebra", "algebra", "geometry"])),
        );
        let weak = strategy.detect(&[answer("algebra", false)], &[]);
        assert_eq!(weak, vec!["algebra"]);
    }

    #[test]
    fn learned_defaults_to_fixed_topic_set() {
        let strategy = LearnedWeakness::new(PretrainedModel::new("weakness", Arc::new(Label(7.0))));
        assert_eq!(strategy.topics().len(), Topic::ALL.len());
        assert_eq!(strategy.detect(&[], &[]), vec!["vectors"]);
    }
}
