//! Aggregate statistics over many diagnostic outcomes.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::TestOutcome;

/// Cohort-level summary of test outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortStats {
    pub students: usize,
    /// Number of outcomes per predicted level.
    pub level_histogram: BTreeMap<u8, usize>,
    pub mean_score: f64,
    pub mean_level: f64,
    /// How often each topic was flagged weak, most frequent first, ties by
    /// name.
    pub weak_topic_frequency: Vec<TopicCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

impl CohortStats {
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        if outcomes.is_empty() {
            return Self::default();
        }

        let n = outcomes.len() as f64;
        let mut level_histogram = BTreeMap::new();
        let mut topic_counts: HashMap<&str, usize> = HashMap::new();

        for outcome in outcomes {
            *level_histogram
                .entry(outcome.predicted_level.get())
                .or_insert(0) += 1;
            for topic in &outcome.weak_topics {
                *topic_counts.entry(topic.as_str()).or_insert(0) += 1;
            }
        }

        let mut weak_topic_frequency: Vec<TopicCount> = topic_counts
            .into_iter()
            .map(|(topic, count)| TopicCount {
                topic: topic.to_string(),
                count,
            })
            .collect();
        weak_topic_frequency.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.topic.cmp(&b.topic))
        });

        Self {
            students: outcomes.len(),
            level_histogram,
            mean_score: outcomes.iter().map(|o| o.score).sum::<f64>() / n,
            mean_level: outcomes
                .iter()
                .map(|o| f64::from(o.predicted_level.get()))
                .sum::<f64>()
                / n,
            weak_topic_frequency,
        }
    }

    /// The most common weak topic across the cohort.
    pub fn most_common_weakness(&self) -> Option<&str> {
        self.weak_topic_frequency.first().map(|t| t.topic.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::model::Level;

    fn outcome(level: u8, score: f64, weak: &[&str]) -> TestOutcome {
        TestOutcome {
            id: Uuid::nil(),
            score,
            total_questions: 20,
            correct_count: 0,
            predicted_level: Level::new(level),
            weak_topics: weak.iter().map(|s| s.to_string()).collect(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_cohort() {
        let stats = CohortStats::from_outcomes(&[]);
        assert_eq!(stats.students, 0);
        assert_eq!(stats.mean_score, 0.0);
        assert!(stats.most_common_weakness().is_none());
    }

    #[test]
    fn aggregates_levels_and_topics() {
        let stats = CohortStats::from_outcomes(&[
            outcome(5, 50.0, &["geometry", "algebra"]),
            outcome(5, 55.0, &["algebra"]),
            outcome(8, 85.0, &["vectors"]),
        ]);
        assert_eq!(stats.students, 3);
        assert_eq!(stats.level_histogram.get(&5), Some(&2));
        assert_eq!(stats.level_histogram.get(&8), Some(&1));
        assert!((stats.mean_score - 190.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.mean_level, 6.0);
        assert_eq!(stats.most_common_weakness(), Some("algebra"));

        let order: Vec<&str> = stats
            .weak_topic_frequency
            .iter()
            .map(|t| t.topic.as_str())
            .collect();
        assert_eq!(order, vec!["algebra", "geometry", "vectors"]);
    }
}
