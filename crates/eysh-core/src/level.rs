//! Level estimation.
//!
//! The rule table below never produces level 1 or 9. That gap is part of
//! the established scoring contract and is pinned by tests.

use crate::features::{correct_ratio, extract_features};
use crate::model::{Level, QuestionResult};
use crate::traits::PretrainedModel;

/// Strategy for turning a test session into a level.
pub trait LevelStrategy: Send + Sync {
    /// Short name for logs and diagnostics.
    fn name(&self) -> &str;

    fn estimate(&self, results: &[QuestionResult]) -> Level;
}

/// Map a percentage score onto the fixed step table.
pub fn level_from_score_pct(score_pct: f64) -> Level {
    let level = if score_pct >= 90.0 {
        10
    } else if score_pct >= 80.0 {
        8
    } else if score_pct >= 70.0 {
        7
    } else if score_pct >= 60.0 {
        6
    } else if score_pct >= 50.0 {
        5
    } else if score_pct >= 40.0 {
        4
    } else if score_pct >= 30.0 {
        3
    } else {
        2
    };
    Level::new(level)
}

/// Deterministic step-table estimate from the share of correct answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedLevel;

impl LevelStrategy for RuleBasedLevel {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn estimate(&self, results: &[QuestionResult]) -> Level {
        if results.is_empty() {
            return Level::NEUTRAL;
        }
        level_from_score_pct(correct_ratio(results) * 100.0)
    }
}

/// Classifier over the scaled feature vector.
///
/// The predicted class label is used as-is. If inference fails, the rule
/// table answers instead.
#[derive(Debug, Clone)]
pub struct LearnedLevel {
    model: PretrainedModel,
}

impl LearnedLevel {
    pub fn new(model: PretrainedModel) -> Self {
        Self { model }
    }
}

impl LevelStrategy for LearnedLevel {
    fn name(&self) -> &str {
        "learned"
    }

    fn estimate(&self, results: &[QuestionResult]) -> Level {
        let row = extract_features(results).to_row();
        match self.model.predict(&row) {
            Ok(label) => {
                let level = Level::new(label.round().clamp(0.0, u8::MAX as f64) as u8);
                if !(Level::MIN..=Level::MAX).contains(&level) {
                    tracing::warn!(model = %self.model.name, label, "level label outside 1-10");
                }
                level
            }
            Err(e) => {
                tracing::warn!(model = %self.model.name, "level prediction failed, using rule table: {e}");
                RuleBasedLevel.estimate(results)
            }
        }
    }
}
