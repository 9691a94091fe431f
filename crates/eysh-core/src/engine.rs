//! Adaptive engine orchestrator.
//!
//! Picks a strategy for each component once, at construction, from the set
//! of pretrained models that could be loaded. Every operation then works
//! with or without models; learned strategies fall back per call.

use chrono::Utc;
use uuid::Uuid;

use crate::grading::GradedSession;
use crate::level::{LearnedLevel, LevelStrategy, RuleBasedLevel};
use crate::mentor::{self, RankedMentor};
use crate::model::{
    Level, Locale, MentorProfile, QuestionResult, Roadmap, StudentProfile, TestOutcome, WeekPlan,
};
use crate::roadmap::{
    DefaultHours, HoursEstimator, LearnedHours, RoadmapGenerator, RoadmapRequest,
};
use crate::traits::ModelSet;
use crate::weakness::{FrequencyWeakness, LearnedWeakness, WeaknessStrategy};

/// Configuration for the adaptive engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Language for generated goals and resources.
    pub locale: Locale,
}

/// The adaptive learning engine.
pub struct AdaptiveEngine {
    level: Box<dyn LevelStrategy>,
    weakness: Box<dyn WeaknessStrategy>,
    roadmap: RoadmapGenerator,
    config: EngineConfig,
}

impl AdaptiveEngine {
    pub fn new(models: ModelSet, config: EngineConfig) -> Self {
        let level: Box<dyn LevelStrategy> = match models.level {
            Some(model) => Box::new(LearnedLevel::new(model)),
            None => Box::new(RuleBasedLevel),
        };
        let weakness: Box<dyn WeaknessStrategy> = match models.weakness {
            Some(model) => Box::new(LearnedWeakness::new(model)),
            None => Box::new(FrequencyWeakness),
        };
        let hours: Box<dyn HoursEstimator> = match models.roadmap {
            Some(model) => Box::new(LearnedHours::new(model)),
            None => Box::new(DefaultHours),
        };
        let roadmap = RoadmapGenerator::new(hours, config.locale);

        tracing::info!(
            level = level.name(),
            weakness = weakness.name(),
            hours = roadmap.hours_strategy(),
            locale = %config.locale,
            "adaptive engine ready"
        );

        Self {
            level,
            weakness,
            roadmap,
            config,
        }
    }

    /// Engine with every component on its rule-based strategy.
    pub fn rule_based(config: EngineConfig) -> Self {
        Self::new(ModelSet::empty(), config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn level_strategy(&self) -> &str {
        self.level.name()
    }

    pub fn weakness_strategy(&self) -> &str {
        self.weakness.name()
    }

    pub fn hours_strategy(&self) -> &str {
        self.roadmap.hours_strategy()
    }

    pub fn estimate_level(&self, results: &[QuestionResult]) -> Level {
        self.level.estimate(results)
    }

    /// At most three weak topics, most significant first.
    pub fn detect_weaknesses(
        &self,
        results: &[QuestionResult],
        wrong_topics: &[String],
    ) -> Vec<String> {
        if results.is_empty() && wrong_topics.is_empty() {
            return Vec::new();
        }
        self.weakness.detect(results, wrong_topics)
    }

    pub fn recommended_hours(&self, request: &RoadmapRequest) -> f64 {
        self.roadmap.recommended_hours(request)
    }

    pub fn generate_roadmap(&self, request: &RoadmapRequest) -> Vec<WeekPlan> {
        self.roadmap.generate(request)
    }

    /// A complete roadmap record for `user_id`.
    pub fn build_roadmap(&self, user_id: &str, request: &RoadmapRequest) -> Roadmap {
        self.roadmap.build(user_id, request)
    }

    pub fn rank_mentors(
        &self,
        student: &StudentProfile,
        mentors: &[MentorProfile],
    ) -> Vec<RankedMentor> {
        mentor::rank_mentors(student, mentors)
    }

    /// Level and weak topics for a graded diagnostic test.
    pub fn assess(&self, session: &GradedSession) -> TestOutcome {
        let predicted_level = self.estimate_level(&session.results);
        let weak_topics = self.detect_weaknesses(&session.results, &session.topics_wrong);

        tracing::debug!(
            score = session.score(),
            level = predicted_level.get(),
            weak = ?weak_topics,
            "assessed session"
        );

        TestOutcome {
            id: Uuid::new_v4(),
            score: session.score(),
            total_questions: session.total_questions,
            correct_count: session.correct_count,
            predicted_level,
            weak_topics,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::PredictionError;
    use crate::traits::{PretrainedModel, Predictor};

    struct Fixed(f64);

    impl Predictor for Fixed {
        fn n_features(&self) -> Option<usize> {
            None
        }

        fn predict(&self, _: &[f64]) -> Result<f64, PredictionError> {
            Ok(self.0)
        }
    }

    fn fixed(name: &str, value: f64) -> PretrainedModel {
        PretrainedModel::new(name, Arc::new(Fixed(value)))
    }

    fn result(topic: &str, is_correct: bool) -> QuestionResult {
        QuestionResult {
            question_id: format!("{topic}-{is_correct}"),
            topic: topic.into(),
            difficulty: 2,
            is_correct,
            time_taken: 30.0,
        }
    }

    #[test]
    fn rule_based_strategies_without_models() {
        let engine = AdaptiveEngine::rule_based(EngineConfig::default());
        assert_eq!(engine.level_strategy(), "rule-based");
        assert_eq!(engine.weakness_strategy(), "frequency");
        assert_eq!(engine.hours_strategy(), "default");
    }

    #[test]
    fn learned_strategies_with_models() {
        let models = ModelSet {
            level: Some(fixed("level_predictor", 6.0)),
            weakness: Some(fixed("weakness_detector", 1.0)),
            roadmap: Some(fixed("roadmap_generator", 18.0)),
        };
        let engine = AdaptiveEngine::new(models, EngineConfig::default());
        assert_eq!(engine.level_strategy(), "learned");
        assert_eq!(engine.weakness_strategy(), "learned");
        assert_eq!(engine.hours_strategy(), "learned");

        let results = vec![result("algebra", true)];
        assert_eq!(engine.estimate_level(&results).get(), 6);
        assert_eq!(engine.detect_weaknesses(&results, &[]), vec!["geometry"]);
        let request = RoadmapRequest::new(Level::new(6), vec![]);
        assert_eq!(engine.recommended_hours(&request), 18.0);
    }

    #[test]
    fn empty_session_guard() {
        let models = ModelSet {
            weakness: Some(fixed("weakness_detector", 0.0)),
            ..ModelSet::empty()
        };
        let engine = AdaptiveEngine::new(models, EngineConfig::default());
        assert!(engine.detect_weaknesses(&[], &[]).is_empty());
        assert_eq!(engine.estimate_level(&[]), Level::NEUTRAL);
    }

    #[test]
    fn assess_graded_session() {
        let engine = AdaptiveEngine::rule_based(EngineConfig::default());
        let session = GradedSession::from_results(vec![
            result("algebra", false),
            result("algebra", false),
            result("geometry", true),
            result("vectors", true),
        ]);
        let outcome = engine.assess(&session);
        assert_eq!(outcome.score, 50.0);
        assert_eq!(outcome.predicted_level.get(), 5);
        assert_eq!(outcome.weak_topics, vec!["algebra"]);
        assert_eq!(outcome.total_questions, 4);
        assert_eq!(outcome.correct_count, 2);
    }

    #[test]
    fn build_roadmap_uses_weak_topics_first() {
        let engine = AdaptiveEngine::rule_based(EngineConfig {
            locale: Locale::English,
        });
        let request = RoadmapRequest::new(Level::new(7), vec!["vectors".into()]);
        let roadmap = engine.build_roadmap("u1", &request);
        assert_eq!(roadmap.weeks.len(), 6);
        assert_eq!(roadmap.weeks[0].topics, vec!["vectors"]);
        assert_eq!(roadmap.weeks[1].topics, vec!["algebra"]);
        assert_eq!(roadmap.recommended_hours_per_week, 10.0);
        assert_eq!(roadmap.progress, 0.0);
        assert!(roadmap.weeks[0].goals[0].contains("Vectors"));
    }
}
