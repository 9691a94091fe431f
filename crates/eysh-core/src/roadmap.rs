//! Study roadmap generation and progress tracking.

use chrono::Utc;
use uuid::Uuid;

use crate::error::ProgressError;
use crate::model::{
    topic_display_name, Level, Locale, Roadmap, Topic, WeekPlan, DEFAULT_TARGET_SCORE,
    TOPIC_COUNT,
};
use crate::traits::PretrainedModel;

/// Shortest roadmap ever generated.
pub const MIN_WEEKS: u32 = 4;
/// Planning horizon when the caller doesn't give one.
pub const DEFAULT_WEEKS_AVAILABLE: u32 = 12;
/// Weekly study hours when no regressor is available or it fails.
pub const DEFAULT_HOURS_PER_WEEK: f64 = 10.0;
pub const MIN_HOURS_PER_WEEK: f64 = 5.0;
pub const MAX_HOURS_PER_WEEK: f64 = 40.0;
/// Levels the hours regressor is asked to plan for above the current one.
pub const TARGET_LEVEL_GAIN: u8 = 3;
/// Topic score fed to the regressor for topics that aren't weak.
pub const DEFAULT_TOPIC_PRIOR: f64 = 0.5;
/// Topic score fed to the regressor for weak topics.
pub const WEAK_TOPIC_PRIOR: f64 = 0.3;

/// Inputs to roadmap generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapRequest {
    pub level: Level,
    pub weak_topics: Vec<String>,
    pub target_score: u32,
    pub weeks_available: u32,
}

impl RoadmapRequest {
    pub fn new(level: Level, weak_topics: Vec<String>) -> Self {
        Self {
            level,
            weak_topics,
            target_score: DEFAULT_TARGET_SCORE,
            weeks_available: DEFAULT_WEEKS_AVAILABLE,
        }
    }

    pub fn with_target_score(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }

    pub fn with_weeks_available(mut self, weeks_available: u32) -> Self {
        self.weeks_available = weeks_available;
        self
    }
}

/// Number of weeks to plan: lower levels get longer roadmaps, bounded below
/// by [`MIN_WEEKS`] and above by the caller's horizon.
pub fn week_count(level: Level, weeks_available: u32) -> u32 {
    let needed = 10u32.saturating_sub(u32::from(level.get())) * 2;
    MIN_WEEKS.max(weeks_available.min(needed))
}

/// Focus topic for a 1-based week number.
///
/// Weak topics come first, one per week. After that the fixed topic set is
/// cycled from the start.
pub fn focus_topic(week_number: u32, weak_topics: &[String]) -> String {
    let idx = week_number.saturating_sub(1) as usize;
    match weak_topics.get(idx) {
        Some(topic) => topic.clone(),
        None => Topic::ALL[(idx - weak_topics.len()) % TOPIC_COUNT]
            .key()
            .to_string(),
    }
}

/// Strategy for the recommended weekly study load.
pub trait HoursEstimator: Send + Sync {
    fn name(&self) -> &str;

    fn recommended_hours(&self, request: &RoadmapRequest) -> f64;
}

/// Always recommends [`DEFAULT_HOURS_PER_WEEK`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHours;

impl HoursEstimator for DefaultHours {
    fn name(&self) -> &str {
        "default"
    }

    fn recommended_hours(&self, _request: &RoadmapRequest) -> f64 {
        DEFAULT_HOURS_PER_WEEK
    }
}

/// Regressor over (current level, target level, horizon, topic priors).
#[derive(Debug, Clone)]
pub struct LearnedHours {
    model: PretrainedModel,
    topics: Vec<String>,
}

impl LearnedHours {
    pub fn new(model: PretrainedModel) -> Self {
        let topics = if model.topics.is_empty() {
            Topic::ALL.iter().map(|t| t.key().to_string()).collect()
        } else {
            model.topics.clone()
        };
        Self { model, topics }
    }

    /// Model input row for a request.
    pub fn feature_row(&self, request: &RoadmapRequest) -> Vec<f64> {
        let current = request.level.get();
        let target = current.saturating_add(TARGET_LEVEL_GAIN).min(Level::MAX.get());

        let mut row = Vec::with_capacity(3 + self.topics.len());
        row.push(f64::from(current));
        row.push(f64::from(target));
        row.push(f64::from(request.weeks_available));
        row.extend(self.topics.iter().map(|topic| {
            let weak = request
                .weak_topics
                .iter()
                .any(|w| w.eq_ignore_ascii_case(topic));
            if weak {
                WEAK_TOPIC_PRIOR
            } else {
                DEFAULT_TOPIC_PRIOR
            }
        }));
        row
    }
}

impl HoursEstimator for LearnedHours {
    fn name(&self) -> &str {
        "learned"
    }

    fn recommended_hours(&self, request: &RoadmapRequest) -> f64 {
        match self.model.predict(&self.feature_row(request)) {
            Ok(hours) => hours.clamp(MIN_HOURS_PER_WEEK, MAX_HOURS_PER_WEEK),
            Err(e) => {
                tracing::debug!(model = %self.model.name, "hours prediction failed, keeping default: {e}");
                DEFAULT_HOURS_PER_WEEK
            }
        }
    }
}

/// Builds week plans from a level and weak-topic list.
pub struct RoadmapGenerator {
    hours: Box<dyn HoursEstimator>,
    locale: Locale,
}

impl RoadmapGenerator {
    pub fn new(hours: Box<dyn HoursEstimator>, locale: Locale) -> Self {
        Self { hours, locale }
    }

    pub fn hours_strategy(&self) -> &str {
        self.hours.name()
    }

    pub fn recommended_hours(&self, request: &RoadmapRequest) -> f64 {
        self.hours.recommended_hours(request)
    }

    /// Ordered week plans covering [`week_count`] weeks.
    pub fn generate(&self, request: &RoadmapRequest) -> Vec<WeekPlan> {
        let weeks = week_count(request.level, request.weeks_available);
        tracing::debug!(
            level = request.level.get(),
            weeks,
            weak = request.weak_topics.len(),
            "generating roadmap"
        );
        (1..=weeks)
            .map(|week| week_plan(week, &focus_topic(week, &request.weak_topics), self.locale))
            .collect()
    }

    /// A fresh roadmap for `user_id`, replacing whatever they had before.
    pub fn build(&self, user_id: &str, request: &RoadmapRequest) -> Roadmap {
        Roadmap::new(
            user_id,
            self.generate(request),
            request.target_score,
            self.recommended_hours(request),
        )
    }
}

fn week_plan(week_number: u32, topic: &str, locale: Locale) -> WeekPlan {
    let name = topic_display_name(topic, locale);
    let (goals, resources) = match locale {
        Locale::Mongolian => (
            vec![
                format!("{name} сэдвийг гүнзгий судлах"),
                "Өдөрт 10 бодлого бодох".to_string(),
                "Алдаагаа шинжлэх".to_string(),
            ],
            vec![
                format!("{name} - Онол"),
                format!("{name} - Дасгал"),
                format!("{name} - Шалгалтын бодлого"),
            ],
        ),
        Locale::English => (
            vec![
                format!("Study {name} in depth"),
                "Solve 10 problems a day".to_string(),
                "Review your mistakes".to_string(),
            ],
            vec![
                format!("{name} - Theory"),
                format!("{name} - Practice"),
                format!("{name} - Exam problems"),
            ],
        ),
    };

    WeekPlan {
        week_number,
        topics: vec![topic.to_string()],
        goals,
        resources,
        practice_question_ids: Vec::new(),
        completed: false,
    }
}

/// Percentage of completed weeks; 0 for an empty plan.
pub fn progress_percent(weeks: &[WeekPlan]) -> f64 {
    if weeks.is_empty() {
        return 0.0;
    }
    let completed = weeks.iter().filter(|w| w.completed).count();
    completed as f64 / weeks.len() as f64 * 100.0
}

impl Roadmap {
    pub fn new(
        user_id: impl Into<String>,
        weeks: Vec<WeekPlan>,
        target_score: u32,
        recommended_hours_per_week: f64,
    ) -> Self {
        let progress = progress_percent(&weeks);
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            weeks,
            progress,
            target_score,
            recommended_hours_per_week,
            generated_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn completed_weeks(&self) -> usize {
        self.weeks.iter().filter(|w| w.completed).count()
    }

    /// Recompute `progress` from the week flags and return it.
    pub fn recompute_progress(&mut self) -> f64 {
        self.progress = progress_percent(&self.weeks);
        self.progress
    }

    /// Mark a week as done and return the new progress.
    pub fn mark_week_completed(&mut self, week_number: u32) -> Result<f64, ProgressError> {
        let week = self
            .weeks
            .iter_mut()
            .find(|w| w.week_number == week_number)
            .ok_or(ProgressError::WeekNotFound(week_number))?;
        week.completed = true;
        self.updated_at = Some(Utc::now());
        Ok(self.recompute_progress())
    }
}
