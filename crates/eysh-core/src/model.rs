//! Core data model types for eysh.
//!
//! These are the records the engine consumes from the persistence layer
//! (question results, profiles, question bank entries) and the structured
//! data it hands back (week plans, roadmaps, test outcomes).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Size of the fixed topic set.
pub const TOPIC_COUNT: usize = 8;

/// The fixed topic set every feature vector and roadmap cycle is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Algebra,
    Geometry,
    Trigonometry,
    Calculus,
    Probability,
    Sequences,
    Functions,
    Vectors,
}

impl Topic {
    /// All topics, in canonical order.
    pub const ALL: [Topic; TOPIC_COUNT] = [
        Topic::Algebra,
        Topic::Geometry,
        Topic::Trigonometry,
        Topic::Calculus,
        Topic::Probability,
        Topic::Sequences,
        Topic::Functions,
        Topic::Vectors,
    ];

    /// Stable identifier used in question records and model artifacts.
    pub fn key(self) -> &'static str {
        match self {
            Topic::Algebra => "algebra",
            Topic::Geometry => "geometry",
            Topic::Trigonometry => "trigonometry",
            Topic::Calculus => "calculus",
            Topic::Probability => "probability",
            Topic::Sequences => "sequences",
            Topic::Functions => "functions",
            Topic::Vectors => "vectors",
        }
    }

    /// Human-readable name in the given locale.
    pub fn display_name(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Mongolian => match self {
                Topic::Algebra => "Алгебр",
                Topic::Geometry => "Геометр",
                Topic::Trigonometry => "Тригонометр",
                Topic::Calculus => "Анализ",
                Topic::Probability => "Магадлал",
                Topic::Sequences => "Дараалал",
                Topic::Functions => "Функц",
                Topic::Vectors => "Вектор",
            },
            Locale::English => match self {
                Topic::Algebra => "Algebra",
                Topic::Geometry => "Geometry",
                Topic::Trigonometry => "Trigonometry",
                Topic::Calculus => "Calculus",
                Topic::Probability => "Probability",
                Topic::Sequences => "Sequences",
                Topic::Functions => "Functions",
                Topic::Vectors => "Vectors",
            },
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "algebra" => Ok(Topic::Algebra),
            "geometry" => Ok(Topic::Geometry),
            "trigonometry" | "trig" => Ok(Topic::Trigonometry),
            "calculus" => Ok(Topic::Calculus),
            "probability" => Ok(Topic::Probability),
            "sequences" => Ok(Topic::Sequences),
            "functions" => Ok(Topic::Functions),
            "vectors" => Ok(Topic::Vectors),
            other => Err(format!("unknown topic: {other}")),
        }
    }
}

/// Display name for an arbitrary topic identifier.
///
/// Identifiers outside the fixed set are returned unchanged.
pub fn topic_display_name(topic: &str, locale: Locale) -> String {
    match topic.parse::<Topic>() {
        Ok(t) => t.display_name(locale).to_string(),
        Err(_) => topic.to_string(),
    }
}

/// Language used for generated goals, resources, and topic names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "mn")]
    Mongolian,
    #[serde(rename = "en")]
    English,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Mongolian => write!(f, "mn"),
            Locale::English => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mn" | "mongolian" => Ok(Locale::Mongolian),
            "en" | "english" => Ok(Locale::English),
            other => Err(format!("unknown locale: {other}")),
        }
    }
}

/// Estimated exam readiness, 1 (lowest) to 10 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    /// Returned when there is nothing to estimate from.
    pub const NEUTRAL: Level = Level(5);
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(10);

    pub const fn new(value: u8) -> Self {
        Level(value)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a single answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    /// Topic identifier, normally one of [`Topic::ALL`].
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    pub is_correct: bool,
    /// Seconds spent on the question.
    #[serde(default, alias = "time_spent")]
    pub time_taken: f64,
}

fn default_difficulty() -> u8 {
    2
}

/// One week of a study roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    /// 1-based, contiguous within a roadmap.
    pub week_number: u32,
    pub topics: Vec<String>,
    pub goals: Vec<String>,
    pub resources: Vec<String>,
    #[serde(default)]
    pub practice_question_ids: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

/// A student's study roadmap. Regenerating replaces the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: Uuid,
    pub user_id: String,
    pub weeks: Vec<WeekPlan>,
    /// Percentage of completed weeks, 0-100.
    #[serde(default)]
    pub progress: f64,
    #[serde(default = "default_target_score")]
    pub target_score: u32,
    pub recommended_hours_per_week: f64,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A mentor candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorProfile {
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
}

/// The student side of mentor matching and roadmap generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub target_score: Option<u32>,
    #[serde(default)]
    pub grade: Option<u8>,
}

impl StudentProfile {
    pub fn target_score_or_default(&self) -> u32 {
        self.target_score.unwrap_or_else(default_target_score)
    }
}

/// Default exam target when the student hasn't set one.
pub const DEFAULT_TARGET_SCORE: u32 = 700;

fn default_target_score() -> u32 {
    DEFAULT_TARGET_SCORE
}

/// A question bank entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    pub topic: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    pub content: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A named collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Merge several banks into one, keeping question order.
    pub fn merged(id: &str, banks: Vec<QuestionBank>) -> Self {
        let questions = banks.into_iter().flat_map(|b| b.questions).collect();
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            questions,
        }
    }
}

/// A student's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: String,
    pub answer: usize,
    /// Seconds spent on the question.
    #[serde(default)]
    pub time_spent: u32,
}

/// The result of a completed diagnostic test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub id: Uuid,
    /// Percentage of correct answers.
    pub score: f64,
    pub total_questions: usize,
    pub correct_count: usize,
    pub predicted_level: Level,
    pub weak_topics: Vec<String>,
    pub completed_at: DateTime<Utc>,
}
