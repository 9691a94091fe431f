//! Study report types with JSON persistence and outcome comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mentor::RankedMentor;
use crate::model::{Roadmap, StudentProfile, TestOutcome};

/// Everything produced for one student in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub student: StudentProfile,
    /// The diagnostic test the roadmap was built from.
    pub outcome: TestOutcome,
    pub roadmap: Roadmap,
    /// Recommended mentors, best match first.
    #[serde(default)]
    pub mentors: Vec<RankedMentor>,
}

impl StudyReport {
    pub fn new(
        student: StudentProfile,
        outcome: TestOutcome,
        roadmap: Roadmap,
        mentors: Vec<RankedMentor>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            student,
            outcome,
            roadmap,
            mentors,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        save_json(self, path).context("failed to save study report")
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        load_json(path).context("failed to load study report")
    }
}

/// Write any serializable record as pretty JSON, creating parent directories.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Read a JSON record from a file.
pub fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON in {}", path.display()))
}

/// Change between two diagnostic tests of the same student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeComparison {
    pub baseline_level: u8,
    pub current_level: u8,
    /// Current minus baseline level.
    pub level_delta: i32,
    pub baseline_score: f64,
    pub current_score: f64,
    /// Current minus baseline score, in percentage points.
    pub score_delta: f64,
    /// Weak before, not weak now.
    pub resolved_topics: Vec<String>,
    /// Weak now, not weak before.
    pub new_topics: Vec<String>,
    /// Weak in both tests.
    pub persisting_topics: Vec<String>,
}

/// Compare a later test against an earlier one.
pub fn compare_outcomes(baseline: &TestOutcome, current: &TestOutcome) -> OutcomeComparison {
    let resolved_topics = baseline
        .weak_topics
        .iter()
        .filter(|t| !current.weak_topics.contains(t))
        .cloned()
        .collect();
    let new_topics = current
        .weak_topics
        .iter()
        .filter(|t| !baseline.weak_topics.contains(t))
        .cloned()
        .collect();
    let persisting_topics = current
        .weak_topics
        .iter()
        .filter(|t| baseline.weak_topics.contains(t))
        .cloned()
        .collect();

    OutcomeComparison {
        baseline_level: baseline.predicted_level.get(),
        current_level: current.predicted_level.get(),
        level_delta: i32::from(current.predicted_level.get())
            - i32::from(baseline.predicted_level.get()),
        baseline_score: baseline.score,
        current_score: current.score,
        score_delta: current.score - baseline.score,
        resolved_topics,
        new_topics,
        persisting_topics,
    }
}

impl OutcomeComparison {
    /// Returns true if the level went down.
    pub fn has_regressed(&self) -> bool {
        self.level_delta < 0
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Level:** {} → {} ({:+})\n\n",
            self.baseline_level, self.current_level, self.level_delta
        ));
        md.push_str(&format!(
            "**Score:** {:.1}% → {:.1}% ({:+.1})\n\n",
            self.baseline_score, self.current_score, self.score_delta
        ));

        let sections = [
            ("Resolved topics", &self.resolved_topics),
            ("New weak topics", &self.new_topics),
            ("Still weak", &self.persisting_topics),
        ];
        for (title, topics) in sections {
            if topics.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            for topic in topics {
                md.push_str(&format!("- {topic}\n"));
            }
            md.push('\n');
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Level, WeekPlan};

    fn outcome(level: u8, score: f64, weak: &[&str]) -> TestOutcome {
        TestOutcome {
            id: Uuid::nil(),
            score,
            total_questions: 10,
            correct_count: (score / 10.0) as usize,
            predicted_level: Level::new(level),
            weak_topics: weak.iter().map(|s| s.to_string()).collect(),
            completed_at: Utc::now(),
        }
    }

    fn make_report() -> StudyReport {
        let weeks = vec![WeekPlan {
            week_number: 1,
            topics: vec!["algebra".into()],
            goals: vec!["goal".into()],
            resources: vec![],
            practice_question_ids: vec![],
            completed: false,
        }];
        StudyReport::new(
            StudentProfile {
                user_id: "u1".into(),
                name: "Bat".into(),
                subjects: vec!["math".into()],
                target_score: Some(650),
                grade: Some(12),
            },
            outcome(5, 50.0, &["algebra"]),
            Roadmap::new("u1", weeks, 650, 10.0),
            vec![],
        )
    }

    #[test]
    fn compare_topic_sets() {
        let baseline = outcome(4, 40.0, &["algebra", "geometry"]);
        let current = outcome(6, 62.5, &["geometry", "vectors"]);

        let cmp = compare_outcomes(&baseline, &current);
        assert_eq!(cmp.level_delta, 2);
        assert_eq!(cmp.score_delta, 22.5);
        assert_eq!(cmp.resolved_topics, vec!["algebra"]);
        assert_eq!(cmp.new_topics, vec!["vectors"]);
        assert_eq!(cmp.persisting_topics, vec!["geometry"]);
        assert!(!cmp.has_regressed());
    }

    #[test]
    fn compare_regression() {
        let cmp = compare_outcomes(&outcome(7, 70.0, &[]), &outcome(5, 52.0, &["trigonometry"]));
        assert!(cmp.has_regressed());
        assert_eq!(cmp.level_delta, -2);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = StudyReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.student.user_id, "u1");
        assert_eq!(loaded.roadmap.weeks.len(), 1);
        assert_eq!(loaded.outcome.predicted_level.get(), 5);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StudyReport::load_json(&dir.path().join("none.json")).is_err());
    }

    #[test]
    fn markdown_output() {
        let cmp = compare_outcomes(
            &outcome(4, 40.0, &["algebra"]),
            &outcome(5, 55.0, &["vectors"]),
        );
        let md = cmp.to_markdown();
        assert!(md.contains("4 → 5 (+1)"));
        assert!(md.contains("Resolved topics"));
        assert!(md.contains("- vectors"));
        assert!(!md.contains("Still weak"));
    }
}
