//! Markdown report generator.

use std::path::Path;

use anyhow::{Context, Result};

use eysh_core::model::{topic_display_name, Locale};
use eysh_core::report::StudyReport;

/// Table cells can't contain raw pipes or newlines.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Generate a Markdown report for one student.
pub fn generate_markdown(report: &StudyReport, locale: Locale) -> String {
    let outcome = &report.outcome;
    let roadmap = &report.roadmap;
    let mut md = String::new();

    let name = if report.student.name.is_empty() {
        &report.student.user_id
    } else {
        &report.student.name
    };
    md.push_str(&format!("# Study plan: {name}\n\n"));

    md.push_str(&format!(
        "**Score:** {:.1}% ({}/{}) | **Level:** {} | **Target:** {} | **Hours/week:** {:.1}\n\n",
        outcome.score,
        outcome.correct_count,
        outcome.total_questions,
        outcome.predicted_level,
        roadmap.target_score,
        roadmap.recommended_hours_per_week
    ));

    md.push_str("## Weak topics\n\n");
    if outcome.weak_topics.is_empty() {
        md.push_str("None detected.\n\n");
    } else {
        for topic in &outcome.weak_topics {
            md.push_str(&format!("- {}\n", topic_display_name(topic, locale)));
        }
        md.push('\n');
    }

    md.push_str(&format!(
        "## Roadmap ({:.0}% complete)\n\n",
        roadmap.progress
    ));
    md.push_str("| Week | Topic | Goals | Done |\n");
    md.push_str("|------|-------|-------|------|\n");
    for week in &roadmap.weeks {
        let topics: Vec<String> = week
            .topics
            .iter()
            .map(|t| topic_display_name(t, locale))
            .collect();
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            week.week_number,
            cell(&topics.join(", ")),
            cell(&week.goals.join("; ")),
            if week.completed { "x" } else { " " }
        ));
    }
    md.push('\n');

    if !report.mentors.is_empty() {
        md.push_str("## Recommended mentors\n\n");
        md.push_str("| Mentor | University | Rating | Match |\n");
        md.push_str("|--------|------------|--------|-------|\n");
        for ranked in &report.mentors {
            md.push_str(&format!(
                "| {} | {} | {:.1} | {:.1} |\n",
                cell(&ranked.mentor.user_name),
                cell(&ranked.mentor.university),
                ranked.mentor.rating,
                ranked.score
            ));
        }
        md.push('\n');
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(report: &StudyReport, locale: Locale, path: &Path) -> Result<()> {
    let md = generate_markdown(report, locale);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write Markdown report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::study_report;

    #[test]
    fn markdown_sections() {
        let md = generate_markdown(&study_report(), Locale::English);
        assert!(md.starts_with("# Study plan: Bat & Dorj"));
        assert!(md.contains("**Level:** 4"));
        assert!(md.contains("- Vectors\n- Algebra\n"));
        assert!(md.contains("## Roadmap (25% complete)"));
        assert!(md.contains("| 1 | Vectors | goal 1 | x |"));
        assert!(md.contains("| Saraa | NUM | 4.5 | 14.5 |"));
    }

    #[test]
    fn no_mentor_section_without_mentors() {
        let mut report = study_report();
        report.mentors.clear();
        report.outcome.weak_topics.clear();
        let md = generate_markdown(&report, Locale::Mongolian);
        assert!(!md.contains("Recommended mentors"));
        assert!(md.contains("None detected."));
        assert!(md.contains("| 2 | Алгебр |"));
    }

    #[test]
    fn pipes_are_escaped() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.md");
        write_markdown_report(&study_report(), Locale::English, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("## Weak topics"));
    }
}
