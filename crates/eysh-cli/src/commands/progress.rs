//! The `eysh progress` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use eysh_core::model::Roadmap;
use eysh_core::report::{save_json, StudyReport};

/// Mark `week` completed in a roadmap or study report file, in place.
pub fn execute(path: PathBuf, week: u32) -> Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON in {}", path.display()))?;

    let (progress, completed, total) = if value.get("roadmap").is_some() {
        let mut report: StudyReport = serde_json::from_value(value)
            .with_context(|| format!("invalid study report: {}", path.display()))?;
        let progress = report.roadmap.mark_week_completed(week)?;
        report.save_json(&path)?;
        (
            progress,
            report.roadmap.completed_weeks(),
            report.roadmap.weeks.len(),
        )
    } else {
        let mut roadmap: Roadmap = serde_json::from_value(value)
            .with_context(|| format!("invalid roadmap: {}", path.display()))?;
        let progress = roadmap.mark_week_completed(week)?;
        save_json(&roadmap, &path)?;
        (progress, roadmap.completed_weeks(), roadmap.weeks.len())
    };

    println!("Week {week} completed. Progress: {progress:.1}% ({completed}/{total} weeks)");
    Ok(())
}
