//! The `eysh cohort` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use eysh_core::statistics::CohortStats;

use crate::commands::load_outcome;

pub fn execute(dir: PathBuf, format: String) -> Result<()> {
    use comfy_table::{Cell, Table};

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    let mut outcomes = Vec::new();
    for path in &paths {
        match load_outcome(path) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
        }
    }

    anyhow::ensure!(
        !outcomes.is_empty(),
        "no study reports found in {}",
        dir.display()
    );

    let stats = CohortStats::from_outcomes(&outcomes);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "Students: {} | mean score {:.1}% | mean level {:.1}",
        stats.students, stats.mean_score, stats.mean_level
    );

    let mut levels = Table::new();
    levels.set_header(vec!["Level", "Students"]);
    for (level, count) in &stats.level_histogram {
        levels.add_row(vec![Cell::new(level), Cell::new(count)]);
    }
    println!("\n{levels}");

    if !stats.weak_topic_frequency.is_empty() {
        let mut topics = Table::new();
        topics.set_header(vec!["Weak topic", "Students"]);
        for t in &stats.weak_topic_frequency {
            topics.add_row(vec![Cell::new(&t.topic), Cell::new(t.count)]);
        }
        println!("\n{topics}");
    }

    if let Some(topic) = stats.most_common_weakness() {
        println!("\nMost common weakness: {topic}");
    }

    Ok(())
}
