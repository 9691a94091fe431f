//! The `eysh compare` command.

use std::path::PathBuf;

use anyhow::Result;

use eysh_core::report::compare_outcomes;

use crate::commands::load_outcome;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = load_outcome(&baseline_path)?;
    let current = load_outcome(&current_path)?;

    let comparison = compare_outcomes(&baseline, &current);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", comparison.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        _ => {
            println!(
                "Level: {} -> {} ({:+})",
                comparison.baseline_level, comparison.current_level, comparison.level_delta
            );
            println!(
                "Score: {:.1}% -> {:.1}% ({:+.1})",
                comparison.baseline_score, comparison.current_score, comparison.score_delta
            );

            let sections = [
                ("Resolved", &comparison.resolved_topics),
                ("New", &comparison.new_topics),
                ("Still weak", &comparison.persisting_topics),
            ];
            for (label, topics) in sections {
                if !topics.is_empty() {
                    println!("{label}: {}", topics.join(", "));
                }
            }

            if comparison.has_regressed() {
                println!("\nLevel regression detected.");
            }
        }
    }

    if fail_on_regression && comparison.has_regressed() {
        std::process::exit(1);
    }

    Ok(())
}
