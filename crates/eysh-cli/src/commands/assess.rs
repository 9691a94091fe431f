//! The `eysh assess` command.

use std::path::PathBuf;

use anyhow::Result;

use eysh_core::model::topic_display_name;
use eysh_models::config::load_config_from;

use crate::commands::build_engine;
use crate::session::SessionFile;

pub async fn execute(
    session_path: PathBuf,
    bank: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let session = SessionFile::load(&session_path)?;
    let graded = session.grade(bank.as_deref())?;

    let engine = build_engine(&config, config.locale).await?;
    let outcome = engine.assess(&graded);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        _ => {
            println!(
                "Score: {:.1}% ({}/{})",
                outcome.score, outcome.correct_count, outcome.total_questions
            );
            println!(
                "Level: {} ({})",
                outcome.predicted_level,
                engine.level_strategy()
            );
            if outcome.weak_topics.is_empty() {
                println!("Weak topics: none");
            } else {
                let names: Vec<String> = outcome
                    .weak_topics
                    .iter()
                    .map(|t| topic_display_name(t, config.locale))
                    .collect();
                println!("Weak topics: {}", names.join(", "));
            }
            if !graded.unknown_questions.is_empty() {
                println!(
                    "\n{} answer(s) for unknown questions: {}",
                    graded.unknown_questions.len(),
                    graded.unknown_questions.join(", ")
                );
            }
        }
    }

    Ok(())
}
