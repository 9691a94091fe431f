pub mod assess;
pub mod cohort;
pub mod compare;
pub mod init;
pub mod mentors;
pub mod models;
pub mod progress;
pub mod roadmap;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use eysh_core::engine::{AdaptiveEngine, EngineConfig};
use eysh_core::model::{Locale, TestOutcome};
use eysh_core::report::StudyReport;
use eysh_models::{create_store, load_model_set, EyshConfig};

/// Load whatever models the configured store has and build the engine.
pub async fn build_engine(config: &EyshConfig, locale: Locale) -> Result<AdaptiveEngine> {
    let store = create_store(&config.models)?;
    tracing::debug!("loading models from {}", store.describe());
    let models = load_model_set(store.as_ref()).await;
    Ok(AdaptiveEngine::new(models, EngineConfig { locale }))
}

/// Read a test outcome from a study report or a bare outcome file.
pub fn load_outcome(path: &Path) -> Result<TestOutcome> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON in {}", path.display()))?;

    if value.get("outcome").is_some() {
        let report: StudyReport = serde_json::from_value(value)
            .with_context(|| format!("invalid study report: {}", path.display()))?;
        Ok(report.outcome)
    } else {
        serde_json::from_value(value)
            .with_context(|| format!("invalid test outcome: {}", path.display()))
    }
}
