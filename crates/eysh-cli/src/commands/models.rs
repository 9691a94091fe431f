//! The `eysh models` command.

use std::path::PathBuf;

use anyhow::Result;

use eysh_core::engine::{AdaptiveEngine, EngineConfig};
use eysh_core::traits::{LEVEL_PREDICTOR, ROADMAP_GENERATOR, WEAKNESS_DETECTOR};
use eysh_models::config::load_config_from;
use eysh_models::{create_store, load_model_set};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    use comfy_table::{Cell, Table};

    let config = load_config_from(config_path.as_deref())?;
    println!("Model source: {}", config.models);

    let store = create_store(&config.models)?;
    let models = load_model_set(store.as_ref()).await;
    let no_models = models.is_empty();
    let engine = AdaptiveEngine::new(
        models,
        EngineConfig {
            locale: config.locale,
        },
    );

    let mut table = Table::new();
    table.set_header(vec!["Component", "Artifact", "Strategy"]);
    let rows = [
        ("Level estimator", LEVEL_PREDICTOR, engine.level_strategy()),
        ("Weakness detector", WEAKNESS_DETECTOR, engine.weakness_strategy()),
        ("Study hours", ROADMAP_GENERATOR, engine.hours_strategy()),
    ];
    for (component, artifact, strategy) in rows {
        table.add_row(vec![
            Cell::new(component),
            Cell::new(artifact),
            Cell::new(strategy),
        ]);
    }
    println!("{table}");

    if no_models {
        println!("No pretrained models found; using rule-based strategies.");
    }

    Ok(())
}
