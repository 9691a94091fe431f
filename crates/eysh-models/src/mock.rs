//! Mock predictors and stores for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use eysh_core::error::PredictionError;
use eysh_core::traits::{PretrainedModel, Predictor};

use crate::artifact::ModelArtifact;
use crate::error::ArtifactError;
use crate::store::ArtifactStore;

/// A predictor that returns a fixed answer and records its inputs.
pub struct MockPredictor {
    output: Result<f64, PredictionError>,
    n_features: Option<usize>,
    call_count: AtomicU32,
    last_row: Mutex<Option<Vec<f64>>>,
}

impl MockPredictor {
    /// Always predicts `value`.
    pub fn returning(value: f64) -> Self {
        Self::with_output(Ok(value))
    }

    /// Always fails with `error`.
    pub fn failing(error: PredictionError) -> Self {
        Self::with_output(Err(error))
    }

    fn with_output(output: Result<f64, PredictionError>) -> Self {
        Self {
            output,
            n_features: None,
            call_count: AtomicU32::new(0),
            last_row: Mutex::new(None),
        }
    }

    /// Reject rows that aren't `n` long.
    pub fn expecting_features(mut self, n: usize) -> Self {
        self.n_features = Some(n);
        self
    }

    /// Get the number of predictions made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last row passed to `predict`.
    pub fn last_row(&self) -> Option<Vec<f64>> {
        self.last_row.lock().ok().and_then(|row| row.clone())
    }

    /// Wrap in a model named `name`, keeping a handle for assertions.
    pub fn into_model(self, name: &str) -> (PretrainedModel, Arc<MockPredictor>) {
        let predictor = Arc::new(self);
        let model = PretrainedModel::new(name, predictor.clone());
        (model, predictor)
    }
}

impl Predictor for MockPredictor {
    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<f64, PredictionError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_row.lock() {
            *last = Some(row.to_vec());
        }
        self.output.clone()
    }
}

/// An artifact store backed by a map, with optional per-name failures.
#[derive(Default)]
pub struct MemoryStore {
    artifacts: HashMap<String, ModelArtifact>,
    failures: HashMap<String, String>,
    fetches: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifact(mut self, artifact: ModelArtifact) -> Self {
        self.artifacts.insert(artifact.name.clone(), artifact);
        self
    }

    /// Make fetching `name` fail with a network error.
    pub fn with_failure(mut self, name: &str, message: &str) -> Self {
        self.failures.insert(name.to_string(), message.to_string());
        self
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn fetch(&self, name: &str) -> Result<Option<ModelArtifact>, ArtifactError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if let Some(message) = self.failures.get(name) {
            return Err(ArtifactError::Network(message.clone()));
        }
        Ok(self.artifacts.get(name).cloned())
    }
}
