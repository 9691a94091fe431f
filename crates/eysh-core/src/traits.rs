//! Seams between the engine and pretrained models.
//!
//! The `eysh-models` crate implements these traits for artifacts produced by
//! the offline training harness. The engine only ever sees a [`ModelSet`]
//! assembled once at startup.

use std::fmt;
use std::sync::Arc;

use crate::error::PredictionError;

/// Artifact name of the level classifier.
pub const LEVEL_PREDICTOR: &str = "level_predictor";
/// Artifact name of the weakest-topic classifier.
pub const WEAKNESS_DETECTOR: &str = "weakness_detector";
/// Artifact name of the weekly-hours regressor.
pub const ROADMAP_GENERATOR: &str = "roadmap_generator";

/// A model mapping one feature row to one number.
///
/// Classifiers return their class label, regressors their prediction.
pub trait Predictor: Send + Sync {
    /// Number of features the model expects, if known.
    fn n_features(&self) -> Option<usize>;

    fn predict(&self, row: &[f64]) -> Result<f64, PredictionError>;
}

/// Feature preprocessing fitted alongside a predictor.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError>;
}

/// A (scaler, predictor) pair loaded from the artifact store.
#[derive(Clone)]
pub struct PretrainedModel {
    pub name: String,
    pub scaler: Option<Arc<dyn FeatureScaler>>,
    pub predictor: Arc<dyn Predictor>,
    /// Topic labels, for classifiers that predict a topic index.
    pub topics: Vec<String>,
}

impl PretrainedModel {
    pub fn new(name: impl Into<String>, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            name: name.into(),
            scaler: None,
            predictor,
            topics: Vec::new(),
        }
    }

    pub fn with_scaler(mut self, scaler: Arc<dyn FeatureScaler>) -> Self {
        self.scaler = Some(scaler);
        self
    }

    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    /// Validate, scale, and predict a single row.
    pub fn predict(&self, row: &[f64]) -> Result<f64, PredictionError> {
        if let Some(pos) = row.iter().position(|v| !v.is_finite()) {
            return Err(PredictionError::NonFinite(pos));
        }
        if let Some(expected) = self.predictor.n_features() {
            if expected != row.len() {
                return Err(PredictionError::FeatureMismatch {
                    expected,
                    actual: row.len(),
                });
            }
        }

        let output = match &self.scaler {
            Some(scaler) => self.predictor.predict(&scaler.transform(row)?)?,
            None => self.predictor.predict(row)?,
        };

        if !output.is_finite() {
            return Err(PredictionError::NonFinite(0));
        }
        Ok(output)
    }
}

impl fmt::Debug for PretrainedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PretrainedModel")
            .field("name", &self.name)
            .field("scaled", &self.scaler.is_some())
            .field("n_features", &self.predictor.n_features())
            .field("topics", &self.topics)
            .finish()
    }
}

/// Every optional model the engine can use. Missing entries select the
/// rule-based strategy for that component.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    pub level: Option<PretrainedModel>,
    pub weakness: Option<PretrainedModel>,
    pub roadmap: Option<PretrainedModel>,
}

impl ModelSet {
    /// A model set with nothing loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_none() && self.weakness.is_none() && self.roadmap.is_none()
    }

    /// Names of the models that are present.
    pub fn available(&self) -> Vec<&str> {
        [&self.level, &self.weakness, &self.roadmap]
            .into_iter()
            .flatten()
            .map(|m| m.name.as_str())
            .collect()
    }
}
