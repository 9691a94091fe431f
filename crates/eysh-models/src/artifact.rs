//! JSON model artifact format.
//!
//! ```json
//! {
//!   "name": "level_predictor",
//!   "features": ["correct_ratio", "avg_time", "..."],
//!   "scaler": { "mean": [...], "scale": [...] },
//!   "topics": ["algebra", "..."],
//!   "predictor": {
//!     "aggregation": { "type": "vote", "classes": [2, 3, 4, 5, 6, 7, 8, 10] },
//!     "trees": [{ "children_left": [...], "children_right": [...],
//!                 "feature": [...], "threshold": [...], "value": [[...]] }]
//!   }
//! }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use eysh_core::traits::PretrainedModel;

use crate::error::ArtifactError;
use crate::scaler::StandardScaler;
use crate::tree::{Aggregation, DecisionTree, TreeEnsemble};

/// A pretrained model as exported by the training harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    /// Feature names, in input order. Empty when unknown.
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub scaler: Option<ScalerParams>,
    /// Class labels for topic classifiers.
    #[serde(default)]
    pub topics: Vec<String>,
    pub predictor: EnsembleParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleParams {
    pub trees: Vec<DecisionTree>,
    pub aggregation: Aggregation,
}

impl ModelArtifact {
    /// Decode an artifact. `name` labels errors; the artifact's own name is
    /// kept on success.
    pub fn from_json(name: &str, json: &str) -> Result<Self, ArtifactError> {
        serde_json::from_str(json).map_err(|source| ArtifactError::Json {
            name: name.to_string(),
            source,
        })
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        serde_json::to_string_pretty(self).map_err(|source| ArtifactError::Json {
            name: self.name.clone(),
            source,
        })
    }

    /// Number of input features, from the feature list or the scaler.
    pub fn n_features(&self) -> Option<usize> {
        if !self.features.is_empty() {
            Some(self.features.len())
        } else {
            self.scaler.as_ref().map(|s| s.mean.len())
        }
    }

    /// Validate the artifact and build a model the engine can use.
    pub fn into_model(self) -> Result<PretrainedModel, ArtifactError> {
        let n_features = self.n_features();

        let scaler = match self.scaler {
            Some(params) => {
                let scaler = StandardScaler::new(&self.name, params.mean, params.scale)?;
                if n_features.is_some_and(|n| n != scaler.len()) {
                    return Err(ArtifactError::invalid(
                        &self.name,
                        format!(
                            "scaler covers {} features but {} are listed",
                            scaler.len(),
                            self.features.len()
                        ),
                    ));
                }
                Some(scaler)
            }
            None => None,
        };

        let mut seen = HashSet::new();
        if let Some(dup) = self.topics.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(ArtifactError::invalid(
                &self.name,
                format!("topic {dup} is listed more than once"),
            ));
        }

        if let Aggregation::Vote { classes } = &self.predictor.aggregation {
            if !self.topics.is_empty() {
                let out_of_range = classes
                    .iter()
                    .any(|c| *c < 0.0 || c.round() as usize >= self.topics.len());
                if out_of_range {
                    return Err(ArtifactError::invalid(
                        &self.name,
                        "class label outside the topic list",
                    ));
                }
            }
        }

        let ensemble = TreeEnsemble::new(
            &self.name,
            self.predictor.trees,
            self.predictor.aggregation,
            n_features,
        )?;

        let mut model =
            PretrainedModel::new(self.name, Arc::new(ensemble)).with_topics(self.topics);
        if let Some(scaler) = scaler {
            model = model.with_scaler(Arc::new(scaler));
        }
        Ok(model)
    }
}
