//! Standard scaler: `(x - mean) / scale` per feature.

use eysh_core::error::PredictionError;
use eysh_core::traits::FeatureScaler;

use crate::error::ArtifactError;

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// `name` is only used to label errors.
    pub fn new(name: &str, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        if mean.len() != scale.len() {
            return Err(ArtifactError::invalid(
                name,
                format!(
                    "scaler has {} means but {} scales",
                    mean.len(),
                    scale.len()
                ),
            ));
        }
        if mean.iter().any(|m| !m.is_finite()) {
            return Err(ArtifactError::invalid(name, "scaler mean is not finite"));
        }
        if let Some(pos) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(ArtifactError::invalid(
                name,
                format!("scaler scale at {pos} is zero or not finite"),
            ));
        }
        Ok(Self { mean, scale })
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if row.len() != self.mean.len() {
            return Err(PredictionError::FeatureMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
