//! Engine error types.
//!
//! Prediction errors never reach engine callers: each learned strategy
//! catches them and falls back to its rule-based answer. They are typed so
//! the fallback can be logged with a meaningful reason.

use thiserror::Error;

/// Errors raised while scaling features or running a pretrained model.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictionError {
    /// The feature row doesn't match what the model was trained on.
    #[error("feature count mismatch: expected {expected}, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    /// A feature or model output was NaN or infinite.
    #[error("non-finite value at position {0}")]
    NonFinite(usize),

    /// A classifier returned an index with no matching label.
    #[error("class index {index} out of range for {len} labels")]
    UnknownClass { index: usize, len: usize },

    /// The model has no trees, classes, or other required content.
    #[error("model is empty: {0}")]
    EmptyModel(String),
}

/// Errors from roadmap progress updates.
#[derive(Debug, Error, PartialEq)]
pub enum ProgressError {
    #[error("week {0} not found in roadmap")]
    WeekNotFound(u32),
}
