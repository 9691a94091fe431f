//! eysh-models: Pretrained model artifacts and where to load them from.
//!
//! Implements the `Predictor` and `FeatureScaler` traits for the JSON
//! artifacts exported by the training harness (standard scalers and
//! decision-tree ensembles), and the stores that serve them.

pub mod artifact;
pub mod config;
pub mod error;
pub mod mock;
pub mod scaler;
pub mod store;
pub mod tree;

pub use artifact::ModelArtifact;
pub use config::{create_store, load_config_from, EyshConfig, ModelSource};
pub use error::ArtifactError;
pub use store::{load_model_set, ArtifactStore, HttpStore, LocalStore};
