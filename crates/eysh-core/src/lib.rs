//! eysh-core: Adaptive-learning engine, data model, and scoring.
//!
//! This crate defines the data model, the four engine components (level
//! estimation, weakness detection, roadmap generation, mentor matching),
//! and the strategy traits pretrained models plug into.

pub mod engine;
pub mod error;
pub mod features;
pub mod grading;
pub mod level;
pub mod mentor;
pub mod model;
pub mod parser;
pub mod report;
pub mod roadmap;
pub mod statistics;
pub mod traits;
pub mod weakness;
