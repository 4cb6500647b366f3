//! HealthBuddy v0.5.0 - Symptom-Based Condition Prediction
//!
//! Predicts a likely medical condition from user-reported symptoms using
//! a chain of increasingly simple strategies, so an answer is always
//! produced.
//!
//! # Architecture
//!
//! - **Tier 1**: pre-trained classifier over a binary symptom vector
//! - **Tier 2**: symptom overlap against the reference dataset, weighted by severity
//! - **Tier 3**: ordered keyword rules with a catch-all
//! - **Engine**: runs the chain and records each result best-effort

pub mod errors;
pub mod types;
pub mod reference;
pub mod model;
pub mod tiers;
pub mod engine;
pub mod persistence;

// Re-export commonly used types
pub use errors::{InferenceError, Result};
pub use engine::InferenceEngine;
pub use types::{PredictionResult, PredictionTier, SymptomSet};

// Outer surface: advice, configuration, diagnostics
pub mod advice;
pub mod cli;
pub mod doctor;
pub mod logging;
