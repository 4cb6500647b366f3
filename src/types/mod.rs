//! Type definitions module
//!
//! Core types shared by the tiers, the engine and the persistence layer.

pub mod symptoms;
pub mod prediction;

// Re-export commonly used types
pub use symptoms::{display_name, SymptomSet};
pub use prediction::{Diagnosis, PredictionRecord, PredictionResult, PredictionTier, TopSymptom};
