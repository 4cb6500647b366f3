//! Prediction tiers
//!
//! Each tier is one strategy in the fallback chain. Tiers are pure and
//! read-only over their injected data, so a single instance can serve
//! any number of concurrent inferences.

pub mod heuristic;
pub mod similarity;
pub mod trained;

pub use heuristic::HeuristicTier;
pub use similarity::{ConditionMatch, SimilarityTier};
pub use trained::TrainedModelTier;

use crate::errors::Result;
use crate::types::{Diagnosis, PredictionTier};
use crate::types::SymptomSet;

/// Common capability of every tier in the chain
pub trait Predictor: Send + Sync {
    /// Which tier this is
    fn tier(&self) -> PredictionTier;

    /// Attempt a diagnosis; an error hands the request to the next tier
    fn try_predict(&self, symptoms: &SymptomSet) -> Result<Diagnosis>;
}
