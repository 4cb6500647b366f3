//! Tier 1: pre-trained classifier

use std::sync::Arc;

use tracing::debug;

use crate::errors::{InferenceError, Result};
use crate::model::ModelArtifacts;
use crate::tiers::Predictor;
use crate::types::{Diagnosis, PredictionTier, SymptomSet};

pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_PRECAUTION: &str = "Consult a doctor";

/// Asks the trained classifier for a label and its probability
#[derive(Debug, Clone, Default)]
pub struct TrainedModelTier {
    artifacts: Option<Arc<ModelArtifacts>>,
}

impl TrainedModelTier {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self {
            artifacts: Some(artifacts),
        }
    }

    /// A tier with no model; every request falls through
    pub fn unavailable() -> Self {
        Self { artifacts: None }
    }
}

impl Predictor for TrainedModelTier {
    fn tier(&self) -> PredictionTier {
        PredictionTier::TrainedModel
    }

    fn try_predict(&self, symptoms: &SymptomSet) -> Result<Diagnosis> {
        let artifacts = self.artifacts.as_ref().ok_or_else(|| {
            InferenceError::ModelUnavailable("no trained model artifacts loaded".to_string())
        })?;

        let features = artifacts.encode(symptoms);
        debug!(
            active = features.iter().filter(|f| **f > 0.0).count(),
            width = features.len(),
            "feature vector built"
        );

        let classifier = artifacts.classifier();
        let label = classifier.predict(&features).map_err(into_model_failure)?;
        let condition = artifacts.decoder().decode(label)?;

        let probabilities = classifier.predict_proba(&features).map_err(into_model_failure)?;
        let confidence = probabilities
            .iter()
            .copied()
            .filter(|p| p.is_finite())
            .fold(None, |best: Option<f32>, p| Some(best.map_or(p, |b| b.max(p))))
            .ok_or_else(|| {
                InferenceError::ModelUnavailable("classifier returned no usable probabilities".to_string())
            })?;

        let description = artifacts
            .description(condition)
            .unwrap_or(DEFAULT_DESCRIPTION);
        let precautions = artifacts
            .precautions(condition)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vec![DEFAULT_PRECAUTION.to_string()]);

        Ok(Diagnosis::new(
            PredictionTier::TrainedModel,
            condition,
            f64::from(confidence),
            description,
            precautions,
        ))
    }
}

fn into_model_failure(err: InferenceError) -> InferenceError {
    match err {
        InferenceError::EncodingError(_) | InferenceError::ModelUnavailable(_) => err,
        other => InferenceError::ModelUnavailable(other.to_string()),
    }
}
