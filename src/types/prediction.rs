//! Prediction result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::symptoms::SymptomSet;

/// Upper confidence bound for the deterministic fallback tiers
pub const FALLBACK_CONFIDENCE_CEILING: f64 = 0.95;

/// Which tier of the fallback chain produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionTier {
    /// Pre-trained classifier
    TrainedModel,

    /// Symptom overlap against the reference dataset
    DatasetSimilarity,

    /// Hardcoded rule table
    Heuristic,
}

impl PredictionTier {
    /// Get all tiers in fallback order
    pub fn fallback_order() -> Vec<PredictionTier> {
        vec![
            PredictionTier::TrainedModel,
            PredictionTier::DatasetSimilarity,
            PredictionTier::Heuristic,
        ]
    }

    /// Get tier name
    pub fn name(&self) -> &'static str {
        match self {
            PredictionTier::TrainedModel => "trained_model",
            PredictionTier::DatasetSimilarity => "dataset_similarity",
            PredictionTier::Heuristic => "heuristic",
        }
    }

    /// Parse a tier from its name
    pub fn from_name(name: &str) -> Option<PredictionTier> {
        Self::fallback_order().into_iter().find(|t| t.name() == name)
    }

    /// Highest confidence this tier may report
    pub fn confidence_ceiling(&self) -> f64 {
        match self {
            PredictionTier::TrainedModel => 1.0,
            PredictionTier::DatasetSimilarity | PredictionTier::Heuristic => {
                FALLBACK_CONFIDENCE_CEILING
            }
        }
    }

    /// Clamp a raw confidence into this tier's range; non-finite values become 0
    pub fn bound_confidence(&self, raw: f64) -> f64 {
        if !raw.is_finite() {
            return 0.0;
        }
        raw.clamp(0.0, self.confidence_ceiling())
    }
}

impl std::fmt::Display for PredictionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A tier's answer before it is shaped into a response
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub tier: PredictionTier,
    pub condition: String,
    pub confidence: f64,
    pub description: String,
    pub precautions: Vec<String>,
}

impl Diagnosis {
    /// Create a diagnosis, bounding confidence to the tier's range
    pub fn new(
        tier: PredictionTier,
        condition: impl Into<String>,
        confidence: f64,
        description: impl Into<String>,
        precautions: Vec<String>,
    ) -> Self {
        Self {
            tier,
            condition: condition.into(),
            confidence: tier.bound_confidence(confidence),
            description: description.into(),
            precautions,
        }
    }
}

/// One echoed symptom in display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSymptom {
    pub symptom: String,
}

/// Uniform response returned to the caller, whichever tier answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub condition: String,
    pub confidence: f64,
    pub description: String,
    pub precautions: Vec<String>,
    pub top_symptoms: Vec<TopSymptom>,
    pub tier: PredictionTier,
}

impl PredictionResult {
    /// Shape a tier's diagnosis into the response for these symptoms
    pub fn from_diagnosis(diagnosis: Diagnosis, symptoms: &SymptomSet) -> Self {
        Self {
            condition: diagnosis.condition,
            confidence: diagnosis.confidence,
            description: diagnosis.description,
            precautions: diagnosis.precautions,
            top_symptoms: symptoms.top_symptoms(),
            tier: diagnosis.tier,
        }
    }
}

/// Prediction history entry handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub symptoms: Vec<String>,
    pub condition: String,
    pub confidence: f64,
    pub description: String,
    pub precautions: Vec<String>,
    pub tier: PredictionTier,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Create a record for a finalized result
    pub fn new(
        user_id: i64,
        symptoms: &SymptomSet,
        result: &PredictionResult,
        predicted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            symptoms: symptoms.as_slice().to_vec(),
            condition: result.condition.clone(),
            confidence: result.confidence,
            description: result.description.clone(),
            precautions: result.precautions.clone(),
            tier: result.tier,
            predicted_at,
        }
    }
}
