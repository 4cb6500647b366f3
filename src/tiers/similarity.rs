//! Tier 2: symptom overlap against the reference dataset
//!
//! Every condition profile is scored by the share of its symptoms that
//! were reported and by the severity weight of the matched symptoms.
//! Confidence blends the two:
//!
//! `min(0.95, match_percentage * 0.7 + severity_score / (selected_severity + 0.1) * 0.3)`

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{InferenceError, Result};
use crate::reference::ReferenceDataStore;
use crate::tiers::Predictor;
use crate::types::prediction::FALLBACK_CONFIDENCE_CEILING;
use crate::types::{Diagnosis, PredictionTier, SymptomSet};

const MATCH_WEIGHT: f64 = 0.7;
const SEVERITY_WEIGHT: f64 = 0.3;
const SEVERITY_GUARD: f64 = 0.1;

pub const DEFAULT_PRECAUTION: &str = "Consult a healthcare professional";

/// Best-seen score for one condition
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionMatch {
    pub condition: String,
    pub match_count: usize,
    pub match_percentage: f64,
    pub severity_score: f64,
    pub total_symptoms: usize,
}

/// Ranks reference conditions by overlap with the reported symptoms
#[derive(Debug, Clone)]
pub struct SimilarityTier {
    store: Arc<ReferenceDataStore>,
}

impl SimilarityTier {
    pub fn new(store: Arc<ReferenceDataStore>) -> Self {
        Self { store }
    }

    /// Score every condition and rank best first.
    ///
    /// Profiles without symptoms are skipped. When a condition has several
    /// rows only the row with the highest match percentage is kept, the
    /// earliest row winning ties. Ranking is by match percentage then
    /// severity score, both descending, with earlier conditions first on
    /// a full tie.
    pub fn rank(&self, symptoms: &SymptomSet) -> Vec<ConditionMatch> {
        let severity = self.store.severity();
        let mut retained: Vec<ConditionMatch> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for profile in self.store.profiles() {
            if profile.symptoms.is_empty() {
                continue;
            }

            let matched: Vec<&str> = symptoms.iter().filter(|s| profile.has_symptom(s)).collect();
            let candidate = ConditionMatch {
                condition: profile.name.clone(),
                match_count: matched.len(),
                match_percentage: matched.len() as f64 / profile.symptoms.len() as f64,
                severity_score: severity.total(matched.iter().copied()),
                total_symptoms: profile.symptoms.len(),
            };

            match positions.get(profile.name.as_str()) {
                Some(&idx) => {
                    if candidate.match_percentage > retained[idx].match_percentage {
                        retained[idx] = candidate;
                    }
                }
                None => {
                    positions.insert(profile.name.as_str(), retained.len());
                    retained.push(candidate);
                }
            }
        }

        // Stable sort keeps first-seen order among equal keys
        retained.sort_by(|a, b| {
            descending(a.match_percentage, b.match_percentage)
                .then_with(|| descending(a.severity_score, b.severity_score))
        });

        retained
    }

    /// Blend match share and severity share into a bounded confidence
    pub fn confidence(best: &ConditionMatch, selected_severity: f64) -> f64 {
        let raw = best.match_percentage * MATCH_WEIGHT
            + (best.severity_score / (selected_severity + SEVERITY_GUARD)) * SEVERITY_WEIGHT;
        raw.min(FALLBACK_CONFIDENCE_CEILING)
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

impl Predictor for SimilarityTier {
    fn tier(&self) -> PredictionTier {
        PredictionTier::DatasetSimilarity
    }

    fn try_predict(&self, symptoms: &SymptomSet) -> Result<Diagnosis> {
        if self.store.is_empty() {
            return Err(InferenceError::ReferenceDataUnavailable(
                "reference dataset is empty".to_string(),
            ));
        }

        let ranked = self.rank(symptoms);
        for candidate in ranked.iter().take(3) {
            debug!(
                condition = %candidate.condition,
                matched = candidate.match_count,
                of = candidate.total_symptoms,
                severity = candidate.severity_score,
                "similarity candidate"
            );
        }

        let best = ranked.into_iter().next().ok_or_else(|| {
            InferenceError::ReferenceDataUnavailable(
                "no reference profile lists any symptoms".to_string(),
            )
        })?;

        let selected_severity = self.store.severity().total(symptoms.iter());
        let confidence = Self::confidence(&best, selected_severity);

        let description = self
            .store
            .description_for(&best.condition)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Information about {} is not available.", best.condition));
        let precautions = self
            .store
            .precautions_for(&best.condition)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vec![DEFAULT_PRECAUTION.to_string()]);

        Ok(Diagnosis::new(
            PredictionTier::DatasetSimilarity,
            best.condition,
            confidence,
            description,
            precautions,
        ))
    }
}
