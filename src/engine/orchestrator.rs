//! Fallback chain orchestrator

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cli::config::Config;
use crate::errors::Result;
use crate::model::ModelArtifacts;
use crate::persistence::PredictionSink;
use crate::reference::{load_reference_data, ReferenceDataStore};
use crate::tiers::{HeuristicTier, Predictor, SimilarityTier, TrainedModelTier};
use crate::types::{Diagnosis, PredictionRecord, PredictionResult, PredictionTier, SymptomSet};

/// Runs tiers in order until one answers; the heuristic tier always does
pub struct InferenceEngine {
    tiers: Vec<Box<dyn Predictor>>,
    terminal: HeuristicTier,
    sink: Option<Arc<dyn PredictionSink>>,
}

impl InferenceEngine {
    /// Standard chain: trained model, dataset similarity, heuristic rules
    pub fn new(model: Option<Arc<ModelArtifacts>>, reference: Arc<ReferenceDataStore>) -> Self {
        let trained = match model {
            Some(artifacts) => TrainedModelTier::new(artifacts),
            None => TrainedModelTier::unavailable(),
        };

        Self::with_tiers(vec![
            Box::new(trained),
            Box::new(SimilarityTier::new(reference)),
        ])
    }

    /// Custom fallible tiers, always followed by the heuristic tier
    pub fn with_tiers(tiers: Vec<Box<dyn Predictor>>) -> Self {
        Self {
            tiers,
            terminal: HeuristicTier::new(),
            sink: None,
        }
    }

    /// Attach a destination for prediction history
    pub fn with_sink(mut self, sink: Arc<dyn PredictionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the standard chain from configured locations.
    ///
    /// Missing or inconsistent model artifacts and unreadable reference
    /// files degrade the chain instead of failing.
    pub fn load(config: &Config) -> Self {
        let model = if config.model.enabled {
            let dir = config.model_dir();
            match ModelArtifacts::load(&dir) {
                Ok(artifacts) => {
                    info!(
                        dir = %dir.display(),
                        classes = artifacts.decoder().len(),
                        features = artifacts.feature_names().len(),
                        "trained model loaded"
                    );
                    Some(Arc::new(artifacts))
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "trained model unavailable");
                    None
                }
            }
        } else {
            debug!("trained model disabled by configuration");
            None
        };

        let reference = load_reference_data(&config.data_files());
        info!(
            conditions = reference.condition_count(),
            severity_weights = reference.severity().len(),
            "reference data loaded"
        );

        Self::new(model, Arc::new(reference))
    }

    /// Tiers in the order they are consulted
    pub fn tier_order(&self) -> Vec<PredictionTier> {
        self.tiers
            .iter()
            .map(|t| t.tier())
            .chain(std::iter::once(self.terminal.tier()))
            .collect()
    }

    /// Run the chain on an already validated selection
    pub fn diagnose(&self, symptoms: &SymptomSet) -> Diagnosis {
        for tier in &self.tiers {
            match tier.try_predict(symptoms) {
                Ok(diagnosis) => {
                    info!(
                        tier = %diagnosis.tier,
                        condition = %diagnosis.condition,
                        confidence = diagnosis.confidence,
                        "prediction complete"
                    );
                    return diagnosis;
                }
                Err(e) => warn!(tier = %tier.tier(), error = %e, "tier failed, falling back"),
            }
        }

        let diagnosis = self.terminal.predict(symptoms);
        info!(
            tier = %diagnosis.tier,
            condition = %diagnosis.condition,
            confidence = diagnosis.confidence,
            "prediction complete"
        );
        diagnosis
    }

    /// Predict a condition for a user's symptoms.
    ///
    /// Fails only when no non-blank symptom is given. The result is
    /// recorded best-effort after it is built.
    pub fn infer<I, S>(&self, user_id: i64, symptoms: I) -> Result<PredictionResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symptoms = SymptomSet::new(symptoms)?;
        Ok(self.infer_set(user_id, &symptoms))
    }

    /// Predict for an already validated selection
    pub fn infer_set(&self, user_id: i64, symptoms: &SymptomSet) -> PredictionResult {
        let result = PredictionResult::from_diagnosis(self.diagnose(symptoms), symptoms);
        self.record(user_id, symptoms, &result);
        result
    }

    fn record(&self, user_id: i64, symptoms: &SymptomSet, result: &PredictionResult) {
        let Some(sink) = &self.sink else {
            return;
        };

        let record = PredictionRecord::new(user_id, symptoms, result, Utc::now());
        if let Err(e) = sink.record_prediction(&record) {
            warn!(user_id, record = %record.id, error = %e, "failed to record prediction");
        }
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("tiers", &self.tier_order())
            .field("recording", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InferenceError;
    use crate::reference::{ConditionProfile, SeverityTable};
    use std::sync::Mutex;

    fn store() -> Arc<ReferenceDataStore> {
        let severity: SeverityTable = [("itching", 1.0), ("skin_rash", 3.0), ("cough", 4.0)]
            .into_iter()
            .collect();
        Arc::new(ReferenceDataStore::new(
            vec![
                ConditionProfile::new("Fungal infection", ["itching", "skin_rash"])
                    .with_description("A fungal skin infection.")
                    .with_precautions(["bath twice", "keep dry"]),
                ConditionProfile::new("Bronchitis", ["cough", "chest_pain"]),
            ],
            severity,
        ))
    }

    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<PredictionRecord>>,
    }

    impl PredictionSink for MemorySink {
        fn record_prediction(&self, record: &PredictionRecord) -> Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl PredictionSink for FailingSink {
        fn record_prediction(&self, _record: &PredictionRecord) -> Result<()> {
            Err(InferenceError::PersistenceFailure("database locked".to_string()))
        }
    }

    #[test]
    fn test_missing_model_falls_through_to_similarity() {
        let engine = InferenceEngine::new(None, store());
        let result = engine.infer(1, ["itching", "skin_rash"]).unwrap();

        assert_eq!(result.tier, PredictionTier::DatasetSimilarity);
        assert_eq!(result.condition, "Fungal infection");
        assert_eq!(result.description, "A fungal skin infection.");
    }

    #[test]
    fn test_fallthrough_matches_direct_similarity() {
        let engine = InferenceEngine::new(None, store());
        let symptoms = SymptomSet::new(["cough"]).unwrap();

        let direct = SimilarityTier::new(store()).try_predict(&symptoms).unwrap();
        assert_eq!(engine.diagnose(&symptoms), direct);
    }

    #[test]
    fn test_empty_reference_reaches_heuristic() {
        let engine = InferenceEngine::new(None, Arc::new(ReferenceDataStore::empty()));
        let result = engine.infer(1, ["skin_rash", "itching"]).unwrap();

        assert_eq!(result.tier, PredictionTier::Heuristic);
        assert_eq!(result.condition, "Fungal infection");
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn test_no_symptoms_is_the_only_error() {
        let engine = InferenceEngine::new(None, store());
        assert!(matches!(
            engine.infer(1, ["  ", ""]),
            Err(InferenceError::NoSymptomsProvided)
        ));
    }

    #[test]
    fn test_tier_order() {
        let engine = InferenceEngine::new(None, store());
        assert_eq!(engine.tier_order(), PredictionTier::fallback_order());
    }

    #[test]
    fn test_results_are_recorded() {
        let sink = Arc::new(MemorySink::default());
        let engine = InferenceEngine::new(None, store()).with_sink(sink.clone());

        let result = engine.infer(42, ["itching", "skin_rash"]).unwrap();

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, 42);
        assert_eq!(records[0].condition, result.condition);
        assert_eq!(records[0].symptoms, vec!["itching", "skin_rash"]);
    }

    #[test]
    fn test_sink_failure_does_not_change_result() {
        let plain = InferenceEngine::new(None, store());
        let failing = InferenceEngine::new(None, store()).with_sink(Arc::new(FailingSink));

        let expected = plain.infer(1, ["cough"]).unwrap();
        let actual = failing.infer(1, ["cough"]).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_concurrent_inference() {
        let engine = Arc::new(InferenceEngine::new(None, store()));
        let expected = engine.infer(1, ["itching", "skin_rash"]).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.infer(i, ["itching", "skin_rash"]).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
