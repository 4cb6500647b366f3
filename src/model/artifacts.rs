//! Model artifact bundle and its consistency rules

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::errors::{InferenceError, Result};
use crate::model::classifier::{Classifier, LinearClassifier};
use crate::types::SymptomSet;

pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const LABELS_FILE: &str = "label_encoder.json";
pub const FEATURES_FILE: &str = "feature_names.json";
pub const DISPLAY_MAP_FILE: &str = "display_to_data.json";
pub const DESCRIPTIONS_FILE: &str = "disease_descriptions.json";
pub const PRECAUTIONS_FILE: &str = "disease_precautions.json";

/// Every file an artifact directory must contain
pub const ARTIFACT_FILES: [&str; 6] = [
    CLASSIFIER_FILE,
    LABELS_FILE,
    FEATURES_FILE,
    DISPLAY_MAP_FILE,
    DESCRIPTIONS_FILE,
    PRECAUTIONS_FILE,
];

/// Maps predicted label indices back to condition names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDecoder {
    labels: Vec<String>,
}

impl LabelDecoder {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Condition name for a label index
    pub fn decode(&self, label: usize) -> Result<&str> {
        self.labels.get(label).map(String::as_str).ok_or_else(|| {
            InferenceError::EncodingError(format!(
                "label {} outside decoder range 0..{}",
                label,
                self.labels.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Classifier plus everything needed to feed it and describe its output.
///
/// Construction checks that the feature layout matches the classifier
/// width and that the decoder covers every label the classifier can emit.
pub struct ModelArtifacts {
    classifier: Arc<dyn Classifier>,
    decoder: LabelDecoder,
    feature_names: Vec<String>,
    feature_index: HashMap<String, usize>,
    display_to_canonical: HashMap<String, String>,
    descriptions: HashMap<String, String>,
    precautions: HashMap<String, Vec<String>>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("n_features", &self.feature_names.len())
            .field("n_labels", &self.decoder.len())
            .field("display_aliases", &self.display_to_canonical.len())
            .finish()
    }
}

impl ModelArtifacts {
    /// Assemble and validate an artifact bundle
    pub fn new(
        classifier: Arc<dyn Classifier>,
        decoder: LabelDecoder,
        feature_names: Vec<String>,
        display_to_canonical: HashMap<String, String>,
        descriptions: HashMap<String, String>,
        precautions: HashMap<String, Vec<String>>,
    ) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(InferenceError::ModelUnavailable(
                "feature name list is empty".to_string(),
            ));
        }
        if classifier.n_features() != feature_names.len() {
            return Err(InferenceError::ModelUnavailable(format!(
                "classifier expects {} features but layout lists {}",
                classifier.n_features(),
                feature_names.len()
            )));
        }
        if decoder.len() < classifier.n_classes() {
            return Err(InferenceError::ModelUnavailable(format!(
                "decoder covers {} labels but classifier emits {}",
                decoder.len(),
                classifier.n_classes()
            )));
        }

        // First occurrence defines the slot for a repeated name
        let mut feature_index = HashMap::with_capacity(feature_names.len());
        for (idx, name) in feature_names.iter().enumerate() {
            feature_index.entry(name.clone()).or_insert(idx);
        }

        Ok(Self {
            classifier,
            decoder,
            feature_names,
            feature_index,
            display_to_canonical,
            descriptions,
            precautions,
        })
    }

    /// Load the six artifact files from a directory
    pub fn load(dir: &Path) -> Result<Self> {
        for file in ARTIFACT_FILES {
            if !dir.join(file).is_file() {
                return Err(InferenceError::ModelUnavailable(format!(
                    "{} missing from {}",
                    file,
                    dir.display()
                )));
            }
        }

        let classifier = LinearClassifier::load(&dir.join(CLASSIFIER_FILE))?;
        let labels: Vec<String> = read_json(&dir.join(LABELS_FILE))?;
        let feature_names: Vec<String> = read_json(&dir.join(FEATURES_FILE))?;
        let display_to_canonical: HashMap<String, String> = read_json(&dir.join(DISPLAY_MAP_FILE))?;
        let descriptions: HashMap<String, String> = read_json(&dir.join(DESCRIPTIONS_FILE))?;
        let precautions: HashMap<String, Vec<String>> = read_json(&dir.join(PRECAUTIONS_FILE))?;

        let artifacts = Self::new(
            Arc::new(classifier),
            LabelDecoder::new(labels),
            feature_names,
            display_to_canonical,
            descriptions,
            precautions,
        )?;

        info!(
            dir = %dir.display(),
            features = artifacts.feature_names.len(),
            labels = artifacts.decoder.len(),
            "trained model artifacts loaded"
        );
        Ok(artifacts)
    }

    /// Resolve a reported symptom to its canonical feature name
    pub fn canonical<'a>(&'a self, symptom: &'a str) -> &'a str {
        self.display_to_canonical
            .get(symptom)
            .map(String::as_str)
            .unwrap_or(symptom)
    }

    /// Slot of a canonical feature name in the vector layout
    pub fn feature_position(&self, canonical: &str) -> Option<usize> {
        self.feature_index.get(canonical).copied()
    }

    /// Binary feature vector for a symptom set; unresolvable symptoms are ignored
    pub fn encode(&self, symptoms: &SymptomSet) -> Vec<f32> {
        let mut features = vec![0.0; self.feature_names.len()];
        for symptom in symptoms.iter() {
            if let Some(idx) = self.feature_position(self.canonical(symptom)) {
                features[idx] = 1.0;
            }
        }
        features
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn decoder(&self) -> &LabelDecoder {
        &self.decoder
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn description(&self, condition: &str) -> Option<&str> {
        self.descriptions.get(condition).map(String::as_str)
    }

    pub fn precautions(&self, condition: &str) -> Option<&[String]> {
        self.precautions.get(condition).map(Vec::as_slice)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        InferenceError::ModelUnavailable(format!("{} is not valid: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier {
        features: usize,
        classes: usize,
    }

    impl Classifier for FixedClassifier {
        fn n_features(&self) -> usize {
            self.features
        }
        fn n_classes(&self) -> usize {
            self.classes
        }
        fn predict(&self, _features: &[f32]) -> Result<usize> {
            Ok(0)
        }
        fn predict_proba(&self, _features: &[f32]) -> Result<Vec<f32>> {
            Ok(vec![1.0 / self.classes as f32; self.classes])
        }
    }

    fn artifacts(features: Vec<&str>, labels: Vec<&str>, classes: usize) -> Result<ModelArtifacts> {
        let mut display = HashMap::new();
        display.insert("Skin Rash".to_string(), "skin_rash".to_string());
        display.insert("Dizzy".to_string(), "not_a_feature".to_string());

        ModelArtifacts::new(
            Arc::new(FixedClassifier {
                features: features.len(),
                classes,
            }),
            LabelDecoder::new(labels.into_iter().map(String::from).collect()),
            features.into_iter().map(String::from).collect(),
            display,
            HashMap::new(),
            HashMap::new(),
        )
    }

    #[test]
    fn test_decoder_out_of_range() {
        let decoder = LabelDecoder::new(vec!["Acne".to_string()]);
        assert_eq!(decoder.decode(0).unwrap(), "Acne");
        assert!(matches!(decoder.decode(3), Err(InferenceError::EncodingError(_))));
    }

    #[test]
    fn test_encode_resolves_display_names() {
        let artifacts = artifacts(vec!["itching", "skin_rash", "chills"], vec!["A", "B"], 2).unwrap();
        let symptoms = SymptomSet::new(["Skin Rash", "chills", "Dizzy", "unknown"]).unwrap();
        assert_eq!(artifacts.encode(&symptoms), vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_decoder_must_cover_classes() {
        let err = artifacts(vec!["itching"], vec!["A"], 2).unwrap_err();
        assert!(matches!(err, InferenceError::ModelUnavailable(_)));
    }

    #[test]
    fn test_empty_layout_rejected() {
        assert!(artifacts(vec![], vec!["A"], 1).is_err());
    }

    #[test]
    fn test_repeated_feature_uses_first_slot() {
        let artifacts = artifacts(vec!["itching", "itching"], vec!["A"], 1).unwrap();
        assert_eq!(artifacts.feature_position("itching"), Some(0));
    }

    #[test]
    fn test_load_missing_directory() {
        let err = ModelArtifacts::load(Path::new("/no/such/model/dir")).unwrap_err();
        assert!(matches!(err, InferenceError::ModelUnavailable(_)));
    }
}
