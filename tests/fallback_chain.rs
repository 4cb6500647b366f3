//! End-to-end tests of the tier fallback chain

mod common;

use healthbuddy::{InferenceEngine, InferenceError, PredictionTier};

#[test]
fn test_trained_model_answers_first() {
    let dir = tempfile::tempdir().unwrap();
    common::write_reference_data(&dir.path().join("data"));
    common::write_model_artifacts(&dir.path().join("model"));

    let engine = InferenceEngine::load(&common::config_in(dir.path()));
    let result = engine.infer(1, ["chills", "High Fever"]).unwrap();

    assert_eq!(result.tier, PredictionTier::TrainedModel);
    assert_eq!(result.condition, "Malaria");
    assert!(result.confidence > 0.9 && result.confidence <= 1.0);
    assert_eq!(result.description, "Mosquito-borne parasitic disease.");
    assert_eq!(result.precautions, vec!["Consult nearest hospital", "avoid oily food"]);
    assert_eq!(result.top_symptoms[1].symptom, "High Fever");
}

#[test]
fn test_trained_model_uses_defaults_for_missing_text() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model_artifacts(&dir.path().join("model"));

    let engine = InferenceEngine::load(&common::config_in(dir.path()));
    let result = engine.infer(1, ["itching", "skin_rash"]).unwrap();

    assert_eq!(result.tier, PredictionTier::TrainedModel);
    assert_eq!(result.condition, "Fungal infection");
    assert_eq!(result.description, "No description available");
    assert_eq!(result.precautions, vec!["Consult a doctor"]);
}

#[test]
fn test_missing_artifacts_fall_back_to_similarity() {
    let dir = tempfile::tempdir().unwrap();
    common::write_reference_data(&dir.path().join("data"));

    let engine = InferenceEngine::load(&common::config_in(dir.path()));
    let result = engine.infer(1, ["itching", "skin_rash"]).unwrap();

    assert_eq!(result.tier, PredictionTier::DatasetSimilarity);
    assert_eq!(result.condition, "Fungal infection");
    assert!(result.description.starts_with("In humans, fungal infections"));
    assert_eq!(result.precautions.len(), 4);
    assert!(result.confidence <= 0.95);
}

#[test]
fn test_broken_artifacts_fall_back_to_similarity() {
    let broken = [
        ("classifier.json", "{\"weights\": [[4.0, 4.0"),
        ("feature_names.json", r#"["itching", "skin_rash", "chills"]"#),
    ];

    for (file, contents) in broken {
        let dir = tempfile::tempdir().unwrap();
        common::write_reference_data(&dir.path().join("data"));
        common::write_model_artifacts(&dir.path().join("model"));
        std::fs::write(dir.path().join("model").join(file), contents).unwrap();

        let engine = InferenceEngine::load(&common::config_in(dir.path()));
        let result = engine.infer(1, ["chills", "vomiting", "high_fever"]).unwrap();

        assert_eq!(result.tier, PredictionTier::DatasetSimilarity, "broken {}", file);
        assert_eq!(result.condition, "Malaria");
    }
}

#[test]
fn test_disabled_model_behaves_like_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    common::write_reference_data(&dir.path().join("data"));
    common::write_model_artifacts(&dir.path().join("model"));

    let mut config = common::config_in(dir.path());
    config.model.enabled = false;
    let disabled = InferenceEngine::load(&config);

    std::fs::remove_dir_all(dir.path().join("model")).unwrap();
    config.model.enabled = true;
    let missing = InferenceEngine::load(&config);

    let symptoms = ["chills", "vomiting", "high_fever"];
    assert_eq!(disabled.infer(1, symptoms).unwrap(), missing.infer(1, symptoms).unwrap());
}

#[test]
fn test_blank_precaution_row_yields_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    common::write_reference_data(&dir.path().join("data"));

    let engine = InferenceEngine::load(&common::config_in(dir.path()));
    let result = engine
        .infer(1, ["continuous_sneezing", "shivering", "watering_from_eyes"])
        .unwrap();

    assert_eq!(result.condition, "Allergy");
    assert!(result.precautions.is_empty());
    assert_eq!(result.description, "Information about Allergy is not available.");
}

#[test]
fn test_no_data_reaches_heuristic_rules() {
    let dir = tempfile::tempdir().unwrap();
    let engine = InferenceEngine::load(&common::config_in(dir.path()));

    let fungal = engine.infer(1, ["skin_rash", "itching"]).unwrap();
    assert_eq!(fungal.tier, PredictionTier::Heuristic);
    assert_eq!(fungal.condition, "Fungal infection");
    assert_eq!(fungal.confidence, 0.75);

    let fallback = engine.infer(1, ["mild_fever"]).unwrap();
    assert_eq!(fallback.condition, "General Viral Infection");
    assert_eq!(fallback.confidence, 0.5);
}

#[test]
fn test_empty_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = InferenceEngine::load(&common::config_in(dir.path()));

    let none: Vec<String> = Vec::new();
    assert!(matches!(engine.infer(1, none), Err(InferenceError::NoSymptomsProvided)));
    assert!(matches!(engine.infer(1, [" "]), Err(InferenceError::NoSymptomsProvided)));
}

#[test]
fn test_json_response_shape() {
    let dir = tempfile::tempdir().unwrap();
    let engine = InferenceEngine::load(&common::config_in(dir.path()));
    let result = engine.infer(1, ["high_fever", "headache"]).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    for key in ["condition", "confidence", "description", "precautions", "topSymptoms", "tier"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["topSymptoms"][0]["symptom"], "High Fever");
}
