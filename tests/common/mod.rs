//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::Path;

use healthbuddy::cli::Config;

pub const DATASET: &str = "\
Disease,Symptom_1,Symptom_2,Symptom_3,Symptom_4
Fungal infection,itching,skin_rash,nodal_skin_eruptions,
Fungal infection,skin_rash,nodal_skin_eruptions,,
Allergy,continuous_sneezing,shivering,chills,watering_from_eyes
Malaria,chills,vomiting,high_fever,sweating
Common Cold,continuous_sneezing,chills,cough,runny_nose
";

pub const DESCRIPTIONS: &str = "\
Disease,Description
Fungal infection,\"In humans, fungal infections occur when an invading fungus takes over an area of the body.\"
Malaria,An infectious disease caused by protozoan parasites from the Plasmodium family.
";

pub const PRECAUTIONS: &str = "\
Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4
Fungal infection,bath twice,use detol or neem in bathing water,keep infected area dry,use clean cloths
Allergy,,,,
";

pub const SEVERITY: &str = "\
Symptom,weight
itching,1
skin_rash,3
nodal_skin_eruptions,4
continuous_sneezing,4
shivering,5
chills,3
watering_from_eyes,4
vomiting,5
high_fever,7
sweating,3
cough,4
runny_nose,5
";

/// Write the four reference files into `dir`
pub fn write_reference_data(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("Disease_Symptom_Dataset.csv"), DATASET).unwrap();
    std::fs::write(dir.join("symptom_Description.csv"), DESCRIPTIONS).unwrap();
    std::fs::write(dir.join("symptom_precaution.csv"), PRECAUTIONS).unwrap();
    std::fs::write(dir.join("Symptom-severity.csv"), SEVERITY).unwrap();
}

/// Write a two-class linear model over four features into `dir`
pub fn write_model_artifacts(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    let files = [
        (
            "classifier.json",
            r#"{"weights": [[4.0, 4.0, 0.0, 0.0], [0.0, 0.0, 4.0, 4.0]], "bias": [0.0, 0.0]}"#,
        ),
        ("label_encoder.json", r#"["Fungal infection", "Malaria"]"#),
        ("feature_names.json", r#"["itching", "skin_rash", "chills", "high_fever"]"#),
        ("display_to_data.json", r#"{"Skin Rash": "skin_rash", "High Fever": "high_fever"}"#),
        ("disease_descriptions.json", r#"{"Malaria": "Mosquito-borne parasitic disease."}"#),
        ("disease_precautions.json", r#"{"Malaria": ["Consult nearest hospital", "avoid oily food"]}"#),
    ];
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents).unwrap();
    }
}

/// Configuration rooted at a temporary directory
pub fn config_in(root: &Path) -> Config {
    let mut config = Config::default();
    config.data.dir = root.join("data").to_string_lossy().into_owned();
    config.model.dir = root.join("model").to_string_lossy().into_owned();
    config.storage.database = root.join("health.db").to_string_lossy().into_owned();
    config
}
