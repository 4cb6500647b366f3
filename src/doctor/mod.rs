//! Doctor command for system diagnostics
//!
//! Checks that reference data, model artifacts and the prediction
//! database are usable, and reports which tier would answer first.

use colored::Colorize;
use std::fs::File;
use std::path::Path;

use crate::cli::config::Config;
use crate::errors::Result;
use crate::model::ModelArtifacts;
use crate::persistence::SqlitePredictionStore;
use crate::reference::loader::{parse_dataset, parse_descriptions, parse_precautions, parse_severity};
use crate::types::PredictionTier;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub detail: String,
}

impl HealthCheck {
    fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Pass,
            detail: detail.into(),
        }
    }

    fn warn(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Warn(message.into()),
            detail: String::new(),
        }
    }

    fn fail(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Fail(message.into()),
            detail: String::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == HealthStatus::Pass
    }
}

/// Outcome of a diagnostics run
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub checks: Vec<HealthCheck>,
    pub first_tier: PredictionTier,
}

impl DoctorReport {
    /// No check failed outright
    pub fn healthy(&self) -> bool {
        !self.checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }

    /// Display diagnostics results
    pub fn display(&self) {
        println!("\n{}\n", "HealthBuddy System Diagnostics".bold());
        println!("{:<20} {}", "Check", "Status");
        println!("{}", "=".repeat(60));

        for check in &self.checks {
            let status = match &check.status {
                HealthStatus::Pass => format!("PASS {}", check.detail).green(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red(),
            };
            println!("{:<20} {}", check.name, status);
        }

        println!("\nFirst answering tier: {}\n", self.first_tier.to_string().cyan());
    }
}

/// Doctor diagnostics system
pub struct Doctor;

impl Doctor {
    /// Run all checks against a configuration; never fails
    pub fn run(config: &Config) -> DoctorReport {
        let files = config.data_files();
        let mut checks = Vec::new();

        let dataset = Self::check_data_file("dataset", &files.dataset, |f, s| {
            Ok(parse_dataset(f, s)?.iter().filter(|p| !p.symptoms.is_empty()).count())
        });
        let dataset_usable = dataset.passed();
        checks.push(dataset);

        checks.push(Self::check_data_file("descriptions", &files.descriptions, |f, s| {
            Ok(parse_descriptions(f, s)?.len())
        }));
        checks.push(Self::check_data_file("precautions", &files.precautions, |f, s| {
            Ok(parse_precautions(f, s)?.len())
        }));
        checks.push(Self::check_data_file("severity", &files.severity, |f, s| {
            Ok(parse_severity(f, s)?.len())
        }));

        let model = Self::check_model(config);
        let model_usable = model.passed();
        checks.push(model);

        checks.push(Self::check_database(config));

        let first_tier = if model_usable {
            PredictionTier::TrainedModel
        } else if dataset_usable {
            PredictionTier::DatasetSimilarity
        } else {
            PredictionTier::Heuristic
        };

        DoctorReport { checks, first_tier }
    }

    fn check_data_file(
        name: &str,
        path: &Path,
        count: impl FnOnce(File, &str) -> Result<usize>,
    ) -> HealthCheck {
        let source = path.display().to_string();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return HealthCheck::warn(name, format!("{} ({})", source, e)),
        };

        match count(file, &source) {
            Ok(0) => HealthCheck::warn(name, format!("{} has no usable rows", source)),
            Ok(rows) => HealthCheck::pass(name, format!("{} rows", rows)),
            Err(e) => HealthCheck::warn(name, e.to_string()),
        }
    }

    fn check_model(config: &Config) -> HealthCheck {
        if !config.model.enabled {
            return HealthCheck::warn("model", "disabled in configuration");
        }

        match ModelArtifacts::load(&config.model_dir()) {
            Ok(artifacts) => HealthCheck::pass(
                "model",
                format!(
                    "{} classes, {} features",
                    artifacts.decoder().len(),
                    artifacts.feature_names().len()
                ),
            ),
            Err(e) => HealthCheck::warn("model", e.to_string()),
        }
    }

    fn check_database(config: &Config) -> HealthCheck {
        if !config.storage.record_predictions {
            return HealthCheck::warn("database", "prediction recording disabled");
        }

        let path = config.database_path();
        match SqlitePredictionStore::open(&path).and_then(|store| store.count()) {
            Ok(rows) => HealthCheck::pass("database", format!("{} predictions", rows)),
            Err(e) => HealthCheck::fail("database", format!("{} ({})", path.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.data.dir = dir.join("data").to_string_lossy().into_owned();
        config.model.dir = dir.join("model").to_string_lossy().into_owned();
        config.storage.database = dir.join("health.db").to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_health_status_equality() {
        assert_eq!(HealthStatus::Pass, HealthStatus::Pass);
        assert_ne!(HealthStatus::Pass, HealthStatus::Warn("x".to_string()));
    }

    #[test]
    fn test_empty_environment_falls_back_to_heuristic() {
        let dir = tempfile::tempdir().unwrap();
        let report = Doctor::run(&config_in(dir.path()));

        assert_eq!(report.first_tier, PredictionTier::Heuristic);
        assert!(report.healthy());
        assert_eq!(report.checks.len(), 6);
        assert!(report.checks.iter().find(|c| c.name == "database").unwrap().passed());
    }

    #[test]
    fn test_dataset_enables_similarity_tier() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(
            config.data_files().dataset,
            "Disease,Symptom_1,Symptom_2\nFungal infection,itching,skin_rash\n",
        )
        .unwrap();

        let report = Doctor::run(&config);
        assert_eq!(report.first_tier, PredictionTier::DatasetSimilarity);

        let dataset = &report.checks[0];
        assert!(dataset.passed());
        assert_eq!(dataset.detail, "1 rows");
    }

    #[test]
    fn test_disabled_model_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.model.enabled = false;

        let report = Doctor::run(&config);
        let model = report.checks.iter().find(|c| c.name == "model").unwrap();
        assert!(matches!(model.status, HealthStatus::Warn(_)));
    }
}
