//! Tabular reference data loading
//!
//! Four CSV sources feed the store: condition to symptom list, condition
//! to description, condition to precautions and symptom to severity
//! weight. Malformed rows are skipped with a warning and an unreadable
//! source degrades to empty; loading never fails the process.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::errors::{InferenceError, Result};
use crate::reference::store::{ConditionProfile, ReferenceDataStore, SeverityTable};

pub const DATASET_FILE: &str = "Disease_Symptom_Dataset.csv";
pub const DESCRIPTION_FILE: &str = "symptom_Description.csv";
pub const PRECAUTION_FILE: &str = "symptom_precaution.csv";
pub const SEVERITY_FILE: &str = "Symptom-severity.csv";

/// Locations of the four reference sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDataFiles {
    pub dataset: PathBuf,
    pub descriptions: PathBuf,
    pub precautions: PathBuf,
    pub severity: PathBuf,
}

impl ReferenceDataFiles {
    /// Standard file names inside one directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            dataset: dir.join(DATASET_FILE),
            descriptions: dir.join(DESCRIPTION_FILE),
            precautions: dir.join(PRECAUTION_FILE),
            severity: dir.join(SEVERITY_FILE),
        }
    }
}

/// Load the reference store, degrading every failing source to empty
pub fn load_reference_data(files: &ReferenceDataFiles) -> ReferenceDataStore {
    let rows = read_source(&files.dataset, parse_dataset).unwrap_or_default();
    if rows.is_empty() {
        warn!(path = %files.dataset.display(), "reference dataset empty; similarity tier disabled");
        return ReferenceDataStore::empty();
    }

    let descriptions = read_source(&files.descriptions, parse_descriptions).unwrap_or_default();
    let precautions = read_source(&files.precautions, parse_precautions).unwrap_or_default();
    let severity = read_source(&files.severity, parse_severity).unwrap_or_default();

    let store = assemble(rows, &descriptions, &precautions, severity);
    info!(
        profiles = store.profiles().len(),
        conditions = store.condition_count(),
        severity_weights = store.severity().len(),
        "reference data loaded"
    );
    store
}

/// Join dataset rows with their description and precautions
pub fn assemble(
    rows: Vec<ConditionProfile>,
    descriptions: &HashMap<String, String>,
    precautions: &HashMap<String, Vec<String>>,
    severity: SeverityTable,
) -> ReferenceDataStore {
    let profiles = rows
        .into_iter()
        .map(|mut profile| {
            profile.description = descriptions.get(&profile.name).cloned();
            if let Some(list) = precautions.get(&profile.name) {
                profile = profile.with_precautions(list);
            }
            profile
        })
        .collect();

    ReferenceDataStore::new(profiles, severity)
}

fn read_source<T>(path: &Path, parse: fn(File, &str) -> Result<T>) -> Option<T> {
    let source = path.display().to_string();
    let parsed = File::open(path)
        .map_err(InferenceError::from)
        .and_then(|file| parse(file, &source));

    match parsed {
        Ok(value) => {
            debug!(source = %source, "reference source parsed");
            Some(value)
        }
        Err(e) => {
            warn!(source = %source, error = %e, "reference source unavailable; treating as empty");
            None
        }
    }
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

fn required_column(headers: &StringRecord, name: &str, source: &str) -> Result<usize> {
    column(headers, name).ok_or_else(|| {
        InferenceError::ReferenceDataUnavailable(format!("{} has no '{}' column", source, name))
    })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn cell<'r>(record: &'r StringRecord, idx: usize) -> Option<&'r str> {
    record.get(idx).map(str::trim).filter(|v| !v.is_empty())
}

/// Parse condition rows: a `Disease` column plus any number of symptom cells
pub fn parse_dataset<R: Read>(input: R, source: &str) -> Result<Vec<ConditionProfile>> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let disease_idx = column(&headers, "Disease").unwrap_or(0);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(source = %source, error = %e, "skipping malformed dataset row");
                continue;
            }
        };

        let Some(name) = cell(&record, disease_idx) else {
            warn!(source = %source, line = line_of(&record), "skipping dataset row without a condition");
            continue;
        };

        let symptoms = record
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != disease_idx)
            .map(|(_, value)| value);

        rows.push(ConditionProfile::new(name, symptoms));
    }

    Ok(rows)
}

/// Parse `Disease,Description` rows; the first description per condition wins
pub fn parse_descriptions<R: Read>(input: R, source: &str) -> Result<HashMap<String, String>> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let disease_idx = required_column(&headers, "Disease", source)?;
    let description_idx = required_column(&headers, "Description", source)?;

    let mut descriptions = HashMap::new();
    for record in rdr.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(source = %source, error = %e, "skipping malformed description row");
                continue;
            }
        };

        match (cell(&record, disease_idx), cell(&record, description_idx)) {
            (Some(name), Some(text)) => {
                descriptions
                    .entry(name.to_string())
                    .or_insert_with(|| text.to_string());
            }
            _ => warn!(source = %source, line = line_of(&record), "skipping incomplete description row"),
        }
    }

    Ok(descriptions)
}

/// Parse `Disease,Precaution_1..Precaution_4` rows.
///
/// A row that exists but has only blank precaution cells still records
/// the condition with an empty list.
pub fn parse_precautions<R: Read>(input: R, source: &str) -> Result<HashMap<String, Vec<String>>> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let disease_idx = required_column(&headers, "Disease", source)?;

    let mut precaution_cols: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.to_ascii_lowercase().starts_with("precaution"))
        .map(|(idx, _)| idx)
        .collect();
    if precaution_cols.is_empty() {
        precaution_cols = (0..headers.len()).filter(|idx| *idx != disease_idx).collect();
    }

    let mut precautions = HashMap::new();
    for record in rdr.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(source = %source, error = %e, "skipping malformed precaution row");
                continue;
            }
        };

        let Some(name) = cell(&record, disease_idx) else {
            warn!(source = %source, line = line_of(&record), "skipping precaution row without a condition");
            continue;
        };

        let list: Vec<String> = precaution_cols
            .iter()
            .filter_map(|idx| cell(&record, *idx))
            .map(str::to_string)
            .collect();

        precautions.entry(name.to_string()).or_insert(list);
    }

    Ok(precautions)
}

/// Parse `Symptom,weight` rows
pub fn parse_severity<R: Read>(input: R, source: &str) -> Result<SeverityTable> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let symptom_idx = required_column(&headers, "Symptom", source)?;
    let weight_idx = required_column(&headers, "weight", source)?;

    let mut table = SeverityTable::new();
    for record in rdr.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(source = %source, error = %e, "skipping malformed severity row");
                continue;
            }
        };

        let symptom = cell(&record, symptom_idx);
        let weight = cell(&record, weight_idx).and_then(|w| w.parse::<f64>().ok());

        match (symptom, weight) {
            (Some(symptom), Some(weight)) => {
                let duplicate = table.contains(symptom);
                if !table.insert(symptom, weight) {
                    warn!(source = %source, line = line_of(&record), symptom, "ignoring invalid severity weight");
                } else if duplicate {
                    warn!(source = %source, line = line_of(&record), symptom, weight, "duplicate severity weight replaces earlier row");
                }
            }
            _ => warn!(source = %source, line = line_of(&record), "skipping unparseable severity row"),
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = "\
Disease,Symptom_1,Symptom_2,Symptom_3
Fungal infection,itching, skin_rash, nodal_skin_eruptions
Fungal infection, skin_rash,itching,
,itching,,
Allergy, continuous_sneezing, shivering, chills
";

    #[test]
    fn test_parse_dataset() {
        let rows = parse_dataset(DATASET.as_bytes(), "dataset").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Fungal infection");
        assert_eq!(rows[0].symptoms, vec!["itching", "skin_rash", "nodal_skin_eruptions"]);
        assert_eq!(rows[1].symptoms, vec!["skin_rash", "itching"]);
        assert_eq!(rows[2].name, "Allergy");
    }

    #[test]
    fn test_parse_descriptions_first_wins() {
        let csv = "Disease,Description\nGERD,\"Acid reflux, frequently.\"\nGERD,second\nDrug Reaction,\n";
        let map = parse_descriptions(csv.as_bytes(), "desc").unwrap();
        assert_eq!(map.get("GERD").map(String::as_str), Some("Acid reflux, frequently."));
        assert!(!map.contains_key("Drug Reaction"));
    }

    #[test]
    fn test_parse_descriptions_missing_column() {
        let csv = "Name,Text\nGERD,reflux\n";
        let err = parse_descriptions(csv.as_bytes(), "desc").unwrap_err();
        assert!(matches!(err, InferenceError::ReferenceDataUnavailable(_)));
    }

    #[test]
    fn test_parse_precautions_keeps_blank_rows() {
        let csv = "Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4\n\
                   Acne,bath twice,,avoid fatty spicy food,\n\
                   Hepatitis E,,,,\n";
        let map = parse_precautions(csv.as_bytes(), "prec").unwrap();
        assert_eq!(map["Acne"], vec!["bath twice", "avoid fatty spicy food"]);
        assert!(map["Hepatitis E"].is_empty());
    }

    #[test]
    fn test_parse_severity_skips_bad_rows() {
        let csv = "Symptom,weight\nitching,1\nskin_rash,3\nbroken,abc\nnegative,-2\n";
        let table = parse_severity(csv.as_bytes(), "sev").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.weight("skin_rash"), 3.0);
        assert_eq!(table.weight("broken"), 0.0);
    }

    #[test]
    fn test_parse_severity_later_duplicate_wins() {
        let csv = "Symptom,weight\nfluid_overload,6\ncough,4\nfluid_overload,4\nfluid_overload,-1\n";
        let table = parse_severity(csv.as_bytes(), "sev").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.weight("fluid_overload"), 4.0);
    }

    #[test]
    fn test_assemble_joins_text() {
        let rows = parse_dataset(DATASET.as_bytes(), "dataset").unwrap();
        let mut descriptions = HashMap::new();
        descriptions.insert("Allergy".to_string(), "Immune response".to_string());
        let mut precautions = HashMap::new();
        precautions.insert("Allergy".to_string(), vec!["avoid allergens".to_string()]);

        let store = assemble(rows, &descriptions, &precautions, SeverityTable::new());
        assert_eq!(store.description_for("Allergy"), Some("Immune response"));
        assert_eq!(store.precautions_for("Allergy").unwrap().len(), 1);
        assert!(store.description_for("Fungal infection").is_none());
    }

    #[test]
    fn test_missing_files_degrade_to_empty() {
        let files = ReferenceDataFiles::in_dir("/definitely/not/here");
        let store = load_reference_data(&files);
        assert!(store.is_empty());
    }
}
