//! In-memory reference data types

use std::collections::HashMap;

/// Maximum number of precautions kept per condition
pub const MAX_PRECAUTIONS: usize = 4;

/// Symptom identifier to severity weight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeverityTable {
    weights: HashMap<String, f64>,
}

impl SeverityTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a weight. Negative or non-finite weights are refused; a
    /// later weight for the same symptom replaces the earlier one.
    pub fn insert(&mut self, symptom: impl Into<String>, weight: f64) -> bool {
        if !weight.is_finite() || weight < 0.0 {
            return false;
        }
        self.weights.insert(symptom.into(), weight);
        true
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.weights.contains_key(symptom)
    }

    /// Weight of a symptom, 0 when absent
    pub fn weight(&self, symptom: &str) -> f64 {
        self.weights.get(symptom).copied().unwrap_or(0.0)
    }

    /// Summed weight of the given symptoms
    pub fn total<'a>(&self, symptoms: impl IntoIterator<Item = &'a str>) -> f64 {
        symptoms.into_iter().map(|s| self.weight(s)).sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SeverityTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = SeverityTable::new();
        for (symptom, weight) in iter {
            table.insert(symptom, weight);
        }
        table
    }
}

/// One condition row of the reference dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionProfile {
    /// Condition name
    pub name: String,

    /// Associated symptoms, duplicates removed, first-seen order
    pub symptoms: Vec<String>,

    /// Free-text description, if the description source has one
    pub description: Option<String>,

    /// Precautions, if the precaution source has a row for this condition
    pub precautions: Option<Vec<String>>,
}

impl ConditionProfile {
    /// Create a profile from a name and raw symptom cells
    pub fn new<I, S>(name: impl Into<String>, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for symptom in symptoms {
            let symptom = symptom.as_ref().trim();
            if !symptom.is_empty() && !unique.iter().any(|s| s == symptom) {
                unique.push(symptom.to_string());
            }
        }

        Self {
            name: name.into(),
            symptoms: unique,
            description: None,
            precautions: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach precautions; blanks are dropped and at most four kept
    pub fn with_precautions<I, S>(mut self, precautions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.precautions = Some(
            precautions
                .into_iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .take(MAX_PRECAUTIONS)
                .collect(),
        );
        self
    }

    /// Whether this profile lists the symptom
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }
}

/// Read-only reference dataset shared by every inference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceDataStore {
    profiles: Vec<ConditionProfile>,
    severity: SeverityTable,
}

impl ReferenceDataStore {
    /// Create a store from profiles in dataset row order
    pub fn new(profiles: Vec<ConditionProfile>, severity: SeverityTable) -> Self {
        Self { profiles, severity }
    }

    /// A store with no data; tier-2 refuses to answer from it
    pub fn empty() -> Self {
        Self::default()
    }

    /// Profiles in dataset row order; a condition may appear more than once
    pub fn profiles(&self) -> &[ConditionProfile] {
        &self.profiles
    }

    pub fn severity(&self) -> &SeverityTable {
        &self.severity
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Number of distinct condition names
    pub fn condition_count(&self) -> usize {
        let mut names: Vec<&str> = self.profiles.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    /// Description of the first profile carrying one for this condition
    pub fn description_for(&self, condition: &str) -> Option<&str> {
        self.profiles
            .iter()
            .filter(|p| p.name == condition)
            .find_map(|p| p.description.as_deref())
    }

    /// Precautions of the first profile carrying them for this condition
    pub fn precautions_for(&self, condition: &str) -> Option<&[String]> {
        self.profiles
            .iter()
            .filter(|p| p.name == condition)
            .find_map(|p| p.precautions.as_deref())
    }
}
