//! Reported symptom sets and display-form conversion

use std::collections::HashSet;

use crate::errors::{InferenceError, Result};
use crate::types::prediction::TopSymptom;

/// Maximum number of symptoms echoed back in a response
pub const MAX_TOP_SYMPTOMS: usize = 5;

/// A set of reported symptom identifiers.
///
/// Membership is order-irrelevant, but the original input order is kept
/// so that the response can echo the first few symptoms back as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl SymptomSet {
    /// Build a symptom set from raw caller input.
    ///
    /// Identifiers are trimmed, blanks dropped and repeats collapsed onto
    /// their first occurrence. An input with nothing left is rejected
    /// with `NoSymptomsProvided`.
    pub fn new<I, S>(symptoms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut members = HashSet::new();

        for symptom in symptoms {
            let symptom = symptom.as_ref().trim();
            if symptom.is_empty() {
                continue;
            }
            if members.insert(symptom.to_string()) {
                ordered.push(symptom.to_string());
            }
        }

        if ordered.is_empty() {
            return Err(InferenceError::NoSymptomsProvided);
        }

        Ok(Self { ordered, members })
    }

    /// Check membership of a single identifier
    pub fn contains(&self, symptom: &str) -> bool {
        self.members.contains(symptom)
    }

    /// Check that every required identifier was reported
    pub fn contains_all(&self, required: &[&str]) -> bool {
        required.iter().all(|s| self.members.contains(*s))
    }

    /// Number of distinct symptoms
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Always false for a constructed set; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterate in original input order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Symptoms in original input order
    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }

    /// First five symptoms in input order, converted to display form
    pub fn top_symptoms(&self) -> Vec<TopSymptom> {
        self.ordered
            .iter()
            .take(MAX_TOP_SYMPTOMS)
            .map(|s| TopSymptom {
                symptom: display_name(s),
            })
            .collect()
    }
}

/// Convert a symptom identifier to its display form.
///
/// Underscores become spaces and every word is title-cased: a letter is
/// upper-cased when it follows a non-letter and lower-cased otherwise,
/// so `"high_fever"` becomes `"High Fever"`.
pub fn display_name(symptom: &str) -> String {
    let mut out = String::with_capacity(symptom.len());
    let mut prev_is_letter = false;

    for c in symptom.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_dedups() {
        let set = SymptomSet::new(["itching", " skin_rash ", "itching", ""]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), &["itching".to_string(), "skin_rash".to_string()]);
        assert!(set.contains("skin_rash"));
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            SymptomSet::new(empty),
            Err(InferenceError::NoSymptomsProvided)
        ));
        assert!(matches!(
            SymptomSet::new(["  ", ""]),
            Err(InferenceError::NoSymptomsProvided)
        ));
    }

    #[test]
    fn test_contains_all() {
        let set = SymptomSet::new(["high_fever", "headache", "chills"]).unwrap();
        assert!(set.contains_all(&["chills", "high_fever"]));
        assert!(!set.contains_all(&["chills", "vomiting"]));
        assert!(set.contains_all(&[]));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("high_fever"), "High Fever");
        assert_eq!(display_name("itching"), "Itching");
        assert_eq!(display_name("FAST_heart_RATE"), "Fast Heart Rate");
        assert_eq!(display_name("dischromic _patches"), "Dischromic  Patches");
    }

    #[test]
    fn test_top_symptoms_capped_and_ordered() {
        let set = SymptomSet::new([
            "vomiting", "high_fever", "chills", "headache", "nausea", "fatigue", "cough",
        ])
        .unwrap();
        let top = set.top_symptoms();
        assert_eq!(top.len(), MAX_TOP_SYMPTOMS);
        assert_eq!(top[0].symptom, "Vomiting");
        assert_eq!(top[1].symptom, "High Fever");
        assert_eq!(top[4].symptom, "Nausea");
    }
}
