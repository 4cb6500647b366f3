//! Severity-based health advice
//!
//! Produces fixed guidance for a self-reported severity plus home-care
//! tips triggered by the symptoms themselves. Independent of the
//! prediction tiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{InferenceError, Result};
use crate::types::SymptomSet;

/// Most home-care tips returned for one request
pub const MAX_HOME_CARE: usize = 5;

/// Self-reported severity of the symptoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSeverity {
    Mild,
    Moderate,
    Severe,
}

impl AdviceSeverity {
    pub fn name(&self) -> &'static str {
        match self {
            AdviceSeverity::Mild => "mild",
            AdviceSeverity::Moderate => "moderate",
            AdviceSeverity::Severe => "severe",
        }
    }

    fn immediate_actions(&self) -> [&'static str; 3] {
        match self {
            AdviceSeverity::Mild => [
                "Rest and monitor your symptoms",
                "Stay hydrated by drinking plenty of water",
                "Get adequate sleep and rest",
            ],
            AdviceSeverity::Moderate => [
                "Contact your healthcare provider for guidance",
                "Monitor your symptoms closely",
                "Rest and avoid strenuous activities",
            ],
            AdviceSeverity::Severe => [
                "Seek immediate medical attention",
                "Call emergency services if symptoms worsen",
                "Do not delay getting professional help",
            ],
        }
    }

    fn medical_advice(&self) -> [&'static str; 3] {
        match self {
            AdviceSeverity::Mild => [
                "Monitor symptoms for 24-48 hours",
                "Use over-the-counter medications as needed",
                "Rest and maintain good hygiene",
            ],
            AdviceSeverity::Moderate => [
                "Schedule an appointment with your doctor",
                "Keep a symptom diary to share with healthcare provider",
                "Follow up if symptoms persist or worsen",
            ],
            AdviceSeverity::Severe => [
                "Go to the emergency room or call emergency services",
                "Do not attempt to drive yourself if severely ill",
                "Have someone stay with you until help arrives",
            ],
        }
    }
}

impl FromStr for AdviceSeverity {
    type Err = InferenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mild" => Ok(AdviceSeverity::Mild),
            "moderate" => Ok(AdviceSeverity::Moderate),
            "severe" => Ok(AdviceSeverity::Severe),
            other => Err(InferenceError::InvalidInput(format!(
                "Invalid severity level: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AdviceSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Home-care block and the substrings that trigger it
struct CareBlock {
    triggers: &'static [&'static str],
    tips: [&'static str; 3],
}

const CARE_BLOCKS: &[CareBlock] = &[
    CareBlock {
        triggers: &["fever"],
        tips: [
            "Use over-the-counter fever reducers as directed",
            "Apply cool compresses",
            "Dress in light clothing",
        ],
    },
    CareBlock {
        triggers: &["cough", "sore_throat"],
        tips: [
            "Use warm salt water gargles",
            "Stay in a humid environment",
            "Use throat lozenges for temporary relief",
        ],
    },
    CareBlock {
        triggers: &["headache"],
        tips: [
            "Rest in a quiet, dark room",
            "Apply cold or warm compress to head",
            "Practice relaxation techniques",
        ],
    },
    CareBlock {
        triggers: &["nausea", "vomiting"],
        tips: [
            "Eat bland foods (BRAT diet)",
            "Take small sips of clear fluids",
            "Avoid solid foods temporarily",
        ],
    },
];

/// Reference link shown with every piece of advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl Resource {
    fn new(title: &str, description: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
        }
    }
}

/// Advice returned for a symptom list and severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAdvice {
    pub severity: AdviceSeverity,
    pub immediate_actions: Vec<String>,
    pub home_care: Vec<String>,
    pub medical_advice: Vec<String>,
    pub resources: Vec<Resource>,
}

fn resources() -> Vec<Resource> {
    vec![
        Resource::new(
            "Understanding Your Symptoms",
            "Comprehensive guide to common health symptoms and their meanings",
            "https://www.who.int/health-topics",
        ),
        Resource::new(
            "When to Seek Emergency Care",
            "Guidelines for recognizing serious medical conditions",
            "https://www.cdc.gov/emergency",
        ),
        Resource::new(
            "Home Care Guidelines",
            "Expert advice on managing symptoms at home",
            "https://www.mayoclinic.org/first-aid",
        ),
    ]
}

fn home_care(symptoms: &SymptomSet) -> Vec<String> {
    let mut tips: Vec<String> = Vec::new();

    for symptom in symptoms.iter() {
        for block in CARE_BLOCKS {
            if block.triggers.iter().any(|t| symptom.contains(t)) {
                for tip in block.tips {
                    if !tips.iter().any(|existing| existing == tip) {
                        tips.push(tip.to_string());
                    }
                }
            }
        }
    }

    tips.truncate(MAX_HOME_CARE);
    tips
}

/// Build advice for the given symptoms and severity
pub fn generate_advice<I, S>(symptoms: I, severity: AdviceSeverity) -> Result<HealthAdvice>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let symptoms = SymptomSet::new(symptoms)?;
    let to_owned = |lines: [&str; 3]| lines.iter().map(|l| l.to_string()).collect::<Vec<_>>();

    Ok(HealthAdvice {
        severity,
        immediate_actions: to_owned(severity.immediate_actions()),
        home_care: home_care(&symptoms),
        medical_advice: to_owned(severity.medical_advice()),
        resources: resources(),
    })
}
