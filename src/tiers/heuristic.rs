//! Tier 3: fixed rule table, the terminal tier
//!
//! Rules are evaluated strictly in table order and the first match wins.
//! Conditions overlap (a report with `chills` can satisfy several rules),
//! so the order is part of the behavior.

use crate::errors::Result;
use crate::tiers::Predictor;
use crate::types::{Diagnosis, PredictionTier, SymptomSet};

/// What a rule needs to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTrigger {
    /// Every listed symptom was reported
    AllOf(&'static [&'static str]),

    /// More than this many distinct symptoms were reported
    MoreThan(usize),
}

impl RuleTrigger {
    pub fn matches(&self, symptoms: &SymptomSet) -> bool {
        match self {
            RuleTrigger::AllOf(required) => symptoms.contains_all(required),
            RuleTrigger::MoreThan(count) => symptoms.len() > *count,
        }
    }
}

/// One row of the rule table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicRule {
    pub trigger: RuleTrigger,
    pub condition: &'static str,
    pub confidence: f64,
    pub description: &'static str,
    pub precautions: &'static [&'static str],
}

impl HeuristicRule {
    fn diagnosis(&self) -> Diagnosis {
        Diagnosis::new(
            PredictionTier::Heuristic,
            self.condition,
            self.confidence,
            self.description,
            self.precautions.iter().map(|p| p.to_string()).collect(),
        )
    }
}

/// Ordered rule table
pub const RULES: &[HeuristicRule] = &[
    HeuristicRule {
        trigger: RuleTrigger::AllOf(&["skin_rash", "itching"]),
        condition: "Fungal infection",
        confidence: 0.75,
        description: "A fungal infection is caused by fungi that take over an area of the body.",
        precautions: &[
            "Keep the affected area clean and dry",
            "Use antifungal medications",
            "Maintain good hygiene",
        ],
    },
    HeuristicRule {
        trigger: RuleTrigger::AllOf(&["high_fever", "headache", "chills"]),
        condition: "Malaria",
        confidence: 0.80,
        description: "Malaria is a serious disease caused by a parasite that is transmitted by the bite of infected mosquitoes.",
        precautions: &[
            "Consult a doctor immediately",
            "Take prescribed medications",
            "Use mosquito repellent",
        ],
    },
    HeuristicRule {
        trigger: RuleTrigger::AllOf(&["continuous_sneezing", "chills"]),
        condition: "Allergy",
        confidence: 0.70,
        description: "An allergy is an immune system response to a foreign substance that's not typically harmful to your body.",
        precautions: &[
            "Avoid allergens",
            "Take antihistamines",
            "Use nasal sprays if prescribed",
        ],
    },
    HeuristicRule {
        trigger: RuleTrigger::AllOf(&["vomiting", "stomach_pain"]),
        condition: "GERD",
        confidence: 0.65,
        description: "Gastroesophageal reflux disease (GERD) occurs when stomach acid frequently flows back into the tube connecting your mouth and stomach.",
        precautions: &[
            "Avoid spicy and fatty foods",
            "Don't lie down after eating",
            "Elevate your head while sleeping",
        ],
    },
    HeuristicRule {
        trigger: RuleTrigger::AllOf(&["fatigue", "weight_loss", "restlessness"]),
        condition: "Diabetes",
        confidence: 0.75,
        description: "Diabetes is a disease that occurs when your blood glucose is too high.",
        precautions: &[
            "Monitor blood sugar regularly",
            "Follow a balanced diet",
            "Exercise regularly",
        ],
    },
    HeuristicRule {
        trigger: RuleTrigger::MoreThan(5),
        condition: "Influenza",
        confidence: 0.65,
        description: "Influenza is a viral infection that attacks your respiratory system.",
        precautions: &[
            "Rest and drink plenty of fluids",
            "Take over-the-counter pain relievers",
            "Stay home to avoid spreading infection",
        ],
    },
    HeuristicRule {
        trigger: RuleTrigger::AllOf(&["fatigue", "mild_fever"]),
        condition: "Common Cold",
        confidence: 0.70,
        description: "The common cold is a viral infection of your nose and throat.",
        precautions: &[
            "Rest and stay hydrated",
            "Use saline nasal drops",
            "Take over-the-counter cold medications",
        ],
    },
];

/// Answer when no rule fires
pub static CATCH_ALL: HeuristicRule = HeuristicRule {
    trigger: RuleTrigger::MoreThan(0),
    condition: "General Viral Infection",
    confidence: 0.50,
    description: "A viral infection is any illness caused by a virus.",
    precautions: &["Rest well", "Stay hydrated", "Take fever reducers if needed"],
};

/// Terminal tier; always produces a diagnosis
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTier;

impl HeuristicTier {
    pub fn new() -> Self {
        Self
    }

    /// First matching rule, or the catch-all
    pub fn rule_for(&self, symptoms: &SymptomSet) -> &'static HeuristicRule {
        RULES
            .iter()
            .find(|rule| rule.trigger.matches(symptoms))
            .unwrap_or(&CATCH_ALL)
    }

    /// Infallible prediction
    pub fn predict(&self, symptoms: &SymptomSet) -> Diagnosis {
        self.rule_for(symptoms).diagnosis()
    }
}

impl Predictor for HeuristicTier {
    fn tier(&self) -> PredictionTier {
        PredictionTier::Heuristic
    }

    fn try_predict(&self, symptoms: &SymptomSet) -> Result<Diagnosis> {
        Ok(self.predict(symptoms))
    }
}
