//! Trained-model adapter
//!
//! Wraps an optional pre-built classifier together with its label
//! decoder, feature layout, display-to-canonical symptom map and the
//! text lookups used to describe its predictions.

pub mod artifacts;
pub mod classifier;

pub use artifacts::{LabelDecoder, ModelArtifacts};
pub use classifier::{Classifier, LinearClassifier, LinearModelSpec};
