//! Inference orchestration
//!
//! Runs the tier chain for a symptom selection and hands every
//! finalized result to the optional prediction sink.

pub mod orchestrator;

pub use orchestrator::InferenceEngine;
