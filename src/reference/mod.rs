//! Reference data store
//!
//! Per-condition symptom profiles, descriptions, precautions and the
//! symptom severity table, loaded once and read-only afterwards.

pub mod loader;
pub mod store;

pub use loader::{load_reference_data, ReferenceDataFiles};
pub use store::{ConditionProfile, ReferenceDataStore, SeverityTable, MAX_PRECAUTIONS};
