//! Prediction history persistence
//!
//! The engine hands every finalized prediction to a `PredictionSink`
//! after the result is built. Sinks are best-effort: an error is logged
//! by the caller and never changes the prediction.

pub mod recorder;
pub mod sqlite;

pub use recorder::PredictionRecorder;
pub use sqlite::SqlitePredictionStore;

use crate::errors::Result;
use crate::types::PredictionRecord;

/// Destination for prediction history records
pub trait PredictionSink: Send + Sync {
    fn record_prediction(&self, record: &PredictionRecord) -> Result<()>;
}
