//! Fire-and-forget prediction recorder
//!
//! Records are queued on an unbounded channel and written by a background
//! task, so the inference path never waits on storage.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::{InferenceError, Result};
use crate::persistence::PredictionSink;
use crate::types::PredictionRecord;

/// Queues records for a wrapped sink
pub struct PredictionRecorder {
    sender: mpsc::UnboundedSender<PredictionRecord>,
    worker: JoinHandle<usize>,
}

impl PredictionRecorder {
    /// Start the background writer. Must be called inside a tokio runtime.
    pub fn spawn(sink: Arc<dyn PredictionSink>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(receiver, sink));
        Self { sender, worker }
    }

    /// Stop accepting records, drain the queue and return how many were written
    pub async fn shutdown(self) -> usize {
        drop(self.sender);
        match self.worker.await {
            Ok(written) => written,
            Err(e) => {
                warn!(error = %e, "prediction recorder worker ended abnormally");
                0
            }
        }
    }
}

impl PredictionSink for PredictionRecorder {
    fn record_prediction(&self, record: &PredictionRecord) -> Result<()> {
        self.sender
            .send(record.clone())
            .map_err(|_| InferenceError::PersistenceFailure("prediction recorder is stopped".to_string()))
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<PredictionRecord>,
    sink: Arc<dyn PredictionSink>,
) -> usize {
    let mut written = 0;

    while let Some(record) = receiver.recv().await {
        let id = record.id;
        let sink = Arc::clone(&sink);

        match tokio::task::spawn_blocking(move || sink.record_prediction(&record)).await {
            Ok(Ok(())) => {
                written += 1;
                debug!(record = %id, "prediction persisted");
            }
            Ok(Err(e)) => warn!(record = %id, error = %e, "failed to persist prediction"),
            Err(e) => warn!(record = %id, error = %e, "prediction write task failed"),
        }
    }

    written
}
