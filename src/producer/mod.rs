//! Record producer.
//!
//! A single task that drains the external record stream into the ingestion
//! queue: Reading (pull row, validate, push or skip), Draining (push the
//! end-of-stream sentinel), Done. Validation rejections are counted and
//! skipped; stream errors are fatal and unwind the pipeline without a
//! sentinel; the coordinator cancels the workers instead.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error_handling::{IngestStats, PipelineError};
use crate::queue::IngestionQueue;
use crate::record::validate;
use crate::source::RecordSource;

/// What the producer accomplished, reported back to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProducerSummary {
    /// Rows validated and queued.
    pub parsed: usize,
    /// Rows rejected and skipped.
    pub rejected: usize,
}

/// Single-producer side of the pipeline.
pub struct RecordProducer<S: RecordSource> {
    source: S,
    queue: Arc<IngestionQueue>,
    stats: Arc<IngestStats>,
    cancel: CancellationToken,
    progress_interval: usize,
}

impl<S: RecordSource> RecordProducer<S> {
    /// Creates a producer reading `source` into `queue`.
    pub fn new(
        source: S,
        queue: Arc<IngestionQueue>,
        stats: Arc<IngestStats>,
        cancel: CancellationToken,
        progress_interval: usize,
    ) -> Self {
        RecordProducer {
            source,
            queue,
            stats,
            cancel,
            progress_interval,
        }
    }

    /// Spawns the producer task.
    pub fn spawn(self) -> JoinHandle<Result<ProducerSummary, PipelineError>> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) -> Result<ProducerSummary, PipelineError> {
        let mut parsed = 0usize;
        let mut rejected = 0usize;

        // Reading: pull rows until the stream is exhausted.
        loop {
            let raw = match self.source.next_row() {
                Ok(Some(raw)) => raw,
                Ok(None) => break,
                Err(e) => return Err(PipelineError::InputExhaustion(e)),
            };

            match validate(&raw) {
                Ok(record) => {
                    parsed = self.stats.increment_parsed();
                    if self.progress_interval > 0 && parsed % self.progress_interval == 0 {
                        info!("{} records parsed", parsed);
                    }
                    // Blocks while the queue is full; this stall is the
                    // pipeline's backpressure. A cancelled pipeline must
                    // still be able to unblock a stalled producer.
                    tokio::select! {
                        _ = self.cancel.cancelled() => {
                            return Err(PipelineError::Cancelled { stage: "queue push" });
                        }
                        _ = self.queue.push(record) => {}
                    }
                }
                Err(rejection) => {
                    rejected += 1;
                    self.stats.increment_rejected(rejection.kind());
                    debug!("skipping row: {}", rejection);
                }
            }
        }

        // Draining: no more records will arrive; let every worker know. The
        // sentinel push can park on a full queue just like a record push, so
        // it needs the same cancellation escape hatch.
        tokio::select! {
            _ = self.cancel.cancelled() => {
                return Err(PipelineError::Cancelled { stage: "end-of-stream push" });
            }
            _ = self.queue.push_end_of_stream() => {}
        }
        info!(
            "All records queued; end-of-stream pushed ({} parsed, {} rejected)",
            parsed, rejected
        );

        Ok(ProducerSummary { parsed, rejected })
    }
}
