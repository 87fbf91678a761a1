//! Index writer pool.
//!
//! A fixed-size pool of worker tasks, each pulling validated records from the
//! ingestion queue, building the index document (IP octets plus one tile
//! identifier per configured level), and submitting it to the shared sink.
//!
//! Worker exit protocol: a worker leaves its loop only when a pop finds the
//! end-of-stream sentinel at the front of the queue, which, by FIFO order,
//! can only happen after every record ahead of it has been handed out. A pop
//! that merely times out re-checks and keeps waiting. A cancellation
//! delivered while blocked in a pop exits promptly and propagates as an
//! error rather than being swallowed.

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app::log_progress;
use crate::document::DocumentBuilder;
use crate::error_handling::{IngestStats, PipelineError};
use crate::queue::{IngestionQueue, Popped};
use crate::sink::IndexSink;

/// Shared context every worker runs with.
struct WorkerContext<S: IndexSink> {
    queue: Arc<IngestionQueue>,
    sink: Arc<S>,
    builder: Arc<DocumentBuilder>,
    stats: Arc<IngestStats>,
    cancel: CancellationToken,
    pop_timeout: Duration,
    progress_interval: usize,
    start_time: std::time::Instant,
}

/// Fixed-size pool of writer workers over one shared sink.
pub struct IndexWriterPool<S: IndexSink> {
    workers: usize,
    ctx: Arc<WorkerContext<S>>,
}

impl<S: IndexSink> IndexWriterPool<S> {
    /// Creates a pool of `workers` tasks (not yet started).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workers: usize,
        queue: Arc<IngestionQueue>,
        sink: Arc<S>,
        builder: DocumentBuilder,
        stats: Arc<IngestStats>,
        cancel: CancellationToken,
        pop_timeout: Duration,
        progress_interval: usize,
    ) -> Self {
        IndexWriterPool {
            workers,
            ctx: Arc::new(WorkerContext {
                queue,
                sink,
                builder: Arc::new(builder),
                stats,
                cancel,
                pop_timeout,
                progress_interval,
                start_time: std::time::Instant::now(),
            }),
        }
    }

    /// Spawns every worker; each handle resolves to the number of documents
    /// that worker wrote, or the error that stopped it.
    pub fn spawn(&self) -> Vec<JoinHandle<Result<usize, PipelineError>>> {
        info!("Starting {} index writer workers", self.workers);
        (0..self.workers)
            .map(|id| {
                let ctx = Arc::clone(&self.ctx);
                tokio::spawn(worker_loop(id, ctx))
            })
            .collect()
    }
}

async fn worker_loop<S: IndexSink>(
    id: usize,
    ctx: Arc<WorkerContext<S>>,
) -> Result<usize, PipelineError> {
    let mut written = 0usize;
    loop {
        let popped = tokio::select! {
            _ = ctx.cancel.cancelled() => {
                debug!("worker {id} cancelled while waiting on the queue");
                return Err(PipelineError::Cancelled { stage: "queue pop" });
            }
            popped = ctx.queue.pop(ctx.pop_timeout) => popped,
        };

        match popped {
            Popped::Record(record) => {
                let document = ctx.builder.build(record);
                ctx.sink
                    .submit(document)
                    .await
                    .map_err(PipelineError::Storage)?;
                written += 1;
                let total = ctx.stats.increment_indexed();
                if ctx.progress_interval > 0 && total % ctx.progress_interval == 0 {
                    log_progress(ctx.start_time, total);
                }
            }
            // Timeout is a liveness mechanism, not a correctness boundary:
            // just look again.
            Popped::TimedOut => continue,
            Popped::EndOfStream => {
                debug!("worker {id} observed end-of-stream after {written} documents");
                return Ok(written);
            }
        }
    }
}
