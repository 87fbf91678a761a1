//! Pipeline coordinator.
//!
//! Wires one producer and a pool of index writers around the shared
//! ingestion queue, runs both sides to completion, and commits the sink
//! exactly once, only when every stage finished cleanly. Any failure
//! cancels the rest of the pipeline and aborts the run without a commit.


use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::{
    DEFAULT_MAX_TILE_LEVEL, DEFAULT_MIN_TILE_LEVEL, DEFAULT_POP_TIMEOUT_SECS,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS,
};
use crate::document::DocumentBuilder;
use crate::error_handling::{IngestStats, PipelineError};
use crate::producer::{ProducerSummary, RecordProducer};
use crate::queue::IngestionQueue;
use crate::sink::IndexSink;
use crate::source::RecordSource;
use crate::writer::IndexWriterPool;

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Bounded capacity of the ingestion queue.
    pub queue_capacity: usize,
    /// Number of index writer workers.
    pub workers: usize,
    /// How long a worker waits on an empty queue before re-checking.
    pub pop_timeout: Duration,
    /// Tile levels indexed for every record.
    pub tile_levels: RangeInclusive<u8>,
    /// Emit a progress line every this many records (0 disables).
    pub progress_interval: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
            pop_timeout: Duration::from_secs(DEFAULT_POP_TIMEOUT_SECS),
            tile_levels: DEFAULT_MIN_TILE_LEVEL..=DEFAULT_MAX_TILE_LEVEL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// What a completed run accomplished.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexReport {
    /// Rows that validated and entered the queue.
    pub records_parsed: usize,
    /// Rows rejected during validation.
    pub records_rejected: usize,
    /// Documents submitted to the sink and committed.
    pub documents_indexed: usize,
    /// Worker count the run used.
    pub workers: usize,
    /// Wall-clock duration of the run.
    pub elapsed_seconds: f64,
}

/// One ingestion run: a record source feeding an index sink.
pub struct Pipeline<Src: RecordSource, Snk: IndexSink> {
    source: Src,
    sink: Arc<Snk>,
    stats: Arc<IngestStats>,
    cancel: CancellationToken,
    options: PipelineOptions,
}

impl<Src: RecordSource, Snk: IndexSink> Pipeline<Src, Snk> {
    /// Creates a pipeline over `source` and `sink`.
    ///
    /// Cancelling `cancel` (for example from a signal handler) aborts the
    /// run: both sides unwind promptly and nothing is committed.
    pub fn new(
        source: Src,
        sink: Arc<Snk>,
        stats: Arc<IngestStats>,
        cancel: CancellationToken,
        options: PipelineOptions,
    ) -> Self {
        Pipeline {
            source,
            sink,
            stats,
            cancel,
            options,
        }
    }

    /// Runs the pipeline to completion.
    ///
    /// # Errors
    ///
    /// The first root-cause failure of any stage. When one side fails and
    /// the rest of the pipeline is cancelled in response, the triggering
    /// error wins over the resulting cancellations.
    pub async fn run(self) -> Result<IndexReport, PipelineError> {
        let Pipeline {
            source,
            sink,
            stats,
            cancel,
            options,
        } = self;

        let started = Instant::now();
        let queue = Arc::new(IngestionQueue::new(options.queue_capacity));

        info!(
            "Starting ingestion: {} workers, queue capacity {}, tile levels {}..={}",
            options.workers,
            queue.capacity(),
            options.tile_levels.start(),
            options.tile_levels.end(),
        );

        let producer_handle = RecordProducer::new(
            source,
            Arc::clone(&queue),
            Arc::clone(&stats),
            cancel.clone(),
            options.progress_interval,
        )
        .spawn();

        let worker_handles = IndexWriterPool::new(
            options.workers,
            queue,
            Arc::clone(&sink),
            DocumentBuilder::new(options.tile_levels.clone()),
            Arc::clone(&stats),
            cancel.clone(),
            options.pop_timeout,
            options.progress_interval,
        )
        .spawn();

        // Both sides must be awaited concurrently: waiting for the producer
        // alone would hang when every worker has already died and the
        // producer is parked on a full queue. Each side cancels the token on
        // failure so the other can unwind.
        let producer_side = async {
            let result = flatten_join(producer_handle.await);
            if let Err(e) = &result {
                error!("record producer failed: {e}");
                cancel.cancel();
            }
            result
        };
        let workers_side = async {
            let mut indexed = 0usize;
            let mut first_error: Option<PipelineError> = None;
            for (id, handle) in worker_handles.into_iter().enumerate() {
                match flatten_join(handle.await) {
                    Ok(written) => indexed += written,
                    Err(e) => {
                        error!("index writer {id} failed: {e}");
                        cancel.cancel();
                        keep_root_cause(&mut first_error, e);
                    }
                }
            }
            match first_error {
                None => Ok(indexed),
                Some(e) => Err(e),
            }
        };
        let (produced, written): (
            Result<ProducerSummary, PipelineError>,
            Result<usize, PipelineError>,
        ) = tokio::join!(producer_side, workers_side);

        match (produced, written) {
            (Ok(summary), Ok(indexed)) => {
                info!("All workers finished; committing {indexed} documents");
                if let Err(e) = sink.commit().await {
                    if let Err(close_err) = sink.close().await {
                        warn!("closing the sink after a failed commit: {close_err}");
                    }
                    return Err(e.into());
                }
                sink.close().await?;
                Ok(IndexReport {
                    records_parsed: summary.parsed,
                    records_rejected: summary.rejected,
                    documents_indexed: indexed,
                    workers: options.workers,
                    elapsed_seconds: started.elapsed().as_secs_f64(),
                })
            }
            (produced, written) => {
                // Cancellation is a symptom; surface the failure behind it.
                let root = match (produced.err(), written.err()) {
                    (Some(p), Some(w)) => {
                        if matches!(p, PipelineError::Cancelled { .. }) {
                            w
                        } else {
                            p
                        }
                    }
                    (Some(p), None) => p,
                    (None, Some(w)) => w,
                    (None, None) => PipelineError::Cancelled { stage: "pipeline" },
                };
                if let Err(e) = sink.close().await {
                    warn!("closing the sink after a failed run: {e}");
                }
                Err(root)
            }
        }
    }
}

fn flatten_join<T>(
    joined: Result<Result<T, PipelineError>, tokio::task::JoinError>,
) -> Result<T, PipelineError> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(PipelineError::TaskJoin(e.to_string())),
    }
}

/// Keeps the most informative of two worker errors: anything beats a
/// cancellation, and the first failure beats later ones.
fn keep_root_cause(slot: &mut Option<PipelineError>, candidate: PipelineError) {
    match slot {
        None => *slot = Some(candidate),
        Some(PipelineError::Cancelled { .. })
            if !matches!(candidate, PipelineError::Cancelled { .. }) =>
        {
            *slot = Some(candidate)
        }
        Some(_) => {}
    }
}
