//! Queued sink adapter.
//!
//! Wraps any [`IndexSink`] with an internal bounded submission queue drained
//! by a single background task. This is the sink-side admission control the
//! pipeline relies on: when the queue is full, `submit` waits for a slot, so
//! a saturated sink slows the workers (and, through the ingestion queue, the
//! producer) instead of buffering without bound.
//!
//! The adapter composes over the inner sink rather than subclassing a
//! writer type: the inner sink stays a black box behind submit/commit/close.
//!
//! Because the actual write happens after the outer `submit` has returned, a
//! failure is latched and surfaced on the next `submit` or at `commit`;
//! either way the pipeline aborts without committing.

use std::sync::{Arc, Mutex};

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::document::IndexDocument;
use crate::error_handling::{CommitFailure, StorageFailure};

use super::IndexSink;

/// Bounded asynchronous front to an [`IndexSink`].
pub struct QueuedSink<S: IndexSink> {
    inner: Arc<S>,
    tx: Mutex<Option<mpsc::Sender<IndexDocument>>>,
    drainer: tokio::sync::Mutex<Option<JoinHandle<usize>>>,
    failure: Arc<Mutex<Option<StorageFailure>>>,
}

impl<S: IndexSink> QueuedSink<S> {
    /// Wraps `inner`, buffering at most `depth` documents in flight.
    ///
    /// Must be called within a tokio runtime; the drainer task starts
    /// immediately.
    pub fn new(inner: S, depth: usize) -> Self {
        let inner = Arc::new(inner);
        let (tx, mut rx) = mpsc::channel::<IndexDocument>(depth.max(1));
        let failure = Arc::new(Mutex::new(None));

        let drain_sink = Arc::clone(&inner);
        let drain_failure = Arc::clone(&failure);
        let drainer = tokio::spawn(async move {
            let mut written = 0usize;
            while let Some(document) = rx.recv().await {
                match drain_sink.submit(document).await {
                    Ok(()) => written += 1,
                    Err(e) => {
                        // Latch the first failure and stop accepting work;
                        // dropping the receiver errors out pending senders.
                        drain_failure.lock().unwrap().get_or_insert(e);
                        break;
                    }
                }
            }
            debug!("sink drainer exiting after {} writes", written);
            written
        });

        QueuedSink {
            inner,
            tx: Mutex::new(Some(tx)),
            drainer: tokio::sync::Mutex::new(Some(drainer)),
            failure,
        }
    }

    /// The wrapped sink.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn latched_failure(&self) -> Option<StorageFailure> {
        self.failure.lock().unwrap().clone()
    }

    /// Closes the internal queue and waits for the drainer to finish.
    async fn flush(&self) -> Result<(), StorageFailure> {
        // Dropping the sender lets the drainer run the queue dry and exit.
        self.tx.lock().unwrap().take();
        if let Some(handle) = self.drainer.lock().await.take() {
            handle
                .await
                .map_err(|e| StorageFailure::new(format!("sink drainer panicked: {e}")))?;
        }
        match self.latched_failure() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

impl<S: IndexSink> IndexSink for QueuedSink<S> {
    async fn submit(&self, document: IndexDocument) -> Result<(), StorageFailure> {
        if let Some(failure) = self.latched_failure() {
            return Err(failure);
        }
        let sender = {
            let guard = self.tx.lock().unwrap();
            guard.clone()
        };
        let Some(sender) = sender else {
            return Err(StorageFailure::new("sink already flushed"));
        };
        // Waits while the internal queue is full.
        if sender.send(document).await.is_err() {
            // Receiver gone: the drainer stopped on a failure.
            return Err(self
                .latched_failure()
                .unwrap_or_else(|| StorageFailure::new("sink drainer stopped")));
        }
        Ok(())
    }

    async fn commit(&self) -> Result<(), CommitFailure> {
        self.flush()
            .await
            .map_err(|e| CommitFailure::new(e.message))?;
        self.inner.commit().await
    }

    async fn close(&self) -> Result<(), CommitFailure> {
        // Tolerates close-after-abort: flush errors are already surfaced
        // through submit/commit, so only shut the drainer down here.
        let _ = self.flush().await;
        self.inner.close().await
    }
}
