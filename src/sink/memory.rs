//! In-memory index sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::document::IndexDocument;
use crate::error_handling::{CommitFailure, StorageFailure};

use super::IndexSink;

/// Collects submitted documents in memory.
///
/// Used by the test suite and by library consumers that want the pipeline's
/// output without a storage engine. Tracks whether `commit`/`close` ran so
/// tests can assert the no-partial-commit guarantee.
#[derive(Default)]
pub struct MemorySink {
    documents: Mutex<Vec<IndexDocument>>,
    committed: AtomicBool,
    closed: AtomicBool,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents submitted so far.
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    /// Whether no documents have been submitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the submitted documents, in arrival order.
    pub fn documents(&self) -> Vec<IndexDocument> {
        self.documents.lock().unwrap().clone()
    }

    /// Whether `commit` has run.
    pub fn committed(&self) -> bool {
        self.committed.load(Ordering::SeqCst)
    }

    /// Whether `close` has run.
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl IndexSink for MemorySink {
    async fn submit(&self, document: IndexDocument) -> Result<(), StorageFailure> {
        self.documents.lock().unwrap().push(document);
        Ok(())
    }

    async fn commit(&self) -> Result<(), CommitFailure> {
        self.committed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), CommitFailure> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
