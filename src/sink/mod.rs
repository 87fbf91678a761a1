//! Index sink abstraction.
//!
//! The storage/search engine behind the pipeline is a black box reached
//! through the narrow [`IndexSink`] interface: submit documents, commit once,
//! close. The sink must tolerate documents arriving in arbitrary
//! interleavings from concurrent workers; nothing written is durable until
//! [`commit`](IndexSink::commit) succeeds.
//!
//! [`QueuedSink`] wraps any sink with an internal bounded submission queue so
//! a saturated sink slows workers down instead of growing memory without
//! bound. [`MemorySink`] collects documents in memory for tests and
//! embedding.

mod memory;
mod queued;

pub use memory::MemorySink;
pub use queued::QueuedSink;

use std::future::Future;

use crate::document::IndexDocument;
use crate::error_handling::{CommitFailure, StorageFailure};

/// Destination for index documents.
///
/// Implementations must be safe under concurrent `submit` calls; the writer
/// pool deliberately does not serialize access, so the sink can apply its own
/// internal batching and admission control.
pub trait IndexSink: Send + Sync + 'static {
    /// Submits one document.
    ///
    /// # Errors
    ///
    /// A failure is treated as systemic by the pipeline: it aborts the whole
    /// run with no partial commit.
    fn submit(
        &self,
        document: IndexDocument,
    ) -> impl Future<Output = Result<(), StorageFailure>> + Send;

    /// Makes everything submitted so far durable. Called once, after all
    /// workers have finished.
    fn commit(&self) -> impl Future<Output = Result<(), CommitFailure>> + Send;

    /// Releases the sink's resources. Called after a successful commit.
    fn close(&self) -> impl Future<Output = Result<(), CommitFailure>> + Send;
}
