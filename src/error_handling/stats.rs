//! Ingestion statistics tracking.
//!
//! This module provides thread-safe counters for the pipeline: rows parsed,
//! rows rejected per reason, and documents indexed. All counters use atomics
//! so the producer and every worker can update them concurrently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::RejectionKind;

/// Thread-safe ingestion statistics tracker.
///
/// Shared across the producer and the worker pool via `Arc`. Rejection
/// counters are pre-populated for every [`RejectionKind`] so incrementing
/// never allocates.
pub struct IngestStats {
    parsed: AtomicUsize,
    indexed: AtomicUsize,
    rejections: HashMap<RejectionKind, AtomicUsize>,
}

impl IngestStats {
    /// Creates a tracker with all counters at zero.
    pub fn new() -> Self {
        let mut rejections = HashMap::new();
        for kind in RejectionKind::iter() {
            rejections.insert(kind, AtomicUsize::new(0));
        }
        IngestStats {
            parsed: AtomicUsize::new(0),
            indexed: AtomicUsize::new(0),
            rejections,
        }
    }

    /// Records one successfully parsed and validated row.
    pub fn increment_parsed(&self) -> usize {
        self.parsed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records one document submitted to the index sink.
    pub fn increment_indexed(&self) -> usize {
        self.indexed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records one rejected row.
    pub fn increment_rejected(&self, kind: RejectionKind) {
        if let Some(counter) = self.rejections.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Rejection counter for {:?} missing from IngestStats; this is a bug in its initialization.",
                kind
            );
        }
    }

    /// Number of rows parsed and validated so far.
    pub fn parsed(&self) -> usize {
        self.parsed.load(Ordering::SeqCst)
    }

    /// Number of documents submitted so far.
    pub fn indexed(&self) -> usize {
        self.indexed.load(Ordering::SeqCst)
    }

    /// Number of rows rejected for the given reason.
    pub fn rejected(&self, kind: RejectionKind) -> usize {
        self.rejections
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total rejected rows across all reasons.
    pub fn total_rejected(&self) -> usize {
        RejectionKind::iter().map(|k| self.rejected(k)).sum()
    }
}

impl Default for IngestStats {
    fn default() -> Self {
        Self::new()
    }
}
