//! Input record stream.
//!
//! [`RecordSource`] is the narrow interface the producer consumes: a lazy,
//! finite, forward-only sequence of raw rows. Where the rows come from,
//! whether a CSV dump on disk, an archive, or a test vector, is a
//! collaborator detail the pipeline never sees.

mod csv;

pub use csv::CsvRecordSource;

use crate::error_handling::SourceError;
use crate::record::RawRecord;

/// A lazy, finite, forward-only stream of raw rows.
///
/// The producer consumes it fully once, calling [`next_row`] synchronously
/// from its async task. Implementations should keep per-row work cheap
/// (buffered reads at most): a short blocking read per row is fine, but a
/// source that can stall for long stretches, such as one reading from the
/// network, should be wrapped so the blocking happens on a dedicated thread
/// (for example via [`tokio::task::spawn_blocking`] feeding a channel) rather
/// than on a runtime worker.
///
/// [`next_row`]: RecordSource::next_row
pub trait RecordSource: Send + 'static {
    /// Returns the next raw row, `None` on exhaustion.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the pipeline; there is no retry.
    fn next_row(&mut self) -> Result<Option<RawRecord>, SourceError>;
}

/// In-memory record source, for tests and embedding.
pub struct MemorySource {
    rows: std::vec::IntoIter<RawRecord>,
}

impl MemorySource {
    /// Creates a source yielding `rows` in order.
    pub fn new(rows: Vec<RawRecord>) -> Self {
        MemorySource {
            rows: rows.into_iter(),
        }
    }
}

impl RecordSource for MemorySource {
    fn next_row(&mut self) -> Result<Option<RawRecord>, SourceError> {
        Ok(self.rows.next())
    }
}
