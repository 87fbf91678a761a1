//! Configuration constants.
//!
//! This module defines the default operational parameters for the ingestion
//! pipeline. All of them can be overridden from the CLI or by constructing a
//! [`Config`](super::Config) programmatically.

/// Default bounded queue capacity between the record producer and the writer
/// workers. The producer blocks (backpressure) once this many records are
/// in flight.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Default number of writer workers draining the ingestion queue.
///
/// Indexing is sink-bound, not CPU-bound; a small pool keeps the shared sink
/// busy without piling up contention on it.
pub const DEFAULT_WORKERS: usize = 4;

/// Default per-pop timeout in seconds.
///
/// This is a liveness mechanism only: it bounds how long a worker waits on an
/// empty queue before re-checking for shutdown. Too short wastes CPU in
/// spin-polling, too long delays shutdown detection.
pub const DEFAULT_POP_TIMEOUT_SECS: u64 = 2;

/// Coarsest tile resolution level computed for every document.
pub const DEFAULT_MIN_TILE_LEVEL: u8 = 5;

/// Finest tile resolution level computed for every document.
pub const DEFAULT_MAX_TILE_LEVEL: u8 = 15;

/// Finest tile resolution level the grid math supports. At level 30 a cell is
/// already well under a millimetre of latitude; beyond that the cell count per
/// axis no longer fits the id arithmetic.
pub const MAX_SUPPORTED_TILE_LEVEL: u8 = 30;

/// Log a progress line every this many records parsed / documents indexed.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50_000;

/// Default depth of the internal submission queue inside
/// [`QueuedSink`](crate::sink::QueuedSink). A saturated sink makes workers
/// wait here instead of growing memory without bound.
pub const DEFAULT_SINK_QUEUE_DEPTH: usize = 512;

/// Default SQLite database path for the concrete storage sink.
pub const DEFAULT_DB_PATH: &str = "./ip_spatial_index.db";

/// Upper bound on `ip_start` accepted by the validator.
///
/// The source dataset never exceeds this value (240.0.0.0, the start of the
/// reserved class E space); anything above it is a malformed row.
pub const MAX_IP_START: u32 = 4_278_190_080;
