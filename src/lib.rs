//! ip_spatial_index library: geolocation record ingestion and spatial indexing
//!
//! This library ingests IP-geolocation CSV records through a bounded
//! producer/consumer pipeline, assigns every record a hierarchy of spatial
//! tile identifiers, and persists the resulting index documents to SQLite.
//!
//! # Example
//!
//! ```no_run
//! use ip_spatial_index::{run_index, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: std::path::PathBuf::from("geoip.csv.gz"),
//!     workers: 8,
//!     ..Default::default()
//! };
//!
//! let report = run_index(config).await?;
//! println!(
//!     "Indexed {} documents ({} rejected)",
//!     report.documents_indexed, report.records_rejected
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod app;
pub mod config;
mod document;
mod error_handling;
pub mod initialization;
mod pipeline;
mod producer;
mod queue;
mod record;
mod sink;
mod source;
mod storage;
mod tile;
mod writer;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use document::{DocumentBuilder, IndexDocument, IpOctets};
pub use error_handling::{
    CommitFailure, DatabaseError, IngestStats, InitializationError, PipelineError, RejectionKind,
    SourceError, StorageFailure, ValidationRejection,
};
pub use pipeline::{IndexReport, Pipeline, PipelineOptions};
pub use queue::{IngestionQueue, Popped};
pub use record::{validate, GeoIpRecord, RawRecord};
pub use run::run_index;
pub use sink::{IndexSink, MemorySink, QueuedSink};
pub use source::{CsvRecordSource, MemorySource, RecordSource};
pub use storage::{init_db_pool, run_migrations, SqliteSink};
pub use tile::{tile_id, TierPlotter, TileEncoder, TIER_FIELD_PREFIX};

// Internal run module (contains the end-to-end ingestion logic)
mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::info;
    use tokio_util::sync::CancellationToken;

    use crate::app::{cancel_on_ctrl_c, print_rejection_statistics, print_run_summary};
    use crate::config::Config;
    use crate::error_handling::IngestStats;
    use crate::pipeline::{IndexReport, Pipeline, PipelineOptions};
    use crate::sink::QueuedSink;
    use crate::source::CsvRecordSource;
    use crate::storage::{init_db_pool, run_migrations, SqliteSink};

    /// Runs one ingestion with the provided configuration.
    ///
    /// This is the main entry point for the library. It reads geolocation
    /// records from the input CSV (plain or gzip), validates and indexes
    /// them concurrently, and commits the resulting documents to a SQLite
    /// database.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration is inconsistent
    /// - The input file cannot be opened
    /// - Database initialization fails
    /// - Any pipeline stage fails; nothing is committed in that case
    pub async fn run_index(config: Config) -> Result<IndexReport> {
        config.validate().map_err(anyhow::Error::msg)?;

        let source =
            CsvRecordSource::open(&config.input).context("Failed to open input file")?;

        let pool = init_db_pool(&config.db_path)
            .await
            .context("Failed to initialize database pool")?;
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        let sink = Arc::new(QueuedSink::new(
            SqliteSink::new(pool),
            config.sink_queue_depth,
        ));

        let stats = Arc::new(IngestStats::new());
        let cancel = CancellationToken::new();
        cancel_on_ctrl_c(cancel.clone());

        let options = PipelineOptions {
            queue_capacity: config.queue_capacity,
            workers: config.workers,
            pop_timeout: std::time::Duration::from_secs(config.pop_timeout_secs),
            tile_levels: config.tile_levels(),
            progress_interval: config.progress_interval,
        };

        info!(
            "Indexing {} into {}",
            config.input.display(),
            config.db_path.display()
        );
        let report = Pipeline::new(source, sink, Arc::clone(&stats), cancel, options)
            .run()
            .await?;

        print_rejection_statistics(&stats);
        print_run_summary(&report);
        Ok(report)
    }
}
