//! Error type definitions.
//!
//! This module defines all error types used throughout the pipeline, grouped
//! by the stage that produces them. Per-record validation rejections are the
//! only recoverable kind; everything else unwinds the whole pipeline, because
//! a half-written index is worse than no index.

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The database file could not be created.
    #[error("Failed to create database file: {0}")]
    FileCreationError(String),

    /// An underlying SQL error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migrations failed to apply.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Error types for the input record stream.
///
/// All of these are fatal: the pipeline is aborted before (or instead of)
/// committing anything.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input file could not be opened. Raised before any record is queued.
    #[error("failed to open input {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O error occurred while reading the stream mid-flight.
    #[error("failed reading input stream: {0}")]
    Io(#[from] std::io::Error),

    /// The stream produced a row the CSV decoder could not parse at all.
    #[error("failed decoding input row: {0}")]
    Decode(#[from] csv::Error),
}

/// A document could not be submitted to the index sink.
///
/// Treated as systemic (disk full, index corrupt, pool gone) rather than
/// per-document, so one failure aborts the whole pipeline.
#[derive(Error, Debug, Clone)]
#[error("storage failure: {message}")]
pub struct StorageFailure {
    /// Human-readable cause reported by the sink.
    pub message: String,
}

impl StorageFailure {
    /// Wraps a sink-specific error into the pipeline-level failure type.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        StorageFailure {
            message: cause.to_string(),
        }
    }
}

/// The final commit (or close) of the index sink failed.
///
/// The index is left in its pre-commit state; nothing written during the run
/// is considered durable.
#[derive(Error, Debug, Clone)]
#[error("commit failure: {message}")]
pub struct CommitFailure {
    /// Human-readable cause reported by the sink.
    pub message: String,
}

impl CommitFailure {
    /// Wraps a sink-specific error into the pipeline-level failure type.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        CommitFailure {
            message: cause.to_string(),
        }
    }
}

/// Top-level pipeline error: names the stage and the cause.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input stream was missing or became unreadable.
    #[error("input stream error: {0}")]
    InputExhaustion(#[from] SourceError),

    /// The index sink rejected a document.
    #[error("{0}")]
    Storage(#[from] StorageFailure),

    /// The final commit or close failed.
    #[error("{0}")]
    Commit(#[from] CommitFailure),

    /// An external shutdown request arrived during a blocking wait.
    #[error("pipeline cancelled during {stage}")]
    Cancelled {
        /// The stage that observed the cancellation.
        stage: &'static str,
    },

    /// A producer or worker task panicked or was aborted by the runtime.
    #[error("pipeline task failed to join: {0}")]
    TaskJoin(String),
}

/// A single malformed input row, skipped and counted, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationRejection {
    /// A required field is absent or does not satisfy its required shape.
    #[error("missing or invalid required field: {0}")]
    MissingRequiredField(&'static str),

    /// A numeric field parsed but falls outside its valid range.
    #[error("{field} out of range: {value}")]
    OutOfRangeNumeric {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value as it appeared in the row.
        value: String,
    },

    /// A numeric field could not be parsed as a number.
    #[error("{field} is not a number: {value:?}")]
    MalformedNumeric {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value as it appeared in the row.
        value: String,
    },
}

/// Coarse rejection categories used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum RejectionKind {
    /// Required field absent or malformed.
    MissingRequiredField,
    /// Numeric field outside its valid range.
    OutOfRangeNumeric,
    /// Numeric field unparseable.
    MalformedNumeric,
}

impl RejectionKind {
    /// Stable label used in statistics output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::MissingRequiredField => "missing_required_field",
            RejectionKind::OutOfRangeNumeric => "out_of_range_numeric",
            RejectionKind::MalformedNumeric => "malformed_numeric",
        }
    }
}

impl ValidationRejection {
    /// The counting category for this rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            ValidationRejection::MissingRequiredField(_) => RejectionKind::MissingRequiredField,
            ValidationRejection::OutOfRangeNumeric { .. } => RejectionKind::OutOfRangeNumeric,
            ValidationRejection::MalformedNumeric { .. } => RejectionKind::MalformedNumeric,
        }
    }
}
