//! Error handling and ingestion statistics.
//!
//! This module provides:
//! - Error type definitions per pipeline stage
//! - The pipeline-wide error taxonomy ([`PipelineError`])
//! - Thread-safe ingestion statistics ([`IngestStats`])
//!
//! Propagation policy: per-record [`ValidationRejection`]s never escape the
//! producer; every other error kind unwinds the entire pipeline and prevents
//! the final commit.

mod stats;
mod types;

pub use stats::IngestStats;
pub use types::{
    CommitFailure, DatabaseError, InitializationError, PipelineError, RejectionKind, SourceError,
    StorageFailure, ValidationRejection,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_stats_initialization() {
        let stats = IngestStats::new();
        assert_eq!(stats.parsed(), 0);
        assert_eq!(stats.indexed(), 0);
        for kind in RejectionKind::iter() {
            assert_eq!(stats.rejected(kind), 0);
        }
    }

    #[test]
    fn test_stats_increment() {
        let stats = IngestStats::new();
        assert_eq!(stats.increment_parsed(), 1);
        assert_eq!(stats.increment_parsed(), 2);
        assert_eq!(stats.increment_indexed(), 1);
        stats.increment_rejected(RejectionKind::MalformedNumeric);
        stats.increment_rejected(RejectionKind::MalformedNumeric);
        stats.increment_rejected(RejectionKind::OutOfRangeNumeric);
        assert_eq!(stats.rejected(RejectionKind::MalformedNumeric), 2);
        assert_eq!(stats.rejected(RejectionKind::OutOfRangeNumeric), 1);
        assert_eq!(stats.total_rejected(), 3);
    }

    #[test]
    fn test_rejection_kind_mapping() {
        assert_eq!(
            ValidationRejection::MissingRequiredField("country_code").kind(),
            RejectionKind::MissingRequiredField
        );
        assert_eq!(
            ValidationRejection::OutOfRangeNumeric {
                field: "lat",
                value: "91.0".into()
            }
            .kind(),
            RejectionKind::OutOfRangeNumeric
        );
        assert_eq!(
            ValidationRejection::MalformedNumeric {
                field: "lon",
                value: "abc".into()
            }
            .kind(),
            RejectionKind::MalformedNumeric
        );
    }

    #[test]
    fn test_pipeline_error_messages_name_the_stage() {
        let err = PipelineError::Storage(StorageFailure::new("disk full"));
        assert!(err.to_string().contains("storage failure"));
        let err = PipelineError::Cancelled { stage: "pop" };
        assert!(err.to_string().contains("cancelled during pop"));
        let err = PipelineError::Commit(CommitFailure::new("fsync failed"));
        assert!(err.to_string().contains("commit failure"));
    }
}
