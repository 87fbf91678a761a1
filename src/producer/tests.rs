// Record producer tests.

use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::error_handling::{RejectionKind, SourceError};
use crate::queue::{IngestionQueue, Popped};
use crate::record::RawRecord;
use crate::source::MemorySource;
use tokio_util::sync::CancellationToken;

fn valid_row(ip: &str) -> RawRecord {
    RawRecord {
        ip_start: ip.into(),
        country_code: "US".into(),
        country_name: "United States".into(),
        latitude: "41.9288".into(),
        longitude: "-87.6315".into(),
        ..Default::default()
    }
}

async fn drain(queue: &IngestionQueue) -> Vec<u32> {
    let mut out = Vec::new();
    loop {
        match queue.pop(Duration::from_secs(2)).await {
            Popped::Record(r) => out.push(r.ip_start),
            Popped::EndOfStream => return out,
            Popped::TimedOut => panic!("queue timed out before end-of-stream"),
        }
    }
}

#[tokio::test]
async fn test_producer_queues_valid_rows_then_sentinel() {
    let queue = Arc::new(IngestionQueue::new(16));
    let stats = Arc::new(IngestStats::new());
    let source = MemorySource::new(vec![valid_row("1"), valid_row("2"), valid_row("3")]);

    let handle = RecordProducer::new(
        source,
        Arc::clone(&queue),
        Arc::clone(&stats),
        CancellationToken::new(),
        0,
    )
    .spawn();

    assert_eq!(drain(&queue).await, vec![1, 2, 3]);
    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary, ProducerSummary { parsed: 3, rejected: 0 });
    assert_eq!(stats.parsed(), 3);
}

#[tokio::test]
async fn test_rejected_rows_are_skipped_and_counted() {
    let queue = Arc::new(IngestionQueue::new(16));
    let stats = Arc::new(IngestStats::new());
    let bad_country = RawRecord {
        country_code: "USA".into(),
        ..valid_row("5")
    };
    let bad_lat = RawRecord {
        latitude: "999".into(),
        ..valid_row("6")
    };
    let source = MemorySource::new(vec![valid_row("4"), bad_country, bad_lat, valid_row("7")]);

    let handle = RecordProducer::new(
        source,
        Arc::clone(&queue),
        Arc::clone(&stats),
        CancellationToken::new(),
        0,
    )
    .spawn();

    assert_eq!(drain(&queue).await, vec![4, 7]);
    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary, ProducerSummary { parsed: 2, rejected: 2 });
    assert_eq!(stats.rejected(RejectionKind::MissingRequiredField), 1);
    assert_eq!(stats.rejected(RejectionKind::OutOfRangeNumeric), 1);
}

#[tokio::test]
async fn test_stream_error_is_fatal_and_pushes_no_sentinel() {
    struct FailingSource {
        yielded: bool,
    }
    impl crate::source::RecordSource for FailingSource {
        fn next_row(&mut self) -> Result<Option<RawRecord>, SourceError> {
            if self.yielded {
                Err(SourceError::Io(std::io::Error::other("stream truncated")))
            } else {
                self.yielded = true;
                Ok(Some(valid_row("1")))
            }
        }
    }

    let queue = Arc::new(IngestionQueue::new(16));
    let stats = Arc::new(IngestStats::new());
    let handle = RecordProducer::new(
        FailingSource { yielded: false },
        Arc::clone(&queue),
        stats,
        CancellationToken::new(),
        0,
    )
    .spawn();

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(err, PipelineError::InputExhaustion(_)));

    // The record made it in, but no sentinel follows a fatal stream error.
    assert!(matches!(
        queue.pop(Duration::from_millis(50)).await,
        Popped::Record(_)
    ));
    assert_eq!(
        queue.pop(Duration::from_millis(50)).await,
        Popped::TimedOut
    );
}

#[tokio::test]
async fn test_cancellation_unblocks_a_stalled_producer() {
    let queue = Arc::new(IngestionQueue::new(1));
    let stats = Arc::new(IngestStats::new());
    let cancel = CancellationToken::new();
    let source = MemorySource::new((0..10).map(|i| valid_row(&i.to_string())).collect());

    let handle = RecordProducer::new(
        source,
        Arc::clone(&queue),
        Arc::clone(&stats),
        cancel.clone(),
        0,
    )
    .spawn();

    // Nothing consumes, so the producer is parked on a full queue.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());

    cancel.cancel();
    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled { .. }));
}

#[tokio::test]
async fn test_cancellation_unblocks_a_stalled_sentinel_push() {
    let queue = Arc::new(IngestionQueue::new(1));
    let stats = Arc::new(IngestStats::new());
    let cancel = CancellationToken::new();
    // One record fills the capacity-1 queue, so the producer finishes
    // reading and then parks inside the end-of-stream push.
    let source = MemorySource::new(vec![valid_row("1")]);

    let handle = RecordProducer::new(
        source,
        Arc::clone(&queue),
        Arc::clone(&stats),
        cancel.clone(),
        0,
    )
    .spawn();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());
    assert_eq!(queue.len(), 1);

    cancel.cancel();
    let err = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("cancelled producer should exit promptly")
        .unwrap()
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Cancelled {
            stage: "end-of-stream push"
        }
    ));
}

#[tokio::test]
async fn test_producer_stalls_on_a_full_queue() {
    let queue = Arc::new(IngestionQueue::new(1));
    let stats = Arc::new(IngestStats::new());
    let source = MemorySource::new((0..10).map(|i| valid_row(&i.to_string())).collect());

    let handle = RecordProducer::new(
        source,
        Arc::clone(&queue),
        Arc::clone(&stats),
        CancellationToken::new(),
        0,
    )
    .spawn();

    // With capacity 1 and no consumer, the producer cannot finish.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());
    assert_eq!(queue.len(), 1);

    // Draining lets it run to completion, one slot at a time.
    assert_eq!(drain(&queue).await, (0..10).collect::<Vec<u32>>());
    handle.await.unwrap().unwrap();
}
