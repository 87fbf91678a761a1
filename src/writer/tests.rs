// Writer pool tests.

use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::record::GeoIpRecord;
use crate::sink::MemorySink;

fn record(ip_start: u32) -> GeoIpRecord {
    GeoIpRecord {
        ip_start,
        country_code: "US".into(),
        country_name: String::new(),
        region_code: String::new(),
        region_name: String::new(),
        city: String::new(),
        postal_code: String::new(),
        metro_code: String::new(),
        lat: 41.9288,
        lon: -87.6315,
    }
}

fn pool(
    workers: usize,
    queue: &Arc<IngestionQueue>,
    sink: &Arc<MemorySink>,
    cancel: &CancellationToken,
) -> IndexWriterPool<MemorySink> {
    IndexWriterPool::new(
        workers,
        Arc::clone(queue),
        Arc::clone(sink),
        DocumentBuilder::new(5..=15),
        Arc::new(IngestStats::new()),
        cancel.clone(),
        Duration::from_millis(100),
        0,
    )
}

#[tokio::test]
async fn test_workers_drain_queue_and_exit_on_sentinel() {
    let queue = Arc::new(IngestionQueue::new(8));
    let sink = Arc::new(MemorySink::new());
    let cancel = CancellationToken::new();
    let handles = pool(3, &queue, &sink, &cancel).spawn();

    for i in 0..50 {
        queue.push(record(i)).await;
    }
    queue.push_end_of_stream().await;

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap().unwrap();
    }
    assert_eq!(total, 50);
    assert_eq!(sink.len(), 50);

    let mut ips: Vec<u32> = sink.documents().iter().map(|d| d.record.ip_start).collect();
    ips.sort_unstable();
    assert_eq!(ips, (0..50).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_workers_exit_within_one_timeout_of_drain() {
    let queue = Arc::new(IngestionQueue::new(8));
    let sink = Arc::new(MemorySink::new());
    let cancel = CancellationToken::new();
    let handles = pool(2, &queue, &sink, &cancel).spawn();

    queue.push(record(1)).await;
    queue.push_end_of_stream().await;

    // Sentinel visible + queue drained: workers must be gone well within
    // one pop-timeout interval.
    let joined = tokio::time::timeout(Duration::from_millis(300), async {
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
    })
    .await;
    assert!(joined.is_ok(), "workers failed to exit after drain");
}

#[tokio::test]
async fn test_cancellation_during_blocking_pop_propagates() {
    let queue = Arc::new(IngestionQueue::new(8));
    let sink = Arc::new(MemorySink::new());
    let cancel = CancellationToken::new();
    // Long pop timeout: without cancellation these workers would sit in
    // pop for 30 seconds.
    let pool = IndexWriterPool::new(
        2,
        Arc::clone(&queue),
        Arc::clone(&sink),
        DocumentBuilder::new(5..=15),
        Arc::new(IngestStats::new()),
        cancel.clone(),
        Duration::from_secs(30),
        0,
    );
    let handles = pool.spawn();

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    for handle in handles {
        let err = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cancelled worker should exit promptly")
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled { .. }));
    }
}

#[tokio::test]
async fn test_storage_failure_stops_the_worker() {
    use crate::error_handling::{CommitFailure, StorageFailure};

    struct RejectingSink;
    impl crate::sink::IndexSink for RejectingSink {
        async fn submit(
            &self,
            _document: crate::document::IndexDocument,
        ) -> Result<(), StorageFailure> {
            Err(StorageFailure::new("no more disk space"))
        }
        async fn commit(&self) -> Result<(), CommitFailure> {
            Ok(())
        }
        async fn close(&self) -> Result<(), CommitFailure> {
            Ok(())
        }
    }

    let queue = Arc::new(IngestionQueue::new(8));
    let cancel = CancellationToken::new();
    let pool = IndexWriterPool::new(
        1,
        Arc::clone(&queue),
        Arc::new(RejectingSink),
        DocumentBuilder::new(5..=15),
        Arc::new(IngestStats::new()),
        cancel.clone(),
        Duration::from_millis(100),
        0,
    );
    let handles = pool.spawn();

    queue.push(record(1)).await;

    let err = handles
        .into_iter()
        .next()
        .unwrap()
        .await
        .unwrap()
        .unwrap_err();
    match err {
        PipelineError::Storage(f) => assert!(f.message.contains("disk space")),
        other => panic!("expected storage failure, got {other:?}"),
    }
}
