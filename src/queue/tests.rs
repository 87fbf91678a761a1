// Ingestion queue tests.

use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::record::GeoIpRecord;

fn record(ip_start: u32) -> GeoIpRecord {
    GeoIpRecord {
        ip_start,
        country_code: "US".into(),
        country_name: "United States".into(),
        region_code: String::new(),
        region_name: String::new(),
        city: String::new(),
        postal_code: String::new(),
        metro_code: String::new(),
        lat: 41.9288,
        lon: -87.6315,
    }
}

const SHORT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_fifo_order_single_consumer() {
    let queue = IngestionQueue::new(10);
    for i in 0..5 {
        queue.push(record(i)).await;
    }
    for i in 0..5 {
        match queue.pop(SHORT).await {
            Popped::Record(r) => assert_eq!(r.ip_start, i),
            other => panic!("expected record {i}, got {other:?}"),
        }
    }
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_pop_times_out_on_empty_queue() {
    let queue = IngestionQueue::new(4);
    assert_eq!(queue.pop(SHORT).await, Popped::TimedOut);
}

#[tokio::test]
async fn test_end_of_stream_only_after_drain() {
    let queue = IngestionQueue::new(10);
    queue.push(record(1)).await;
    queue.push(record(2)).await;
    queue.push_end_of_stream().await;

    // Records come out first; the sentinel is only observable afterwards.
    assert!(matches!(queue.pop(SHORT).await, Popped::Record(_)));
    assert!(matches!(queue.pop(SHORT).await, Popped::Record(_)));
    assert_eq!(queue.pop(SHORT).await, Popped::EndOfStream);
}

#[tokio::test]
async fn test_end_of_stream_is_broadcast_not_consumed() {
    let queue = Arc::new(IngestionQueue::new(4));
    queue.push_end_of_stream().await;

    // Every consumer sees the sentinel, no matter how many times it is
    // observed.
    for _ in 0..3 {
        assert_eq!(queue.pop(SHORT).await, Popped::EndOfStream);
    }

    let mut handles = Vec::new();
    for _ in 0..4 {
        let q = Arc::clone(&queue);
        handles.push(tokio::spawn(async move { q.pop(SHORT).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Popped::EndOfStream);
    }
}

#[tokio::test]
async fn test_push_blocks_while_full() {
    let queue = Arc::new(IngestionQueue::new(1));
    queue.push(record(1)).await;

    let q = Arc::clone(&queue);
    let blocked_push = tokio::spawn(async move {
        q.push(record(2)).await;
    });

    // The second push cannot complete while the queue is full.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!blocked_push.is_finished());
    assert_eq!(queue.len(), 1);

    // Draining one slot unblocks it.
    assert!(matches!(queue.pop(SHORT).await, Popped::Record(_)));
    tokio::time::timeout(Duration::from_secs(1), blocked_push)
        .await
        .expect("push should unblock once a slot frees")
        .unwrap();
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_blocked_pop_wakes_on_push() {
    let queue = Arc::new(IngestionQueue::new(4));
    let q = Arc::clone(&queue);
    let popper = tokio::spawn(async move { q.pop(Duration::from_secs(5)).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.push(record(9)).await;

    let outcome = tokio::time::timeout(Duration::from_secs(1), popper)
        .await
        .expect("pop should wake well before its timeout")
        .unwrap();
    match outcome {
        Popped::Record(r) => assert_eq!(r.ip_start, 9),
        other => panic!("expected the pushed record, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blocked_pops_wake_on_end_of_stream() {
    let queue = Arc::new(IngestionQueue::new(4));
    let mut handles = Vec::new();
    for _ in 0..3 {
        let q = Arc::clone(&queue);
        handles.push(tokio::spawn(async move { q.pop(Duration::from_secs(5)).await }));
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.push_end_of_stream().await;

    for handle in handles {
        let outcome = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("blocked pops should wake on the sentinel")
            .unwrap();
        assert_eq!(outcome, Popped::EndOfStream);
    }
}

#[tokio::test]
async fn test_concurrent_consumers_split_the_stream_exactly_once() {
    let queue = Arc::new(IngestionQueue::new(8));
    let total: u32 = 200;

    let mut consumers = Vec::new();
    for _ in 0..4 {
        let q = Arc::clone(&queue);
        consumers.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            loop {
                match q.pop(Duration::from_secs(2)).await {
                    Popped::Record(r) => seen.push(r.ip_start),
                    Popped::EndOfStream => break,
                    Popped::TimedOut => continue,
                }
            }
            seen
        }));
    }

    for i in 0..total {
        queue.push(record(i)).await;
    }
    queue.push_end_of_stream().await;

    let mut all: Vec<u32> = Vec::new();
    for consumer in consumers {
        all.extend(consumer.await.unwrap());
    }
    all.sort_unstable();
    assert_eq!(all, (0..total).collect::<Vec<u32>>());
}
