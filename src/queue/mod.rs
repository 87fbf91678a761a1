//! Bounded ingestion queue between the record producer and the writer pool.
//!
//! The queue is the system's sole flow-control mechanism: `push` blocks while
//! the queue is full, so a slow sink stalls the producer instead of dropping
//! records or buffering without bound.
//!
//! End-of-stream is an explicit sentinel item carried on the queue itself,
//! pushed once after the last record. Because the queue is FIFO, a worker can
//! only observe the sentinel after every record ahead of it has been handed
//! out: drain-before-exit needs no separate flag, and there is no race
//! between a "last entry" check and a "queue empty" check. The sentinel is
//! observed but never consumed, so it broadcasts to every worker.

#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;

use crate::record::GeoIpRecord;

/// One slot in the queue: a real record or the end-of-stream sentinel.
#[derive(Debug)]
enum QueueItem {
    Record(Box<GeoIpRecord>),
    EndOfStream,
}

/// Outcome of a bounded-wait pop.
#[derive(Debug, PartialEq)]
pub enum Popped {
    /// A record was dequeued; the caller now owns it exclusively.
    Record(GeoIpRecord),
    /// The timeout elapsed with nothing to hand out and no end-of-stream yet.
    TimedOut,
    /// The end-of-stream sentinel is at the front: all records have been
    /// handed out and no more will arrive.
    EndOfStream,
}

struct Inner {
    items: VecDeque<QueueItem>,
    /// Set once the sentinel has been pushed; rejects (debug) late pushes.
    closed: bool,
}

enum TryPop {
    Record(Box<GeoIpRecord>),
    Empty,
    EndOfStream,
}

/// Bounded, thread-safe FIFO channel carrying validated records plus the
/// end-of-stream sentinel.
///
/// Single producer, many consumers. The mutex guards only queue bookkeeping;
/// blocking happens on [`Notify`] outside the lock.
pub struct IngestionQueue {
    inner: Mutex<Inner>,
    not_full: Notify,
    not_empty: Notify,
    capacity: usize,
}

impl IngestionQueue {
    /// Creates a queue holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; [`Config::validate`](crate::Config::validate)
    /// rejects that before a queue is ever built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        IngestionQueue {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Notify::new(),
            not_empty: Notify::new(),
            capacity,
        }
    }

    /// Pushes a record, waiting while the queue is full.
    ///
    /// Must not be called after [`push_end_of_stream`](Self::push_end_of_stream).
    pub async fn push(&self, record: GeoIpRecord) {
        self.push_item(QueueItem::Record(Box::new(record))).await;
        self.not_empty.notify_one();
    }

    /// Pushes the end-of-stream sentinel, waiting while the queue is full.
    ///
    /// Called exactly once, after the last record. Wakes every blocked
    /// consumer so they can observe the sentinel once the records ahead of it
    /// drain.
    pub async fn push_end_of_stream(&self) {
        self.push_item(QueueItem::EndOfStream).await;
        self.not_empty.notify_waiters();
    }

    async fn push_item(&self, item: QueueItem) {
        let mut slot = item;
        loop {
            // The notified future must exist before the capacity check so a
            // notify between check and await cannot be lost.
            let notified = self.not_full.notified();
            match self.try_push(slot) {
                Ok(()) => return,
                Err(back) => slot = back,
            }
            notified.await;
        }
    }

    fn try_push(&self, item: QueueItem) -> Result<(), QueueItem> {
        let mut inner = self.inner.lock().unwrap();
        debug_assert!(
            !inner.closed || matches!(item, QueueItem::EndOfStream),
            "record pushed after end-of-stream"
        );
        if inner.items.len() < self.capacity {
            if matches!(item, QueueItem::EndOfStream) {
                inner.closed = true;
            }
            inner.items.push_back(item);
            Ok(())
        } else {
            Err(item)
        }
    }

    /// Pops the next record, waiting up to `timeout`.
    ///
    /// Returns [`Popped::EndOfStream`] only when the sentinel is at the
    /// front, i.e. after every preceding record has been handed out. The
    /// sentinel itself is left in place so every other consumer observes it
    /// too.
    pub async fn pop(&self, timeout: Duration) -> Popped {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.not_empty.notified();
            match self.try_pop() {
                TryPop::Record(record) => {
                    self.not_full.notify_one();
                    return Popped::Record(*record);
                }
                TryPop::EndOfStream => return Popped::EndOfStream,
                TryPop::Empty => {}
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Popped::TimedOut;
            }
        }
    }

    fn try_pop(&self) -> TryPop {
        let mut inner = self.inner.lock().unwrap();
        if matches!(inner.items.front(), Some(QueueItem::EndOfStream)) {
            return TryPop::EndOfStream;
        }
        match inner.items.pop_front() {
            Some(QueueItem::Record(record)) => TryPop::Record(record),
            // The sentinel case is handled by the front() check above.
            Some(QueueItem::EndOfStream) | None => TryPop::Empty,
        }
    }

    /// Number of records currently queued (the sentinel does not count).
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .items
            .iter()
            .filter(|i| matches!(i, QueueItem::Record(_)))
            .count()
    }

    /// Whether no records are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
