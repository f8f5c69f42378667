//! Bounded ingestion queue and its single consumer
//!
//! The queue is the hand-off boundary between concurrent request handlers
//! and the one background worker, which serializes all storage writes.
//! Producers never block: a full queue is reported back immediately so the
//! HTTP layer can answer with a busy error. Jobs still buffered when the
//! process halts are lost; there is no delivery guarantee once queued.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::analytics::VisitService;
use crate::models::{NewVisit, VisitKind};

/// Default queue capacity when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// One unit of work for the visit worker.
#[derive(Debug, Clone)]
pub struct VisitJob {
    pub visit: NewVisit,
    pub kind: VisitKind,
}

pub enum QueueMessage {
    Job(VisitJob),
    /// Asks the worker to stop after draining what is already buffered.
    Shutdown,
}

/// Returned when the queue is at capacity. Admission control, not a failure.
#[derive(Debug, Error)]
#[error("ingestion queue is full")]
pub struct QueueFull;

/// Producer handle for the ingestion queue.
#[derive(Clone)]
pub struct IngestQueue {
    tx: mpsc::Sender<QueueMessage>,
}

impl IngestQueue {
    /// Create a queue of the given capacity, returning the producer handle
    /// and the receiver to hand to [`run_worker`].
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<QueueMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Non-blocking enqueue. A full buffer or a closed channel both map to
    /// [`QueueFull`]; the caller responds busy and the client may retry.
    pub fn submit(&self, job: VisitJob) -> Result<(), QueueFull> {
        self.tx
            .try_send(QueueMessage::Job(job))
            .map_err(|_| QueueFull)
    }

    /// Signal the worker to finish up. Buffered jobs ahead of the signal
    /// are still processed.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(QueueMessage::Shutdown).await;
    }
}

/// Drain the queue in FIFO order, applying the aggregation rule per job.
///
/// A failure on one job is logged and does not halt the worker or affect
/// later jobs. Runs until a shutdown message arrives or every producer
/// handle has been dropped.
pub async fn run_worker(mut rx: mpsc::Receiver<QueueMessage>, service: Arc<VisitService>) {
    while let Some(msg) = rx.recv().await {
        match msg {
            QueueMessage::Job(job) => {
                let source = job.visit.source.clone();
                let kind = job.kind;
                if let Err(err) = service.record(job.visit, kind).await {
                    error!(
                        source = %source,
                        kind = kind.as_str(),
                        "failed to process visit: {err:#}"
                    );
                }
            }
            QueueMessage::Shutdown => {
                info!("visit worker received shutdown signal, draining queue");
                rx.close();
            }
        }
    }
    info!("visit worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(source: &str) -> VisitJob {
        VisitJob {
            visit: NewVisit {
                ip_hash: "aaaa".to_string(),
                source: source.to_string(),
                referrer: None,
                user_agent: "test".to_string(),
            },
            kind: VisitKind::Page,
        }
    }

    #[tokio::test]
    async fn submit_rejects_when_full_without_blocking() {
        let (queue, _rx) = IngestQueue::new(2);

        queue.submit(job("a")).unwrap();
        queue.submit(job("b")).unwrap();
        assert!(queue.submit(job("c")).is_err());
    }

    #[tokio::test]
    async fn capacity_frees_up_as_jobs_are_consumed() {
        let (queue, mut rx) = IngestQueue::new(1);

        queue.submit(job("a")).unwrap();
        assert!(queue.submit(job("b")).is_err());

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, QueueMessage::Job(_)));
        queue.submit(job("b")).unwrap();
    }

    #[tokio::test]
    async fn jobs_come_out_in_submission_order() {
        let (queue, mut rx) = IngestQueue::new(10);

        for source in ["first", "second", "third"] {
            queue.submit(job(source)).unwrap();
        }

        for expected in ["first", "second", "third"] {
            match rx.recv().await.unwrap() {
                QueueMessage::Job(j) => assert_eq!(j.visit.source, expected),
                QueueMessage::Shutdown => panic!("unexpected shutdown"),
            }
        }
    }
}
