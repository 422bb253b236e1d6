//! Bounded background task queue.
//!
//! Webhook handlers answer the platform immediately and hand the real work to
//! this queue. A single worker runs tasks in submission order, so messages
//! from the same chat are applied one after another.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;

/// Default number of tasks that may wait for the worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

type Task = BoxFuture<'static, Result<(), RelayError>>;

enum Job {
    Run { name: &'static str, task: Task },
    Flush(oneshot::Sender<()>),
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    rejected: AtomicU64,
}

/// Snapshot of queue activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Tasks accepted onto the queue.
    pub submitted: u64,
    /// Tasks that finished with `Ok`.
    pub completed: u64,
    /// Tasks that returned an error or panicked.
    pub failed: u64,
    /// Submissions refused because the queue was full or closed.
    pub rejected: u64,
}

impl QueueStats {
    /// Tasks accepted but not yet finished.
    pub fn pending(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed)
            .saturating_sub(self.failed)
    }
}

/// Handle for submitting tasks to the worker.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::Sender<Job>,
    counters: Arc<Counters>,
}

impl TaskQueue {
    /// Start the worker; returns the queue handle and the worker's join handle.
    ///
    /// The worker stops once every queue handle has been dropped and the
    /// remaining tasks have run.
    pub fn start(capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let counters = Arc::new(Counters::default());
        let worker = tokio::spawn(run_worker(rx, counters.clone()));
        info!(capacity, "Task queue started");
        (Self { tx, counters }, worker)
    }

    /// Queue a task without waiting.
    ///
    /// Fails with [`RelayError::QueueFull`] when the queue is saturated.
    pub fn submit<F>(&self, name: &'static str, task: F) -> Result<(), RelayError>
    where
        F: Future<Output = Result<(), RelayError>> + Send + 'static,
    {
        let job = Job::Run {
            name,
            task: task.boxed(),
        };
        match self.tx.try_send(job) {
            Ok(()) => {
                self.counters.submitted.fetch_add(1, Ordering::Relaxed);
                debug!(task = name, "Task queued");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                warn!(task = name, "Task queue full, dropping task");
                Err(RelayError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                error!(task = name, "Task queue closed, dropping task");
                Err(RelayError::QueueClosed)
            }
        }
    }

    /// Wait until every task submitted before this call has finished.
    pub async fn flush(&self) -> Result<(), RelayError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Job::Flush(done_tx))
            .await
            .map_err(|_| RelayError::QueueClosed)?;
        done_rx.await.map_err(|_| RelayError::QueueClosed)
    }

    /// Current counters.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
        }
    }

    /// Number of free slots in the channel.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("stats", &self.stats())
            .finish()
    }
}

async fn run_worker(mut rx: mpsc::Receiver<Job>, counters: Arc<Counters>) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Run { name, task } => match AssertUnwindSafe(task).catch_unwind().await {
                Ok(Ok(())) => {
                    counters.completed.fetch_add(1, Ordering::Relaxed);
                    debug!(task = name, "Task completed");
                }
                Ok(Err(e)) => {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    error!(task = name, "Task failed: {}", e);
                }
                Err(_) => {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    error!(task = name, "Task panicked");
                }
            },
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    info!("Task queue worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn test_tasks_run_in_order() {
        let (queue, _worker) = TaskQueue::start(16);
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = seen.clone();
            queue
                .submit("record", async move {
                    seen.lock().await.push(i);
                    Ok(())
                })
                .unwrap();
        }
        queue.flush().await.unwrap();

        assert_eq!(*seen.lock().await, vec![0, 1, 2, 3, 4]);
        let stats = queue.stats();
        assert_eq!(stats.submitted, 5);
        assert_eq!(stats.completed, 5);
        assert_eq!(stats.pending(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_counted() {
        let (queue, _worker) = TaskQueue::start(4);
        queue
            .submit("fails", async { Err(RelayError::SendFailed("boom".to_string())) })
            .unwrap();
        queue
            .submit("panics", async {
                if true {
                    panic!("task panic");
                }
                Ok(())
            })
            .unwrap();
        queue.submit("ok", async { Ok(()) }).unwrap();
        queue.flush().await.unwrap();

        let stats = queue.stats();
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.completed, 1);
    }

    #[tokio::test]
    async fn test_full_queue_rejects() {
        let (queue, _worker) = TaskQueue::start(1);
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let (started_tx, started_rx) = oneshot::channel::<()>();

        queue
            .submit("blocker", async move {
                let _ = started_tx.send(());
                let _ = release_rx.await;
                Ok(())
            })
            .unwrap();
        started_rx.await.unwrap();

        queue.submit("waiting", async { Ok(()) }).unwrap();
        let result = queue.submit("overflow", async { Ok(()) });
        assert!(matches!(result, Err(RelayError::QueueFull)));
        assert_eq!(queue.stats().rejected, 1);

        release_tx.send(()).unwrap();
        queue.flush().await.unwrap();
        assert_eq!(queue.stats().completed, 2);
    }

    #[tokio::test]
    async fn test_worker_stops_when_handles_dropped() {
        let (queue, worker) = TaskQueue::start(4);
        queue.submit("ok", async { Ok(()) }).unwrap();
        drop(queue);
        worker.await.unwrap();
    }
}
