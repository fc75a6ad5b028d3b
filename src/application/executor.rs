//! Bounded worker pool for CPU-bound grouping work.
//!
//! Jobs run on a dedicated rayon pool so the async runtime stays free to
//! answer health checks and new requests. A semaphore with one permit per
//! worker thread gates submission, so at most that many jobs are queued or
//! running at once. Callers wait for a permit and for the result under a
//! single timeout. A job that overruns it is abandoned (its result is
//! discarded when it finishes), not preempted, and keeps its permit until it
//! actually returns.

use std::sync::Arc;
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::sync::{oneshot, Semaphore};

use crate::domain::error::DomainError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GroupingExecutor {
    pool: ThreadPool,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl GroupingExecutor {
    /// `workers == 0` sizes the pool to the available parallelism.
    pub fn new(workers: usize, timeout: Duration) -> Result<Self, DomainError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("cohort-worker-{i}"))
            .panic_handler(|_| tracing::error!("Grouping job panicked"))
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to start worker pool: {e}")))?;
        let threads = pool.current_num_threads();
        tracing::debug!(threads = threads, "Worker pool started");
        Ok(Self {
            pool,
            permits: Arc::new(Semaphore::new(threads)),
            timeout,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Jobs that may still be submitted without waiting.
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn run<F, T>(&self, job: F) -> Result<T, DomainError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let submit = async {
            let permit = Arc::clone(&self.permits)
                .acquire_owned()
                .await
                .map_err(|_| DomainError::Internal("worker pool is shut down".to_string()))?;
            let (tx, rx) = oneshot::channel();
            self.pool.spawn(move || {
                // Receiver is gone when the caller already timed out.
                let _ = tx.send(job());
                drop(permit);
            });
            rx.await.map_err(|_| {
                DomainError::Internal("grouping job ended without a result".to_string())
            })
        };

        match tokio::time::timeout(self.timeout, submit).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Grouping job abandoned after timeout"
                );
                Err(DomainError::Timeout(self.timeout.as_millis()))
            }
        }
    }
}
