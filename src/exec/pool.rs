// src/exec/pool.rs

//! Bounded worker pool for blocking work.
//!
//! Blocking closures run on tokio's blocking thread pool, but only after
//! acquiring a permit from this pool's semaphore. The permit count is the
//! pool's capacity; excess work queues for a free permit.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::errors::{Result, TaskError, TaskwaveError};

/// Upper bound applied to the default capacity.
const DEFAULT_MAX_WORKERS: usize = 32;

#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TaskwaveError::ConfigError(
                "worker pool capacity must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    pub fn with_default_capacity() -> Self {
        let capacity = Self::default_capacity();
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// `min(32, available_parallelism + 4)`.
    pub fn default_capacity() -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        (cpus + 4).min(DEFAULT_MAX_WORKERS)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of idle workers right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// Stop accepting work. Work already holding a permit runs to completion.
    pub fn close(&self) {
        debug!(capacity = self.capacity, "closing worker pool");
        self.permits.close();
    }

    /// Run `f` on a worker thread once a worker is free.
    ///
    /// Must be awaited from within a tokio runtime.
    pub async fn dispatch<F, T>(&self, f: F) -> std::result::Result<T, TaskError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| TaskError::PoolClosed)?;

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        });

        handle.await.map_err(TaskError::from_join)
    }
}
