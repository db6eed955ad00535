// src/engine/options.rs

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::Dispatch;

use crate::config::Settings;
use crate::exec::WorkerPool;

/// Construction-time configuration of a [`Scheduler`](crate::Scheduler).
///
/// Every field is optional. Unset collaborators are created lazily, on first
/// use, and owned by the scheduler instance:
///
/// - `worker_pool`: a pool sized by `settings.max_workers()`
/// - `runtime`: a current-thread tokio runtime (only needed by the blocking
///   `run` entry point)
/// - `logger`: whatever `tracing` subscriber is current
#[derive(Debug, Clone, Default)]
pub struct SchedulerOptions {
    pub settings: Settings,
    pub worker_pool: Option<Arc<WorkerPool>>,
    pub runtime: Option<Handle>,
    pub logger: Option<Dispatch>,
}

impl SchedulerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Share an existing pool instead of creating one per scheduler.
    pub fn with_worker_pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.worker_pool = Some(pool);
        self
    }

    /// Drive blocking `run` calls on this runtime instead of an owned one.
    ///
    /// The runtime behind the handle must be driven by its own threads
    /// (a multi-thread runtime), since `run` only blocks on it.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Route the scheduler's logs to `logger` instead of the current default.
    pub fn with_logger(mut self, logger: impl Into<Dispatch>) -> Self {
        self.logger = Some(logger.into());
        self
    }
}
