// src/exec/invoke.rs

//! Invocation of a single task.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tracing::{Instrument, debug, info, info_span};

use crate::errors::TaskError;
use crate::exec::pool::WorkerPool;
use crate::task::{Invocation, TaskSpec, Work};
use crate::types::{TaskName, Value};

/// A task whose arguments have been bound and which is ready to launch.
#[derive(Debug, Clone)]
pub struct PreparedTask {
    pub name: TaskName,
    pub work: Work,
    pub invocation: Invocation,
}

impl PreparedTask {
    /// Bind positional arguments, upstream results and declared named
    /// arguments for `spec`.
    ///
    /// `lookup` returns the recorded successful value of a dependency.
    pub fn prepare<'a, F>(spec: &TaskSpec, lookup: F) -> Result<Self, TaskError>
    where
        F: Fn(&str) -> Option<&'a Value>,
    {
        let kwargs = spec.bindings().bind(spec.dependencies(), lookup)?;
        Ok(Self {
            name: spec.name().to_string(),
            work: spec.work().clone(),
            invocation: Invocation::new(spec.name().to_string(), spec.args().to_vec(), kwargs),
        })
    }
}

/// Settled outcome of one task.
#[derive(Debug)]
pub struct TaskCompletion {
    pub name: TaskName,
    pub outcome: Result<Value, TaskError>,
    pub elapsed: Duration,
}

impl TaskCompletion {
    /// Outcome of a task that failed before it could be launched.
    pub fn unlaunched(name: TaskName, error: TaskError) -> Self {
        Self {
            name,
            outcome: Err(error),
            elapsed: Duration::ZERO,
        }
    }
}

/// Run one prepared task to completion.
///
/// Blocking work goes through `pool`; suspending work is polled in place.
/// Panics from either kind are captured as [`TaskError::Panicked`].
pub async fn invoke(task: PreparedTask, pool: Arc<WorkerPool>) -> TaskCompletion {
    let PreparedTask {
        name,
        work,
        invocation,
    } = task;
    let span = info_span!("task", task = %name, mode = ?work.mode());

    async move {
        let started = Instant::now();
        info!("executing task");

        let outcome = match work {
            Work::Blocking(f) => {
                // Worker threads log through the same subscriber as the run loop.
                let dispatch = tracing::dispatcher::get_default(|d| d.clone());
                let span = tracing::Span::current();
                pool.dispatch(move || {
                    tracing::dispatcher::with_default(&dispatch, || span.in_scope(|| f(invocation)))
                })
                .await
                .and_then(|res| res.map_err(TaskError::Failed))
            }
            Work::Suspending(f) => AssertUnwindSafe(async move { f(invocation).await })
                .catch_unwind()
                .await
                .map_err(TaskError::from_panic)
                .and_then(|res| res.map_err(TaskError::Failed)),
        };

        let elapsed = started.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            success = outcome.is_ok(),
            "executed task in {:.2}s",
            elapsed.as_secs_f64()
        );
        debug!(?outcome, "task outcome");

        TaskCompletion {
            name,
            outcome,
            elapsed,
        }
    }
    .instrument(span)
    .await
}
