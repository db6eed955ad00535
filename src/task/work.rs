// src/task/work.rs

//! The unit of work carried by a task.
//!
//! Whether a task blocks a thread or suspends cooperatively is decided when
//! the [`Work`] value is constructed, never inferred at invocation time:
//!
//! - [`Work::Blocking`] runs on the scheduler's worker pool.
//! - [`Work::Suspending`] is awaited directly by the run loop.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::task::invocation::Invocation;
use crate::types::Value;

/// Boxed future returned by suspending work.
pub type WorkFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send + 'static>>;

type BlockingFn = dyn Fn(Invocation) -> anyhow::Result<Value> + Send + Sync;
type SuspendingFn = dyn Fn(Invocation) -> WorkFuture + Send + Sync;

/// Execution mode of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkMode {
    Blocking,
    Suspending,
}

#[derive(Clone)]
pub enum Work {
    Blocking(Arc<BlockingFn>),
    Suspending(Arc<SuspendingFn>),
}

impl Work {
    /// Wrap a synchronous function. Its output is serialized into a [`Value`].
    pub fn blocking<F, T>(f: F) -> Self
    where
        F: Fn(Invocation) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Serialize,
    {
        Work::Blocking(Arc::new(move |inv| {
            let out = f(inv)?;
            Ok(serde_json::to_value(out)?)
        }))
    }

    /// Wrap an async function. Its output is serialized into a [`Value`].
    pub fn suspending<F, Fut, T>(f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Work::Suspending(Arc::new(move |inv| {
            let fut = f(inv);
            Box::pin(async move {
                let out = fut.await?;
                Ok(serde_json::to_value(out)?)
            })
        }))
    }

    pub fn mode(&self) -> WorkMode {
        match self {
            Work::Blocking(_) => WorkMode::Blocking,
            Work::Suspending(_) => WorkMode::Suspending,
        }
    }
}

impl fmt::Debug for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Work").field(&self.mode()).finish()
    }
}
