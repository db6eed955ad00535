// src/exec/wave.rs

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::debug;

use crate::exec::invoke::{PreparedTask, TaskCompletion, invoke};
use crate::exec::pool::WorkerPool;

/// Launch every task of a wave concurrently and wait for all of them.
///
/// Completions are returned in the order the tasks settled. A failing task
/// never cancels its siblings.
pub async fn execute_wave(tasks: Vec<PreparedTask>, pool: &Arc<WorkerPool>) -> Vec<TaskCompletion> {
    let mut running: FuturesUnordered<_> = tasks
        .into_iter()
        .map(|task| invoke(task, Arc::clone(pool)))
        .collect();

    let mut completions = Vec::with_capacity(running.len());
    while let Some(done) = running.next().await {
        debug!(task = %done.name, success = done.outcome.is_ok(), "task settled");
        completions.push(done);
    }

    completions
}
