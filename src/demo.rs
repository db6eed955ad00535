// src/demo.rs

//! Five-task demo pipeline driven by the `taskwave` binary.
//!
//! ```text
//! task1 ──┬── task2 ──┬── task4 ── task5
//!         └── task3 ──┘
//! ```
//!
//! `task1`, `task2` and `task5` are async; `task3` and `task4` block a worker
//! thread. Each task echoes its upstream results, so the final aggregate
//! shows how values flowed through the graph.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::bail;
use serde_json::json;

use crate::errors::{Result, TaskwaveError};
use crate::task::{Invocation, TaskSpec};

/// Names of the demo tasks, in submission order.
pub const TASK_NAMES: [&str; 5] = ["task1", "task2", "task3", "task4", "task5"];

const EXTRA_ARG: &str = "Extra arg";

/// Makes selected tasks fail the first time they are invoked.
#[derive(Debug, Clone, Default)]
pub struct FailureInjector {
    pending: Arc<Mutex<HashSet<String>>>,
}

impl FailureInjector {
    pub fn new<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: Arc::new(Mutex::new(tasks.into_iter().map(Into::into).collect())),
        }
    }

    /// Fail if `task` still has an injected failure pending, consuming it.
    pub fn check(&self, task: &str) -> anyhow::Result<()> {
        let armed = match self.pending.lock() {
            Ok(mut pending) => pending.remove(task),
            Err(poisoned) => poisoned.into_inner().remove(task),
        };
        if armed {
            bail!("injected failure on first attempt of '{task}'");
        }
        Ok(())
    }
}

/// Build the demo pipeline.
///
/// Every name in `fail_first` must be one of [`TASK_NAMES`].
pub fn pipeline(delay: Duration, fail_first: &[String]) -> Result<Vec<TaskSpec>> {
    if let Some(unknown) = fail_first.iter().find(|n| !TASK_NAMES.contains(&n.as_str())) {
        return Err(TaskwaveError::ConfigError(format!(
            "--fail-first-attempt names unknown task '{unknown}'"
        )));
    }
    let injector = FailureInjector::new(fail_first.iter().cloned());

    let task1 = {
        let injector = injector.clone();
        TaskSpec::suspending(move |inv: Invocation| {
            let injector = injector.clone();
            async move {
                injector.check(inv.task_name())?;
                tokio::time::sleep(delay).await;
                let arg: String = inv.arg_as(0)?;
                Ok::<_, anyhow::Error>(json!({ "arg": arg, "task1": "Result 1" }))
            }
        })
        .name("task1")
        .arg(EXTRA_ARG)
        .result_path("pipeline.task1")
        .build()?
    };

    let task2 = {
        let injector = injector.clone();
        TaskSpec::suspending(move |inv: Invocation| {
            let injector = injector.clone();
            async move {
                injector.check(inv.task_name())?;
                tokio::time::sleep(delay).await;
                let arg: String = inv.arg_as(0)?;
                Ok::<_, anyhow::Error>(json!({ "arg": arg, "task1": inv.get("task1"), "task2": "Result 2" }))
            }
        })
        .name("task2")
        .after("task1")
        .arg(EXTRA_ARG)
        .result_path("pipeline.task2")
        .build()?
    };

    let task3 = {
        let injector = injector.clone();
        TaskSpec::blocking(move |inv: Invocation| {
            injector.check(inv.task_name())?;
            std::thread::sleep(delay);
            Ok(json!({ "task1": inv.get("task1"), "task3": "Result 3" }))
        })
        .name("task3")
        .after("task1")
        .result_path("pipeline.task3")
        .build()?
    };

    let task4 = {
        let injector = injector.clone();
        TaskSpec::blocking(move |inv: Invocation| {
            injector.check(inv.task_name())?;
            std::thread::sleep(delay);
            Ok(json!({
                "task2": inv.get("task2"),
                "task3": inv.get("task3"),
                "task4": "Result 4",
            }))
        })
        .name("task4")
        .after_all(["task2", "task3"])
        .result_path("pipeline.task4")
        .build()?
    };

    let task5 = TaskSpec::suspending(move |inv: Invocation| {
        let injector = injector.clone();
        async move {
            injector.check(inv.task_name())?;
            tokio::time::sleep(delay).await;
            Ok::<_, anyhow::Error>(json!({ "task4": inv.get("task4"), "task5": "Result 5" }))
        }
    })
    .name("task5")
    .after("task4")
    .result_path("final")
    .build()?;

    Ok(vec![task1, task2, task3, task4, task5])
}
