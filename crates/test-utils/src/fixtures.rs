//! Ready-made task specs for tests.
//!
//! Every fixture records `Started` / `Finished` in the given [`CallLog`] and
//! returns a [`TaskSpecBuilder`] named after the task, so tests can still add
//! dependencies, arguments and result paths.

use std::time::Duration;

use anyhow::anyhow;
use serde_json::Value;
use taskwave::task::{Invocation, TaskSpec, TaskSpecBuilder};

use crate::call_log::CallLog;

/// Blocking task returning `value`.
pub fn constant(log: &CallLog, name: &str, value: Value) -> TaskSpecBuilder {
    let log = log.clone();
    TaskSpec::blocking(move |inv: Invocation| {
        log.started(inv.task_name());
        log.finished(inv.task_name());
        Ok(value.clone())
    })
    .name(name)
}

/// Blocking task returning the integer result of `dep` plus one.
pub fn add_one(log: &CallLog, name: &str, dep: &str) -> TaskSpecBuilder {
    let log = log.clone();
    let key = dep.to_string();
    TaskSpec::blocking(move |inv: Invocation| {
        log.started(inv.task_name());
        let upstream: i64 = inv.get_as(&key)?;
        log.finished(inv.task_name());
        Ok(upstream + 1)
    })
    .name(name)
    .after(dep)
}

/// Blocking task that always fails with `message`.
pub fn failing(log: &CallLog, name: &str, message: &str) -> TaskSpecBuilder {
    let log = log.clone();
    let message = message.to_string();
    TaskSpec::blocking(move |inv: Invocation| -> anyhow::Result<Value> {
        log.started(inv.task_name());
        log.finished(inv.task_name());
        Err(anyhow!("{message}"))
    })
    .name(name)
}

/// Async task that sleeps for `delay` before returning `value`.
pub fn sleepy(log: &CallLog, name: &str, delay: Duration, value: Value) -> TaskSpecBuilder {
    let log = log.clone();
    TaskSpec::suspending(move |inv: Invocation| {
        let log = log.clone();
        let value = value.clone();
        async move {
            log.started(inv.task_name());
            tokio::time::sleep(delay).await;
            log.finished(inv.task_name());
            Ok::<_, anyhow::Error>(value)
        }
    })
    .name(name)
}

/// Blocking task that sleeps for `delay` before returning `value`.
pub fn busy(log: &CallLog, name: &str, delay: Duration, value: Value) -> TaskSpecBuilder {
    let log = log.clone();
    TaskSpec::blocking(move |inv: Invocation| {
        log.started(inv.task_name());
        std::thread::sleep(delay);
        log.finished(inv.task_name());
        Ok(value.clone())
    })
    .name(name)
}
