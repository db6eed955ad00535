// src/task/invocation.rs

use std::collections::BTreeMap;

use anyhow::{Context, anyhow};
use serde::de::DeserializeOwned;

use crate::types::{TaskName, Value};

/// Arguments handed to a unit of work when it is invoked.
///
/// Named arguments contain every dependency's result under the dependency's
/// name, plus the task's own declared named arguments.
#[derive(Debug, Clone)]
pub struct Invocation {
    task: TaskName,
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl Invocation {
    pub fn new(task: TaskName, args: Vec<Value>, kwargs: BTreeMap<String, Value>) -> Self {
        Self { task, args, kwargs }
    }

    /// Name of the task being invoked.
    pub fn task_name(&self) -> &str {
        &self.task
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &BTreeMap<String, Value> {
        &self.kwargs
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    /// Deserialize a named argument into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        let value = self
            .kwargs
            .get(key)
            .ok_or_else(|| anyhow!("task '{}' has no named argument '{}'", self.task, key))?;
        serde_json::from_value(value.clone())
            .with_context(|| format!("decoding named argument '{}' of task '{}'", key, self.task))
    }

    /// Deserialize a positional argument into `T`.
    pub fn arg_as<T: DeserializeOwned>(&self, index: usize) -> anyhow::Result<T> {
        let value = self
            .args
            .get(index)
            .ok_or_else(|| anyhow!("task '{}' has no positional argument {}", self.task, index))?;
        serde_json::from_value(value.clone()).with_context(|| {
            format!("decoding positional argument {} of task '{}'", index, self.task)
        })
    }
}
