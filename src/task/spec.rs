// src/task/spec.rs

//! Immutable task specification and its builder.

use std::future::Future;

use serde::Serialize;

use crate::errors::{Result, TaskwaveError};
use crate::task::binding::Bindings;
use crate::task::invocation::Invocation;
use crate::task::path::ResultPath;
use crate::task::work::{Work, WorkMode};
use crate::types::{TaskName, Value};

/// One named unit of work plus its dependencies and arguments.
///
/// Built through [`TaskSpec::blocking`] / [`TaskSpec::suspending`] and
/// [`TaskSpecBuilder::build`], which performs all per-spec validation.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    name: TaskName,
    work: Work,
    deps: Vec<TaskName>,
    args: Vec<Value>,
    bindings: Bindings,
    result_path: Option<ResultPath>,
}

impl TaskSpec {
    /// Start a spec whose work runs on the worker pool.
    pub fn blocking<F, T>(f: F) -> TaskSpecBuilder
    where
        F: Fn(Invocation) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Serialize,
    {
        TaskSpecBuilder::new(Work::blocking(f), derived_name::<F>())
    }

    /// Start a spec whose work is awaited on the run loop.
    pub fn suspending<F, Fut, T>(f: F) -> TaskSpecBuilder
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        TaskSpecBuilder::new(Work::suspending(f), derived_name::<F>())
    }

    /// Start a spec from an already constructed [`Work`]. A name must be set.
    pub fn from_work(work: Work) -> TaskSpecBuilder {
        TaskSpecBuilder::new(work, String::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn work(&self) -> &Work {
        &self.work
    }

    pub fn mode(&self) -> WorkMode {
        self.work.mode()
    }

    /// Dependency names, de-duplicated, in first-declared order.
    pub fn dependencies(&self) -> &[TaskName] {
        &self.deps
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn result_path(&self) -> Option<&ResultPath> {
        self.result_path.as_ref()
    }
}

/// Builder for [`TaskSpec`].
#[derive(Debug)]
pub struct TaskSpecBuilder {
    name: Option<TaskName>,
    derived_name: TaskName,
    work: Work,
    deps: Vec<TaskName>,
    args: Vec<Value>,
    bindings: Bindings,
    result_path: Option<String>,
}

impl TaskSpecBuilder {
    fn new(work: Work, derived_name: TaskName) -> Self {
        Self {
            name: None,
            derived_name,
            work,
            deps: Vec::new(),
            args: Vec::new(),
            bindings: Bindings::default(),
            result_path: None,
        }
    }

    pub fn name(mut self, name: impl Into<TaskName>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a dependency. Repeated names are kept once.
    pub fn after(mut self, dep: impl Into<TaskName>) -> Self {
        self.deps.push(dep.into());
        self
    }

    pub fn after_all<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        self.deps.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Declare a named argument. Must not share a name with a dependency.
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.declare(key.into(), value.into());
        self
    }

    /// Declare a named argument that replaces the dependency result of the
    /// same name.
    pub fn override_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.declare_override(key.into(), value.into());
        self
    }

    pub fn result_path(mut self, path: impl Into<String>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<TaskSpec> {
        let name = self.name.unwrap_or(self.derived_name);
        if name.trim().is_empty() {
            return Err(TaskwaveError::MalformedSpec(
                "task name must not be empty".to_string(),
            ));
        }

        let mut deps: Vec<TaskName> = Vec::with_capacity(self.deps.len());
        for dep in self.deps {
            if dep.trim().is_empty() {
                return Err(TaskwaveError::MalformedSpec(format!(
                    "task '{name}' lists an empty dependency name"
                )));
            }
            if dep == name {
                return Err(TaskwaveError::MalformedSpec(format!(
                    "task '{name}' cannot depend on itself"
                )));
            }
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        self.bindings.validate(&name, &deps)?;

        let result_path = self
            .result_path
            .as_deref()
            .map(ResultPath::parse)
            .transpose()?;

        Ok(TaskSpec {
            name,
            work: self.work,
            deps,
            args: self.args,
            bindings: self.bindings,
            result_path,
        })
    }
}

/// Stable identifier derived from the type name of a work function.
///
/// For a function item `my_crate::loaders::load_docs` this is `load_docs`.
/// Closures resolve to their enclosing function's name, so several closures
/// from one function need explicit names to stay unique.
fn derived_name<F>() -> TaskName {
    let full = std::any::type_name::<F>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .find(|seg| !seg.is_empty() && !seg.starts_with("{{"))
        .unwrap_or(without_generics)
        .to_string()
}
