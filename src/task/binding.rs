// src/task/binding.rs

//! Named-argument binding table.
//!
//! A task receives every dependency's result as a named argument keyed by the
//! dependency's name. Declared named arguments are layered on top. A declared
//! key equal to a dependency name is only allowed when it was declared as an
//! explicit override, in which case the declared value wins and the upstream
//! result is not bound.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{Result, TaskError, TaskwaveError};
use crate::types::{TaskName, Value};

#[derive(Debug, Clone, Default)]
pub struct Bindings {
    declared: BTreeMap<String, Value>,
    overrides: BTreeSet<String>,
}

impl Bindings {
    pub fn declare(&mut self, key: String, value: Value) {
        self.overrides.remove(&key);
        self.declared.insert(key, value);
    }

    /// Declare a value that replaces the dependency result of the same name.
    pub fn declare_override(&mut self, key: String, value: Value) {
        self.overrides.insert(key.clone());
        self.declared.insert(key, value);
    }

    pub fn declared(&self) -> &BTreeMap<String, Value> {
        &self.declared
    }

    pub fn is_override(&self, key: &str) -> bool {
        self.overrides.contains(key)
    }

    /// Reject declared keys that silently shadow a dependency.
    pub fn validate(&self, task: &str, deps: &[TaskName]) -> Result<()> {
        for dep in deps {
            if self.declared.contains_key(dep) && !self.overrides.contains(dep) {
                return Err(TaskwaveError::ArgumentCollision {
                    task: task.to_string(),
                    key: dep.clone(),
                });
            }
        }
        Ok(())
    }

    /// Build the named arguments for one invocation.
    ///
    /// `lookup` returns the recorded successful value of a dependency.
    pub fn bind<'a, F>(
        &self,
        deps: &[TaskName],
        lookup: F,
    ) -> std::result::Result<BTreeMap<String, Value>, TaskError>
    where
        F: Fn(&str) -> Option<&'a Value>,
    {
        let mut kwargs = BTreeMap::new();

        for dep in deps {
            if self.overrides.contains(dep) {
                continue;
            }
            let value = lookup(dep).ok_or_else(|| TaskError::MissingInput(dep.clone()))?;
            kwargs.insert(dep.clone(), value.clone());
        }

        for (key, value) in &self.declared {
            kwargs.insert(key.clone(), value.clone());
        }

        Ok(kwargs)
    }
}
