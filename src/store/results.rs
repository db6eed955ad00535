// src/store/results.rs

use std::collections::HashMap;

use tracing::{debug, error};

use crate::errors::TaskError;
use crate::task::TaskSpec;
use crate::types::{TaskName, Value};

/// One recorded outcome plus the spec it was recorded for.
#[derive(Debug)]
struct Entry<T> {
    spec: TaskSpec,
    payload: T,
    /// Position in recording order.
    seq: u64,
}

/// Successes and failures keyed by task name.
///
/// A name is present in at most one of the two mappings. The store survives
/// across runs until [`ResultStore::clear`], which is what lets a resubmitted
/// task read results produced by an earlier run.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: HashMap<TaskName, Entry<Value>>,
    errors: HashMap<TaskName, Entry<TaskError>>,
    next_seq: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of `spec`, replacing any earlier entry for its name.
    pub fn record(&mut self, spec: &TaskSpec, outcome: Result<Value, TaskError>) {
        let name = spec.name().to_string();
        let seq = self.next_seq;
        self.next_seq += 1;

        match outcome {
            Ok(value) => {
                debug!(task = %name, seq, "recording task result");
                self.errors.remove(&name);
                self.results.insert(
                    name,
                    Entry {
                        spec: spec.clone(),
                        payload: value,
                        seq,
                    },
                );
            }
            Err(err) => {
                error!(task = %name, error = %err, "error executing task");
                self.results.remove(&name);
                self.errors.insert(
                    name,
                    Entry {
                        spec: spec.clone(),
                        payload: err,
                        seq,
                    },
                );
            }
        }
    }

    /// Drop a recorded success for `name`, if any. Returns whether one existed.
    pub fn forget(&mut self, name: &str) -> bool {
        self.results.remove(name).is_some()
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.results.get(name).map(|e| &e.payload)
    }

    pub fn error(&self, name: &str) -> Option<&TaskError> {
        self.errors.get(name).map(|e| &e.payload)
    }

    pub fn has_succeeded(&self, name: &str) -> bool {
        self.results.contains_key(name)
    }

    pub fn has_failed(&self, name: &str) -> bool {
        self.errors.contains_key(name)
    }

    /// Successful results in recording order.
    pub fn results(&self) -> Vec<(&str, &Value)> {
        sorted(&self.results)
            .into_iter()
            .map(|(name, e)| (name, &e.payload))
            .collect()
    }

    /// Captured failures in recording order.
    pub fn errors(&self) -> Vec<(&str, &TaskError)> {
        sorted(&self.errors)
            .into_iter()
            .map(|(name, e)| (name, &e.payload))
            .collect()
    }

    /// Specs of every task currently recorded as failed, in recording order.
    pub fn failed_specs(&self) -> Vec<TaskSpec> {
        sorted(&self.errors)
            .into_iter()
            .map(|(_, e)| e.spec.clone())
            .collect()
    }

    /// Successful specs with their values, in recording order.
    pub(crate) fn successes(&self) -> Vec<(&TaskSpec, &Value)> {
        sorted(&self.results)
            .into_iter()
            .map(|(_, e)| (&e.spec, &e.payload))
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.results.len()
    }

    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.errors.clear();
    }
}

fn sorted<T>(map: &HashMap<TaskName, Entry<T>>) -> Vec<(&str, &Entry<T>)> {
    let mut entries: Vec<_> = map.iter().map(|(k, e)| (k.as_str(), e)).collect();
    entries.sort_by_key(|(_, e)| e.seq);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Invocation, TaskSpec};
    use serde_json::json;

    fn noop(_inv: Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    fn spec(name: &str) -> TaskSpec {
        TaskSpec::blocking(noop).name(name).build().unwrap()
    }

    #[test]
    fn success_and_failure_are_mutually_exclusive() {
        let mut store = ResultStore::new();
        let t = spec("t");

        store.record(&t, Err(TaskError::Failed(anyhow::anyhow!("first try"))));
        assert!(store.has_failed("t"));
        assert!(!store.has_succeeded("t"));
        assert_eq!(store.failed_specs().len(), 1);

        store.record(&t, Ok(json!(3)));
        assert!(store.has_succeeded("t"));
        assert!(!store.has_failed("t"));
        assert_eq!(store.value("t"), Some(&json!(3)));
        assert!(store.failed_specs().is_empty());

        store.record(&t, Err(TaskError::Panicked("again".into())));
        assert!(store.value("t").is_none());
        assert!(matches!(store.error("t"), Some(TaskError::Panicked(_))));
    }

    #[test]
    fn listings_follow_recording_order() {
        let mut store = ResultStore::new();
        store.record(&spec("b"), Ok(json!(1)));
        store.record(&spec("a"), Ok(json!(2)));
        store.record(&spec("b"), Ok(json!(3)));

        let names: Vec<_> = store.results().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn forget_drops_only_a_success() {
        let mut store = ResultStore::new();
        store.record(&spec("ok"), Ok(json!(1)));
        store.record(&spec("bad"), Err(TaskError::Cancelled));

        assert!(store.forget("ok"));
        assert!(!store.forget("bad"));
        assert!(!store.has_succeeded("ok"));
        assert!(store.has_failed("bad"));
    }

    #[test]
    fn clear_empties_both_mappings() {
        let mut store = ResultStore::new();
        store.record(&spec("a"), Ok(json!(1)));
        store.record(&spec("b"), Err(TaskError::Cancelled));
        assert_eq!((store.success_count(), store.failure_count()), (1, 1));

        store.clear();
        assert!(store.is_empty());
    }
}
