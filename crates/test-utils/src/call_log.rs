use std::sync::{Arc, Mutex};

/// Something a test task did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    Started(String),
    Finished(String),
}

/// Shared recorder of task invocations.
///
/// Cloned into work closures; tests inspect it after a run to see which
/// tasks were invoked, how often, and in what order.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    events: Arc<Mutex<Vec<CallEvent>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self, task: &str) {
        self.push(CallEvent::Started(task.to_string()));
    }

    pub fn finished(&self, task: &str) {
        self.push(CallEvent::Finished(task.to_string()));
    }

    fn push(&self, event: CallEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Names of invoked tasks, in start order.
    pub fn calls(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                CallEvent::Started(name) => Some(name),
                CallEvent::Finished(_) => None,
            })
            .collect()
    }

    pub fn count(&self, task: &str) -> usize {
        self.calls().iter().filter(|n| n.as_str() == task).count()
    }

    /// Position of an event in the log.
    pub fn position(&self, event: &CallEvent) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}
