// src/dag/waves.rs

//! Kahn-style readiness layering over a [`TaskGraph`].

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dag::graph::TaskGraph;
use crate::types::TaskName;

/// Per-run readiness state.
///
/// A task is ready once every in-submission dependency has been marked as
/// succeeded. A failed task is settled but never releases its dependents, so
/// anything downstream of a failure simply never becomes ready.
#[derive(Debug)]
pub struct WavePlanner<'g> {
    graph: &'g TaskGraph,
    /// Number of dependencies that have not yet succeeded.
    remaining: HashMap<&'g str, usize>,
    /// Names already handed out in a wave.
    emitted: HashSet<&'g str>,
}

impl<'g> WavePlanner<'g> {
    pub fn new(graph: &'g TaskGraph) -> Self {
        let remaining = graph
            .tasks()
            .map(|name| (name, graph.dependencies_of(name).len()))
            .collect();

        Self {
            graph,
            remaining,
            emitted: HashSet::new(),
        }
    }

    /// Names that are ready and not yet returned, in submission order.
    ///
    /// Returns `None` once nothing more can become ready.
    pub fn next_wave(&mut self) -> Option<Vec<TaskName>> {
        let wave: Vec<&'g str> = self
            .graph
            .tasks()
            .filter(|name| {
                !self.emitted.contains(name) && self.remaining.get(name).copied() == Some(0)
            })
            .collect();

        if wave.is_empty() {
            return None;
        }

        self.emitted.extend(wave.iter().copied());
        Some(wave.into_iter().map(str::to_string).collect())
    }

    /// Record that `name` succeeded, releasing its dependents.
    pub fn mark_succeeded(&mut self, name: &str) {
        for dependent in self.graph.dependents_of(name) {
            if let Some(count) = self.remaining.get_mut(dependent.as_str()) {
                *count = count.saturating_sub(1);
            }
        }
    }

    /// Record that `name` failed. Its dependents stay blocked.
    pub fn mark_failed(&mut self, name: &str) {
        debug!(
            task = %name,
            blocked = ?self.graph.dependents_of(name),
            "task failed; dependents will not become ready in this run"
        );
    }

    /// Tasks that were never handed out (blocked by a failed dependency).
    pub fn never_ready(&self) -> Vec<TaskName> {
        self.graph
            .tasks()
            .filter(|name| !self.emitted.contains(name))
            .map(str::to_string)
            .collect()
    }
}

impl TaskGraph {
    /// Wave layering assuming every task succeeds.
    pub fn waves(&self) -> Vec<Vec<TaskName>> {
        let mut planner = WavePlanner::new(self);
        let mut waves = Vec::new();

        while let Some(wave) = planner.next_wave() {
            for name in &wave {
                planner.mark_succeeded(name);
            }
            waves.push(wave);
        }

        waves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Invocation, TaskSpec};

    fn noop(_inv: Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    fn diamond() -> TaskGraph {
        let spec = |name: &str, deps: &[&str]| {
            TaskSpec::blocking(noop)
                .name(name)
                .after_all(deps.iter().copied())
                .build()
                .unwrap()
        };
        TaskGraph::build(
            vec![
                spec("t1", &[]),
                spec("t2", &["t1"]),
                spec("t3", &["t1"]),
                spec("t4", &["t2", "t3"]),
            ],
            |_| false,
        )
        .unwrap()
    }

    #[test]
    fn layers_a_diamond_into_three_waves() {
        let graph = diamond();
        assert_eq!(
            graph.waves(),
            vec![
                vec!["t1".to_string()],
                vec!["t2".to_string(), "t3".to_string()],
                vec!["t4".to_string()],
            ]
        );
    }

    #[test]
    fn failure_blocks_dependents() {
        let graph = diamond();
        let mut planner = WavePlanner::new(&graph);

        assert_eq!(planner.next_wave(), Some(vec!["t1".to_string()]));
        planner.mark_succeeded("t1");

        assert_eq!(
            planner.next_wave(),
            Some(vec!["t2".to_string(), "t3".to_string()])
        );
        planner.mark_succeeded("t2");
        planner.mark_failed("t3");

        assert_eq!(planner.next_wave(), None);
        assert_eq!(planner.never_ready(), vec!["t4".to_string()]);
    }

    #[test]
    fn a_wave_is_returned_only_once() {
        let graph = diamond();
        let mut planner = WavePlanner::new(&graph);
        assert!(planner.next_wave().is_some());
        // t1 not yet marked: nothing new is ready.
        assert_eq!(planner.next_wave(), None);
    }
}
