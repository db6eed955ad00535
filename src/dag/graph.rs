// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, TaskwaveError};
use crate::task::TaskSpec;
use crate::types::TaskName;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    spec: TaskSpec,
    /// Dependencies that are part of this submission.
    deps: Vec<TaskName>,
    /// Dependencies satisfied by a success recorded in an earlier run.
    satisfied_deps: Vec<TaskName>,
    /// Direct dependents: tasks in this submission that depend on this one.
    dependents: Vec<TaskName>,
}

/// Validated dependency graph for one submission.
///
/// Built fresh on every run. Construction fails with a structural error on
/// duplicate names, unknown dependencies or cycles, so a `TaskGraph` value is
/// always a DAG.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: HashMap<TaskName, DagNode>,
    /// Submission order, used to keep wave contents deterministic.
    order: Vec<TaskName>,
}

impl TaskGraph {
    /// Validate `tasks` and build the graph.
    ///
    /// `already_succeeded` reports whether a name has a recorded success from
    /// an earlier run; such names may be depended upon without being
    /// resubmitted.
    pub fn build<F>(tasks: Vec<TaskSpec>, already_succeeded: F) -> Result<Self>
    where
        F: Fn(&str) -> bool,
    {
        let mut nodes: HashMap<TaskName, DagNode> = HashMap::with_capacity(tasks.len());
        let mut order = Vec::with_capacity(tasks.len());

        // First pass: names must be unique.
        for spec in tasks {
            let name = spec.name().to_string();
            if nodes.contains_key(&name) {
                return Err(TaskwaveError::DuplicateName(name));
            }
            order.push(name.clone());
            nodes.insert(
                name,
                DagNode {
                    spec,
                    deps: Vec::new(),
                    satisfied_deps: Vec::new(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: resolve every dependency.
        for name in &order {
            let declared = nodes[name].spec.dependencies().to_vec();
            let mut deps = Vec::new();
            let mut satisfied_deps = Vec::new();

            for dep in declared {
                if nodes.contains_key(&dep) {
                    deps.push(dep);
                } else if already_succeeded(&dep) {
                    satisfied_deps.push(dep);
                } else {
                    return Err(TaskwaveError::UnknownDependency {
                        task: name.clone(),
                        dependency: dep,
                    });
                }
            }

            for dep in &deps {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependents.push(name.clone());
                }
            }

            if let Some(node) = nodes.get_mut(name) {
                node.deps = deps;
                node.satisfied_deps = satisfied_deps;
            }
        }

        let graph = Self { nodes, order };
        graph.ensure_acyclic()?;
        Ok(graph)
    }

    fn ensure_acyclic(&self) -> Result<()> {
        // Edge direction: dep -> task.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in &self.order {
            graph.add_node(name.as_str());
        }
        for name in &self.order {
            for dep in self.dependencies_of(name) {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(TaskwaveError::Cycle(format!(
                "cycle detected in task graph involving task '{}'",
                cycle.node_id()
            ))),
        }
    }

    /// Task names in submission order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub fn spec(&self, name: &str) -> Option<&TaskSpec> {
        self.nodes.get(name).map(|n| &n.spec)
    }

    /// Immediate dependencies that are part of this submission.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Dependencies resolved from successes recorded by earlier runs.
    pub fn satisfied_dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.satisfied_deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents within this submission.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}
