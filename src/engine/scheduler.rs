// src/engine/scheduler.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Runtime;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::dag::{TaskGraph, WavePlanner};
use crate::engine::options::SchedulerOptions;
use crate::errors::{Result, TaskwaveError};
use crate::exec::{PreparedTask, TaskCompletion, WorkerPool, execute_wave};
use crate::store::{ResultStore, aggregate};
use crate::task::TaskSpec;
use crate::types::{RerunPolicy, TaskName, Value};

/// Runs submitted task sets wave by wave and keeps their results.
///
/// Owns:
/// - the [`ResultStore`], shared by every run until [`Scheduler::reset`]
/// - the worker pool used by blocking work
/// - (for the blocking [`Scheduler::run`] entry point) a current-thread
///   tokio runtime acting as the cooperative scheduler
///
/// The store is only written by the run loop between waves, so no lock is
/// involved.
pub struct Scheduler {
    options: SchedulerOptions,
    store: ResultStore,
    /// Tasks submitted earlier that never became ready.
    pub(crate) blocked: BTreeMap<TaskName, TaskSpec>,
    pool: Option<Arc<WorkerPool>>,
    runtime: Option<Arc<Runtime>>,
    run_counter: u64,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("options", &self.options)
            .field("store", &self.store)
            .field("blocked", &self.blocked.keys().collect::<Vec<_>>())
            .field("run_counter", &self.run_counter)
            .finish_non_exhaustive()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_options(SchedulerOptions::default())
    }

    pub fn with_options(options: SchedulerOptions) -> Self {
        Self {
            options,
            store: ResultStore::new(),
            blocked: BTreeMap::new(),
            pool: None,
            runtime: None,
            run_counter: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.options.settings
    }

    /// Flat results and errors of every run so far.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Number of `run` calls that passed validation.
    pub fn run_count(&self) -> u64 {
        self.run_counter
    }

    /// Validate `tasks` and return the wave layering they would run in if
    /// every task succeeded. Nothing is executed.
    pub fn plan(&self, tasks: Vec<TaskSpec>) -> Result<Vec<Vec<TaskName>>> {
        let graph = TaskGraph::build(tasks, |dep| self.store.has_succeeded(dep))?;
        Ok(graph.waves())
    }

    /// Blocking entry point: validate and execute `tasks`, returning the
    /// aggregate of every recorded success.
    ///
    /// Must not be called from inside a tokio runtime; use
    /// [`Scheduler::run_async`] there.
    pub fn run(&mut self, tasks: Vec<TaskSpec>) -> Result<Value> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(TaskwaveError::NestedRuntime);
        }

        match self.options.runtime.clone() {
            Some(handle) => handle.block_on(self.run_async(tasks)),
            None => {
                let runtime = self.owned_runtime()?;
                runtime.block_on(self.run_async(tasks))
            }
        }
    }

    /// Async entry point. Suspending work is polled on the runtime driving
    /// this future.
    ///
    /// Only structural errors are returned; task failures are recorded in
    /// the store and reported by [`Scheduler::failed_tasks`].
    pub async fn run_async(&mut self, tasks: Vec<TaskSpec>) -> Result<Value> {
        match self.options.logger.clone() {
            Some(logger) => self.run_waves(tasks).with_subscriber(logger).await,
            None => self.run_waves(tasks).await,
        }
    }

    /// Clear results, errors and blocked tasks, and release the worker pool.
    ///
    /// A pool created by this scheduler is closed; a caller-supplied pool is
    /// only detached. The next run acquires a pool again.
    pub fn reset(&mut self) {
        self.store.clear();
        self.blocked.clear();

        if let Some(pool) = self.pool.take() {
            if self.options.worker_pool.is_none() {
                pool.close();
            }
        }

        info!("scheduler reset; results, errors and worker pool released");
    }

    async fn run_waves(&mut self, tasks: Vec<TaskSpec>) -> Result<Value> {
        let started = Instant::now();

        let graph = TaskGraph::build(tasks, |dep| self.store.has_succeeded(dep))?;
        self.run_counter += 1;
        let run_id = self.run_counter;
        let policy = self.options.settings.rerun_policy();

        info!(run_id, tasks = graph.len(), "starting task graph run");

        let pool = self.worker_pool()?;
        let mut planner = WavePlanner::new(&graph);
        let mut wave_no = 0usize;

        while let Some(wave) = planner.next_wave() {
            wave_no += 1;
            debug!(run_id, wave = wave_no, tasks = ?wave, "launching wave");

            let mut launch = Vec::with_capacity(wave.len());
            let mut unlaunched = Vec::new();

            for name in &wave {
                let Some(spec) = graph.spec(name) else {
                    continue;
                };

                if policy == RerunPolicy::SkipSucceeded {
                    if let Some(value) = self.store.value(name).cloned() {
                        debug!(task = %name, "reusing recorded result; not invoking");
                        // Re-record under the submitted spec so its result path applies.
                        self.store.record(spec, Ok(value));
                        self.blocked.remove(name);
                        planner.mark_succeeded(name);
                        continue;
                    }
                }

                match PreparedTask::prepare(spec, |dep| self.store.value(dep)) {
                    Ok(task) => launch.push(task),
                    Err(err) => unlaunched.push(TaskCompletion::unlaunched(name.clone(), err)),
                }
            }

            let mut completions = execute_wave(launch, &pool).await;
            completions.extend(unlaunched);

            // Barrier passed: every task of this wave has settled.
            for completion in completions {
                let Some(spec) = graph.spec(&completion.name) else {
                    continue;
                };
                let succeeded = completion.outcome.is_ok();

                self.store.record(spec, completion.outcome);
                self.blocked.remove(&completion.name);

                if succeeded {
                    planner.mark_succeeded(&completion.name);
                } else {
                    planner.mark_failed(&completion.name);
                }
            }
        }

        let never_ready = planner.never_ready();
        for name in &never_ready {
            if self.store.has_failed(name) {
                continue;
            }
            // A success from an earlier run was computed from upstream
            // values that just failed, so it no longer counts.
            if self.store.forget(name) {
                debug!(task = %name, "discarding stale result of blocked task");
            }
            if let Some(spec) = graph.spec(name) {
                self.blocked.insert(name.clone(), spec.clone());
            }
        }
        if !never_ready.is_empty() {
            warn!(
                run_id,
                tasks = ?never_ready,
                "tasks not run because a dependency failed"
            );
        }

        let elapsed = started.elapsed();
        info!(
            run_id,
            waves = wave_no,
            succeeded = self.store.success_count(),
            failed = self.store.failure_count(),
            blocked = never_ready.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "executed tasks in {:.2}s",
            elapsed.as_secs_f64()
        );

        Ok(aggregate(&self.store))
    }

    fn worker_pool(&mut self) -> Result<Arc<WorkerPool>> {
        if let Some(pool) = &self.pool {
            return Ok(Arc::clone(pool));
        }

        let pool = match &self.options.worker_pool {
            Some(shared) => Arc::clone(shared),
            None => {
                let pool = match self.options.settings.max_workers() {
                    Some(n) => WorkerPool::new(n)?,
                    None => WorkerPool::with_default_capacity(),
                };
                debug!(capacity = pool.capacity(), "created worker pool");
                Arc::new(pool)
            }
        };

        self.pool = Some(Arc::clone(&pool));
        Ok(pool)
    }

    fn owned_runtime(&mut self) -> Result<Arc<Runtime>> {
        if let Some(runtime) = &self.runtime {
            return Ok(Arc::clone(runtime));
        }

        let runtime = Arc::new(
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .thread_name("taskwave-worker")
                .build()?,
        );
        debug!("created cooperative runtime");

        self.runtime = Some(Arc::clone(&runtime));
        Ok(runtime)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Dropping a runtime inside an async context panics; shut it down
        // without waiting instead.
        if let Some(runtime) = self.runtime.take() {
            if let Ok(runtime) = Arc::try_unwrap(runtime) {
                runtime.shutdown_background();
            }
        }
    }
}
