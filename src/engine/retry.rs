// src/engine/retry.rs

//! Resubmission of failed work.
//!
//! Nothing is retried automatically. The scheduler exposes what failed (and
//! what never ran because of it) so callers can resubmit exactly those
//! specs; dependency values produced by earlier runs are read from the same
//! result store.

use tracing::{info, warn};

use crate::engine::scheduler::Scheduler;
use crate::errors::Result;
use crate::store::aggregate;
use crate::task::TaskSpec;
use crate::types::Value;

impl Scheduler {
    /// Specs of every task currently recorded as failed.
    pub fn failed_tasks(&self) -> Vec<TaskSpec> {
        self.store().failed_specs()
    }

    /// Specs that were never launched in the run they were last submitted to,
    /// because an upstream dependency failed.
    ///
    /// Tasks already listed by [`Scheduler::failed_tasks`] are not repeated.
    pub fn blocked_tasks(&self) -> Vec<TaskSpec> {
        self.blocked.values().cloned().collect()
    }

    /// Resubmit [`Scheduler::failed_tasks`] until nothing is failing or
    /// `max_attempts` resubmissions have been made.
    pub async fn retry_failed(&mut self, max_attempts: usize) -> Result<Value> {
        for attempt in 1..=max_attempts {
            let failed = self.failed_tasks();
            if failed.is_empty() {
                break;
            }

            info!(
                attempt,
                max_attempts,
                tasks = ?names(&failed),
                "re-trying failed tasks"
            );
            self.run_async(failed).await?;
        }

        Ok(aggregate(self.store()))
    }

    /// Run `tasks`, then resubmit failed and blocked tasks until everything
    /// succeeded or `max_attempts` resubmissions have been made.
    pub async fn run_until_settled(
        &mut self,
        tasks: Vec<TaskSpec>,
        max_attempts: usize,
    ) -> Result<Value> {
        let mut output = self.run_async(tasks).await?;

        for attempt in 1..=max_attempts {
            let mut resubmit = self.failed_tasks();
            resubmit.extend(self.blocked_tasks());
            if resubmit.is_empty() {
                return Ok(output);
            }

            info!(
                attempt,
                max_attempts,
                tasks = ?names(&resubmit),
                "re-trying failed and blocked tasks"
            );
            output = self.run_async(resubmit).await?;
        }

        let remaining = self.failed_tasks().len() + self.blocked.len();
        if remaining > 0 {
            warn!(remaining, max_attempts, "retry attempts exhausted");
        }

        Ok(output)
    }
}

fn names(specs: &[TaskSpec]) -> Vec<&str> {
    specs.iter().map(|s| s.name()).collect()
}
