// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod demo;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod store;
pub mod task;
pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::engine::SchedulerOptions;

pub use crate::engine::Scheduler;
pub use crate::errors::{TaskError, TaskwaveError};
pub use crate::exec::WorkerPool;
pub use crate::task::{Invocation, TaskSpec, Work};
pub use crate::types::{RerunPolicy, Value};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading
/// - the demo pipeline
/// - the scheduler and its retry loop
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let tasks = demo::pipeline(
        Duration::from_millis(args.delay_ms),
        &args.fail_first_attempt,
    )?;

    let mut scheduler = Scheduler::with_options(SchedulerOptions::from_settings(settings));

    if args.dry_run {
        print_dry_run(&scheduler, tasks)?;
        return Ok(());
    }

    let output = scheduler.run_until_settled(tasks, args.retries).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    let failed = scheduler.failed_tasks();
    let blocked = scheduler.blocked_tasks();
    if !failed.is_empty() || !blocked.is_empty() {
        for (name, err) in scheduler.store().errors() {
            error!(task = %name, error = %err, "task still failing after retries");
        }
        bail!(
            "{} task(s) failed and {} task(s) never ran",
            failed.len(),
            blocked.len()
        );
    }

    info!("all tasks executed successfully");
    Ok(())
}

/// Explicit `--config` path, else `Taskwave.toml` if it exists, else defaults.
fn load_settings(explicit: Option<&str>) -> Result<Settings> {
    let path = match explicit {
        Some(p) => Some(PathBuf::from(p)),
        None => Some(default_config_path()).filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading settings");
            Ok(load_and_validate(&path)?)
        }
        None => Ok(Settings::default()),
    }
}

/// Simple dry-run output: print tasks, their dependencies and the wave plan.
fn print_dry_run(scheduler: &Scheduler, tasks: Vec<TaskSpec>) -> Result<()> {
    println!("taskwave dry-run");
    println!(
        "  settings.max_workers = {}",
        scheduler
            .settings()
            .max_workers()
            .map_or_else(|| format!("default ({})", WorkerPool::default_capacity()), |n| n.to_string())
    );
    println!(
        "  settings.rerun_policy = {:?}",
        scheduler.settings().rerun_policy()
    );
    println!();

    println!("tasks ({}):", tasks.len());
    for task in &tasks {
        println!("  - {}", task.name());
        println!("      mode: {:?}", task.mode());
        if !task.dependencies().is_empty() {
            println!("      after: {:?}", task.dependencies());
        }
        if let Some(path) = task.result_path() {
            println!("      result_path: {path}");
        }
    }
    println!();

    let waves = scheduler.plan(tasks)?;
    println!("waves ({}):", waves.len());
    for (i, wave) in waves.iter().enumerate() {
        println!("  {}: {}", i + 1, wave.join(", "));
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
