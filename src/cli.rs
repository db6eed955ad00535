// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskwave`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskwave",
    version,
    about = "Run a dependency-ordered pipeline of blocking and async tasks in concurrent waves.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a settings file (TOML).
    ///
    /// Default: `Taskwave.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// How many times failed (and blocked) tasks are resubmitted.
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub retries: usize,

    /// Simulated work duration of every demo task, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Make the named demo task fail on its first invocation (repeatable).
    #[arg(long, value_name = "TASK")]
    pub fail_first_attempt: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKWAVE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate and print the wave plan, but don't execute any task.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
