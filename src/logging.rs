// src/logging.rs

//! Log output for the `taskwave` binary.
//!
//! The level is taken from `--log-level`, then the `TASKWAVE_LOG`
//! environment variable, then defaults to `info`. Everything goes to stderr;
//! stdout only carries the aggregate JSON.
//!
//! Library users normally pass their own subscriber through
//! [`SchedulerOptions::with_logger`](crate::engine::SchedulerOptions::with_logger)
//! instead.

use std::str::FromStr;

use anyhow::{Result, anyhow};
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when no CLI level is given.
pub const LOG_ENV_VAR: &str = "TASKWAVE_LOG";

/// Install the process-wide subscriber. Call once, early in `main`.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(cli_level, env_value.as_deref());

    tracing::dispatcher::set_global_default(stderr_dispatch(level))
        .map_err(|e| anyhow!("installing global tracing subscriber: {e}"))
}

/// Plain stderr formatter at `level`. Thread names are shown so worker-pool
/// output can be told apart from the run loop.
pub fn stderr_dispatch(level: Level) -> Dispatch {
    Dispatch::new(
        fmt()
            .with_max_level(level)
            .with_target(true)
            .with_thread_names(true)
            .with_writer(std::io::stderr)
            .finish(),
    )
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    if let Some(lvl) = cli_level {
        return lvl.into();
    }
    // Unparseable values fall back silently; logging isn't up yet.
    env_value
        .and_then(|v| Level::from_str(v.trim()).ok())
        .unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_then_environment_then_default() {
        assert_eq!(resolve_level(Some(LogLevel::Warn), Some("trace")), Level::WARN);
        assert_eq!(resolve_level(None, Some(" Debug ")), Level::DEBUG);
        assert_eq!(resolve_level(None, Some("loud")), Level::INFO);
        assert_eq!(resolve_level(None, None), Level::INFO);
    }
}
