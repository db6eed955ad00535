// src/errors.rs

//! Crate-wide error types.
//!
//! - [`TaskwaveError`] covers everything that aborts a whole `run` call
//!   (structural validation failures) plus configuration / runtime setup.
//! - [`TaskError`] is the captured failure of a single unit of work. It is
//!   stored in the result store and never returned from `run`.

use std::any::Any;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskwaveError {
    #[error("Duplicate task name detected: {0}")]
    DuplicateName(String),

    #[error("Cycle detected in task graph: {0}")]
    Cycle(String),

    #[error("Task '{task}' has unknown dependency '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Malformed task specification: {0}")]
    MalformedSpec(String),

    #[error("Task '{task}' declares named argument '{key}' which shadows the dependency of the same name")]
    ArgumentCollision { task: String, key: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("cannot block on a run from inside an async runtime; use `run_async` instead")]
    NestedRuntime,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskwaveError {
    /// Whether this error was raised while validating a submission, before
    /// any task was launched.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TaskwaveError::DuplicateName(_)
                | TaskwaveError::Cycle(_)
                | TaskwaveError::UnknownDependency { .. }
                | TaskwaveError::MalformedSpec(_)
                | TaskwaveError::ArgumentCollision { .. }
        )
    }
}

/// Failure of a single task invocation.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The work function returned an error.
    #[error("{0:#}")]
    Failed(anyhow::Error),

    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("worker pool closed before the task could start")]
    PoolClosed,

    #[error("worker thread was cancelled before completion")]
    Cancelled,

    /// A dependency was ready but its value was not in the store.
    #[error("no recorded result for dependency '{0}'")]
    MissingInput(String),
}

impl TaskError {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        TaskError::Panicked(message)
    }

    pub(crate) fn from_join(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            TaskError::from_panic(err.into_panic())
        } else {
            TaskError::Cancelled
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskwaveError>;
