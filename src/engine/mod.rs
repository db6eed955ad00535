// src/engine/mod.rs

//! Run loop and public scheduler API.
//!
//! - [`options`] holds construction-time configuration (worker pool,
//!   cooperative runtime, logger, settings).
//! - [`scheduler`] owns the result store and drives runs wave by wave.
//! - [`retry`] exposes failed / blocked tasks and resubmission helpers.

pub mod options;
pub mod retry;
pub mod scheduler;

pub use options::SchedulerOptions;
pub use scheduler::Scheduler;
