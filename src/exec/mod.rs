// src/exec/mod.rs

//! Wave execution layer.
//!
//! - [`pool`] is the bounded worker pool that blocking work runs on.
//! - [`invoke`] runs a single prepared task (blocking or suspending) and
//!   captures its outcome, panics included.
//! - [`wave`] launches a whole wave concurrently and waits for every task
//!   in it to settle.

pub mod invoke;
pub mod pool;
pub mod wave;

pub use invoke::{PreparedTask, TaskCompletion, invoke};
pub use pool::WorkerPool;
pub use wave::execute_wave;
