// src/task/mod.rs

//! Task specifications.
//!
//! - [`spec`] holds the immutable [`TaskSpec`] and its builder.
//! - [`work`] is the blocking / suspending unit of work.
//! - [`invocation`] is what a unit of work receives when it runs.
//! - [`binding`] merges upstream results with declared named arguments.
//! - [`path`] parses dotted result paths.

pub mod binding;
pub mod invocation;
pub mod path;
pub mod spec;
pub mod work;

pub use binding::Bindings;
pub use invocation::Invocation;
pub use path::ResultPath;
pub use spec::{TaskSpec, TaskSpecBuilder};
pub use work::{Work, WorkFuture, WorkMode};
