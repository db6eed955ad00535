// src/store/mod.rs

//! Result store and aggregation.
//!
//! - [`results`] keeps successes and failures keyed by task name across runs.
//! - [`aggregate`] turns recorded successes into the nested output value.

pub mod aggregate;
pub mod results;

pub use aggregate::aggregate;
pub use results::ResultStore;
