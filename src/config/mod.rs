// src/config/mod.rs

//! Scheduler settings.
//!
//! - [`model`] is the TOML shape (`RawSettings`) and the validated
//!   [`Settings`].
//! - [`validate`] turns one into the other.
//! - [`loader`] reads settings from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{PoolSection, RawSettings, RunSection, Settings};
