// src/config/model.rs

use serde::Deserialize;

use crate::types::RerunPolicy;

/// Settings as read from a TOML file.
///
/// ```toml
/// [pool]
/// max_workers = 8
///
/// [run]
/// rerun_policy = "skip-succeeded"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub pool: PoolSection,

    #[serde(default)]
    pub run: RunSection,
}

/// `[pool]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolSection {
    /// Capacity of the default worker pool. Unset means
    /// `min(32, available_parallelism + 4)`.
    #[serde(default)]
    pub max_workers: Option<usize>,
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    #[serde(default)]
    pub rerun_policy: RerunPolicy,
}

/// Validated settings. Construct via `TryFrom<RawSettings>` or `Default`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub(crate) max_workers: Option<usize>,
    pub(crate) rerun_policy: RerunPolicy,
}

impl Settings {
    pub fn max_workers(&self) -> Option<usize> {
        self.max_workers
    }

    pub fn rerun_policy(&self) -> RerunPolicy {
        self.rerun_policy
    }

    pub fn with_rerun_policy(mut self, policy: RerunPolicy) -> Self {
        self.rerun_policy = policy;
        self
    }
}
