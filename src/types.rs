use std::str::FromStr;
use serde::Deserialize;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Dynamic value passed into and produced by units of work.
pub use serde_json::Value;

/// What `run` does with a submitted task that already has a recorded success.
///
/// - `Always`: invoke it again and overwrite the stored value (default).
/// - `SkipSucceeded`: reuse the stored value and do not invoke the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RerunPolicy {
    Always,
    SkipSucceeded,
}

impl Default for RerunPolicy {
    fn default() -> Self {
        RerunPolicy::Always
    }
}

impl FromStr for RerunPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(RerunPolicy::Always),
            "skip-succeeded" | "skip_succeeded" => Ok(RerunPolicy::SkipSucceeded),
            other => Err(format!(
                "invalid rerun_policy: {other} (expected \"always\" or \"skip-succeeded\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerun_policy_parses_both_spellings() {
        assert_eq!("always".parse::<RerunPolicy>(), Ok(RerunPolicy::Always));
        assert_eq!(
            " Skip-Succeeded ".parse::<RerunPolicy>(),
            Ok(RerunPolicy::SkipSucceeded)
        );
        assert_eq!(
            "skip_succeeded".parse::<RerunPolicy>(),
            Ok(RerunPolicy::SkipSucceeded)
        );
        assert!("sometimes".parse::<RerunPolicy>().is_err());
    }
}
