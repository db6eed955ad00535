// src/config/validate.rs

use crate::config::model::{RawSettings, Settings};
use crate::errors::{Result, TaskwaveError};

/// Largest worker pool capacity accepted from configuration.
const MAX_WORKERS_LIMIT: usize = 1024;

impl TryFrom<RawSettings> for Settings {
    type Error = TaskwaveError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_pool(&raw)?;
        Ok(Settings {
            max_workers: raw.pool.max_workers,
            rerun_policy: raw.run.rerun_policy,
        })
    }
}

fn validate_pool(raw: &RawSettings) -> Result<()> {
    match raw.pool.max_workers {
        Some(0) => Err(TaskwaveError::ConfigError(
            "[pool].max_workers must be >= 1 (got 0)".to_string(),
        )),
        Some(n) if n > MAX_WORKERS_LIMIT => Err(TaskwaveError::ConfigError(format!(
            "[pool].max_workers must be <= {MAX_WORKERS_LIMIT} (got {n})"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RerunPolicy;

    fn parse(src: &str) -> Result<Settings> {
        let raw: RawSettings = toml::from_str(src)?;
        Settings::try_from(raw)
    }

    #[test]
    fn empty_document_uses_defaults() {
        let settings = parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.rerun_policy(), RerunPolicy::Always);
        assert_eq!(settings.max_workers(), None);
    }

    #[test]
    fn reads_both_sections() {
        let settings = parse(
            r#"
[pool]
max_workers = 3

[run]
rerun_policy = "skip-succeeded"
"#,
        )
        .unwrap();
        assert_eq!(settings.max_workers(), Some(3));
        assert_eq!(settings.rerun_policy(), RerunPolicy::SkipSucceeded);
    }

    #[test]
    fn zero_workers_is_rejected() {
        match parse("[pool]\nmax_workers = 0\n") {
            Err(TaskwaveError::ConfigError(msg)) => assert!(msg.contains("max_workers")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_toml_errors() {
        assert!(matches!(
            parse("[pool]\nthreads = 2\n"),
            Err(TaskwaveError::TomlError(_))
        ));
        assert!(matches!(
            parse("[run]\nrerun_policy = \"never\"\n"),
            Err(TaskwaveError::TomlError(_))
        ));
    }
}
