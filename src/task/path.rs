// src/task/path.rs

use std::fmt;

use crate::errors::{Result, TaskwaveError};

/// Separator between segments of a result path.
pub const RESULT_PATH_DELIMITER: char = '.';

/// Dotted address of a task's value inside the aggregate (e.g. `"x.y"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPath {
    raw: String,
    segments: Vec<String>,
}

impl ResultPath {
    /// Parse a dotted path. Empty segments (`""`, `"x..y"`, `".x"`) are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<String> = raw
            .split(RESULT_PATH_DELIMITER)
            .map(|s| s.to_string())
            .collect();

        if segments.iter().any(|s| s.is_empty()) {
            return Err(TaskwaveError::MalformedSpec(format!(
                "result path '{raw}' contains an empty segment"
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Segments leading to the leaf (all but the last).
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for ResultPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_parents_and_leaf() {
        let path = ResultPath::parse("x.y.z").unwrap();
        assert_eq!(path.parents(), ["x".to_string(), "y".to_string()]);
        assert_eq!(path.leaf(), "z");

        let single = ResultPath::parse("top").unwrap();
        assert!(single.parents().is_empty());
        assert_eq!(single.leaf(), "top");
    }

    #[test]
    fn rejects_empty_segments() {
        for raw in ["", "x..y", ".x", "x."] {
            assert!(
                matches!(ResultPath::parse(raw), Err(TaskwaveError::MalformedSpec(_))),
                "{raw:?} should be rejected"
            );
        }
    }
}
