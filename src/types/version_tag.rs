// ABOUTME: Operator-supplied release version validation.
// ABOUTME: Enforces the registry tag grammar before any image reference is built.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionTagError {
    #[error("version tag cannot be empty")]
    Empty,

    #[error("version tag exceeds maximum length of 128 characters")]
    TooLong,

    #[error("version tag cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in version tag: '{0}'")]
    InvalidChar(char),
}

/// A validated release version, scoped to a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(value: &str) -> Result<Self, VersionTagError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(VersionTagError::Empty);
        }

        if value.len() > 128 {
            return Err(VersionTagError::TooLong);
        }

        let first = value.chars().next().expect("non-empty after trim");
        if !first.is_ascii_alphanumeric() && first != '_' {
            return Err(VersionTagError::InvalidStart(first));
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '.' && c != '_' && c != '-' {
                return Err(VersionTagError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
