//! Error types for settings loading.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the settings crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A single problem found while validating the raw variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldIssue {
    /// The variable was set in neither the environment nor the env file.
    Missing {
        /// Name of the environment variable.
        var: &'static str,
    },
    /// The variable was present but could not be coerced to its declared type.
    Invalid {
        /// Name of the environment variable.
        var: &'static str,
        /// The raw value that was rejected.
        value: String,
        /// Description of the expected type.
        expected: &'static str,
    },
}

impl FieldIssue {
    /// Returns the environment variable this issue refers to.
    #[must_use]
    pub const fn var(&self) -> &'static str {
        match self {
            Self::Missing { var } | Self::Invalid { var, .. } => var,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { var } => write!(f, "`{var}` is required but not set"),
            Self::Invalid {
                var,
                value,
                expected,
            } => write!(f, "`{var}` must be {expected}, got {value:?}"),
        }
    }
}

/// Errors emitted while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required variables were missing or malformed.
    #[error("invalid settings: {}", join_issues(.issues))]
    Validation {
        /// Every offending variable, in field declaration order.
        issues: Vec<FieldIssue>,
    },

    /// The env file exists but could not be read or parsed.
    #[error("failed to read env file {}: {reason}", .path.display())]
    EnvFile {
        /// Location of the env file.
        path: PathBuf,
        /// Human-readable reason for the failure.
        reason: String,
    },
}

impl ConfigError {
    /// Convenience constructor for env file failures.
    #[must_use]
    pub fn env_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::EnvFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the field issues carried by a validation error.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::Validation { issues } => issues,
            Self::EnvFile { .. } => &[],
        }
    }

    /// Returns `true` if `var` was reported as missing.
    #[must_use]
    pub fn is_missing(&self, var: &str) -> bool {
        self.issues()
            .iter()
            .any(|issue| matches!(issue, FieldIssue::Missing { var: v } if *v == var))
    }

    /// Returns `true` if `var` was reported as present but malformed.
    #[must_use]
    pub fn is_invalid(&self, var: &str) -> bool {
        self.issues()
            .iter()
            .any(|issue| matches!(issue, FieldIssue::Invalid { var: v, .. } if *v == var))
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
