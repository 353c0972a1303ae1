//! Unified error type for the poolcheck workspace.
//!
//! Test case bodies and the runner's outcomes use `anyhow`; everything
//! below them reports through [`PoolcheckError`].

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum PoolcheckError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An external command ran but did not behave as expected.
    #[error("command `{command}` failed with exit code {exit_code}: {stderr}")]
    Command {
        /// Full command line, program first.
        command: String,
        /// Exit code, or -1 if the process was killed by a signal.
        exit_code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The run's cancellation scope was cancelled before the operation started.
    #[error("operation cancelled")]
    Cancelled,

    /// A step of creating or replacing a test pool failed.
    #[error("{step} for pool {pool}")]
    Provision {
        /// Pool being provisioned.
        pool: String,
        /// The step that failed.
        step: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<PoolcheckError>,
    },

    /// A step of tearing down a test pool failed.
    #[error("{step} for pool {pool}")]
    Teardown {
        /// Pool being destroyed.
        pool: String,
        /// The step that failed.
        step: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<PoolcheckError>,
    },
}

impl PoolcheckError {
    /// Shorthand for a [`PoolcheckError::Config`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PoolcheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_error_exposes_its_cause() {
        let err = PoolcheckError::Provision {
            pool: "tank".into(),
            step: "zpool create",
            source: Box::new(PoolcheckError::config("boom")),
        };
        assert_eq!(err.to_string(), "zpool create for pool tank");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "invalid configuration: boom");
    }
}
