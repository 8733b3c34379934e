//! Error types for the bopm CLI.

use thiserror::Error;

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error type.
///
/// Every variant is fatal at the point of detection: configuration and
/// resource failures terminate before any pricing runs, and a validation
/// failure surfaces after the report is written so the process exits
/// non-zero with the mismatch count.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration table error (carries file and line context).
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Batch expansion error.
    #[error("batch expansion error: {0}")]
    Batch(#[from] bopm_exec::generator::BatchError),

    /// Software executor error.
    #[error("execution error: {0}")]
    Executor(#[from] bopm_exec::executor::ExecutorError),

    /// Accelerator harness error.
    #[error("accelerator error: {0}")]
    Accel(#[from] bopm_exec::accel::AccelError),

    /// Report IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unrecognised run mode.
    #[error("unsupported mode '{0}': expected sw or hw")]
    UnknownMode(String),

    /// Software and accelerated results diverged beyond tolerance.
    #[error("{mismatches} result(s) diverged between software and accelerated runs")]
    ValidationFailed {
        /// Total number of diverging results.
        mismatches: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mode_display() {
        let err = CliError::UnknownMode("gpu".to_string());
        assert!(err.to_string().contains("gpu"));
    }

    #[test]
    fn test_validation_failed_display() {
        let err = CliError::ValidationFailed { mismatches: 3 };
        assert!(err.to_string().contains('3'));
    }
}
