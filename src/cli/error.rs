//! CLI-level errors (wraps tree and config errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigLoadError;
use crate::errors::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Config(#[from] ConfigLoadError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tree file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Format { .. } => crate::exitcode::DATAERR,
            CliError::Config(_) => crate::exitcode::CONFIG,
            CliError::Tree(TreeError::InternalConsistency(_)) => crate::exitcode::SOFTWARE,
            CliError::Tree(_) => crate::exitcode::DATAERR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_errors_then_map_to_sysexits() {
        assert_eq!(
            CliError::InvalidArgs("x".into()).exit_code(),
            crate::exitcode::USAGE
        );
        assert_eq!(
            CliError::from(TreeError::DuplicateChild).exit_code(),
            crate::exitcode::DATAERR
        );
        assert_eq!(
            CliError::from(TreeError::InternalConsistency("x".into())).exit_code(),
            crate::exitcode::SOFTWARE
        );
    }
}
