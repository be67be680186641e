//! Error types for compspec

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::SchemaViolation;
use crate::generator::Shell;

/// Result type alias for compspec operations
pub type Result<T> = std::result::Result<T, CompspecError>;

/// Main error type for compspec
///
/// Every variant is fatal: generation either fully succeeds or is refused.
#[derive(Error, Debug)]
pub enum CompspecError {
    /// The document parsed but does not match the configuration schema
    #[error("invalid configuration: {}", join_violations(.0))]
    Schema(Vec<SchemaViolation>),

    /// The requested target shell has no back end
    #[error("unsupported shell '{}' (supported: {})", .0, supported_shells())]
    UnsupportedShell(String),

    /// The source text is not structured data at all
    #[error("malformed document")]
    MalformedDocument(#[from] serde_yaml::Error),

    /// The source could not be read
    #[error("cannot read '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn supported_shells() -> String {
    Shell::ALL
        .iter()
        .map(|shell| shell.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CompspecError {
    /// Schema violations carried by this error, if any
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            CompspecError::Schema(violations) => violations,
            _ => &[],
        }
    }
}
