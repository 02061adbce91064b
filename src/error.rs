//! Domain-specific error types for azinfra.
//!
//! `AzinfraError` is a `thiserror`-based enum covering the failure modes of
//! the translation layer. Library functions return `Result<T, AzinfraError>`
//! so callers can match on the kind of failure, while the CLI layer wraps
//! them into `anyhow::Error` with additional context.

use std::io;

/// Formats an IO error kind into a human-readable message.
///
/// Common kinds get a stable message (e.g., "I/O error: not found") instead
/// of the OS-level text. Other kinds fall back to the error's own message.
pub(crate) fn io_error_kind_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "I/O error: not found".to_string(),
        io::ErrorKind::PermissionDenied => "I/O error: permission denied".to_string(),
        io::ErrorKind::IsADirectory => "I/O error: is a directory".to_string(),
        _ => format!("I/O error: {}", err),
    }
}

/// Domain-specific error type for azinfra.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AzinfraError {
    /// The infrastructure configuration contradicts itself or lacks a
    /// required value (e.g., a VNet with neither CIDR nor resource group).
    #[error("validation error: {0}")]
    Validation(String),

    /// Terraform state could not be decoded into the expected flat shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A manifest or credentials file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O operation failed with contextual information.
    #[error("{context}: {message}")]
    Io {
        /// The path or operation that failed.
        context: String,
        /// Human-readable description derived from [`io_error_kind_message`].
        message: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl AzinfraError {
    /// Creates an `Io` variant with the `message` derived from `source`.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: io_error_kind_message(&source),
            source,
        }
    }
}
