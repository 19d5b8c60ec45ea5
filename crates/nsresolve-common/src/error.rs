//! Unified error types for the nsresolve workspace.
//!
//! Every variant is terminal to the call that produced it. None of them
//! describe transient faults, so callers are not expected to retry.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum NsResolveError {
    /// The namespace specifier is neither empty, a path, nor `inode:<n>`.
    #[error("invalid netns specifier: {specifier}")]
    InvalidSpecifier {
        /// The offending specifier as supplied by the caller.
        specifier: String,
    },

    /// Two inputs were supplied that cannot be used together.
    #[error("conflicting configuration: {message}")]
    ConfigConflict {
        /// Description of the conflict.
        message: String,
    },

    /// A namespace handle could not be opened, read, or stat'ed.
    #[error("network namespace {path} unavailable: {source}")]
    NamespaceUnavailable {
        /// Namespace object that was being accessed.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The kernel refused to move the thread into the target namespace.
    #[error("failed to enter network namespace {path}: {source}")]
    NamespaceSwitchFailed {
        /// Namespace object the thread was being moved into.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The thread could not be moved back into its origin namespace.
    #[error("failed to restore network namespace {path}: {source}")]
    RestoreFailed {
        /// Origin namespace object.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// No interface with the given name exists in the active namespace.
    #[error("interface {name:?} not found: {source}")]
    InterfaceNotFound {
        /// Interface name that was looked up.
        name: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// An operation outside the namespace protocol failed.
    #[error("I/O error during {operation}: {source}")]
    Io {
        /// Short description of the failed operation.
        operation: &'static str,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization of a configuration record failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl NsResolveError {
    /// Returns a stable, machine-friendly name for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSpecifier { .. } => "invalid_specifier",
            Self::ConfigConflict { .. } => "config_conflict",
            Self::NamespaceUnavailable { .. } => "namespace_unavailable",
            Self::NamespaceSwitchFailed { .. } => "namespace_switch_failed",
            Self::RestoreFailed { .. } => "restore_failed",
            Self::InterfaceNotFound { .. } => "interface_not_found",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NsResolveError>;
