//! Unified error types for the stackwire workspace.
//!
//! Loading a descriptor fails with a [`ConfigError`]; resolving a loaded
//! descriptor fails with a [`ResolutionError`]. Both are terminal for the
//! current attempt and are wrapped by [`StackwireError`] so callers can
//! propagate either with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// A descriptor failed schema validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown resource kind, missing required field, duplicate name,
    /// or an otherwise invalid value.
    #[error("malformed descriptor: {message}")]
    Malformed {
        /// Description of the problem.
        message: String,
    },
}

/// A loaded descriptor could not be resolved into an output manifest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The reference graph contains a cycle.
    #[error("cyclic dependency between resources: {}", resources.join(", "))]
    Cycle {
        /// Resources participating in the cycle, in declaration order.
        resources: Vec<String>,
    },

    /// A reference targets a resource that is not declared.
    #[error("{resource} references undeclared resource \"{target}\"")]
    DanglingReference {
        /// Resource (or output binding) holding the reference.
        resource: String,
        /// Name of the missing target.
        target: String,
    },

    /// An output binding points at an attribute that was not materialized.
    #[error("output \"{output}\" points at {target}.{attribute}, which was not materialized")]
    UnresolvedOutput {
        /// Output binding name.
        output: String,
        /// Referenced resource.
        target: String,
        /// Referenced attribute.
        attribute: String,
    },

    /// A resource field points at an attribute the target does not expose.
    #[error("{resource} references {target}.{attribute}, which was not materialized")]
    UnresolvedReference {
        /// Resource holding the reference.
        resource: String,
        /// Referenced resource.
        target: String,
        /// Referenced attribute.
        attribute: String,
    },
}

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StackwireError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The descriptor is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The descriptor could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl StackwireError {
    /// Shorthand for a [`ConfigError::Malformed`] wrapped in a
    /// [`StackwireError`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Config(ConfigError::Malformed {
            message: message.into(),
        })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StackwireError>;
