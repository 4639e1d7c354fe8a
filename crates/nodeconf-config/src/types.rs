/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for configuration operations.

use nodeconf_yaml::ValueKind;
use thiserror::Error;

/// Result type alias for nodeconf-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Two values of incompatible kinds met at the same position.
    #[error("cannot merge {base} with {overlay}")]
    KindMismatch {
        /// Kind of the value being merged into
        base: ValueKind,
        /// Kind of the overriding value
        overlay: ValueKind,
    },

    /// A document decoded to something other than a mapping.
    #[error("configuration must be a mapping, found {kind}")]
    NotAMapping { kind: ValueKind },

    /// The document is not valid YAML or JSON.
    #[error(transparent)]
    Decode(#[from] nodeconf_yaml::Error),

    /// A dotted query path does not resolve.
    #[error("path not found: {path}")]
    PathNotFound { path: String },
}
