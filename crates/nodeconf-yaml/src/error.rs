/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for YAML decoding.

use std::fmt;

/// Result type alias for nodeconf-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    ParseError { message: String },

    /// Well-formed YAML that cannot be represented as a [`crate::Value`]
    InvalidStructure { message: String },

    /// Input bytes are not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError { message } => write!(f, "Parse error: {}", message),
            Error::InvalidStructure { message } => {
                write!(f, "Invalid YAML structure: {}", message)
            }
            Error::InvalidUtf8 => write!(f, "Document is not valid UTF-8"),
        }
    }
}

impl std::error::Error for Error {}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::ParseError {
            message: err.to_string(),
        }
    }
}
