/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for collecting and resolving configuration sources.
 */

use crate::source::SourceOrigin;
use nodeconf_config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Errors that abort a scan. No partial configuration is returned.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// A configured directory is missing or cannot be listed.
    #[error("cannot read directory {}: {source}", path.display())]
    Directory { path: PathBuf, source: io::Error },

    /// A file found in a configured directory cannot be read.
    #[error("cannot read file {}: {source}", path.display())]
    ReadFile { path: PathBuf, source: io::Error },

    /// An explicit reader failed.
    #[error("cannot read {origin}: {source}")]
    ReadSource { origin: SourceOrigin, source: io::Error },

    /// The key filter rejected a source.
    #[error("filtering {origin} failed: {message}")]
    Filter { origin: SourceOrigin, message: String },

    /// A source that must be a configuration document could not be decoded.
    #[error("cannot decode {origin}: {source}")]
    Decode {
        origin: SourceOrigin,
        source: ConfigError,
    },

    /// Two documents could not be merged.
    #[error(transparent)]
    Merge(#[from] ConfigError),

    /// A `config_url` target could not be fetched.
    #[error("cannot fetch {url}: {source}")]
    Fetch { url: String, source: FetchError },

    /// A fetched `config_url` document could not be decoded.
    #[error("cannot decode document from {url}: {source}")]
    RemoteDecode { url: String, source: ConfigError },

    /// A `config_url` chain points back at a document already merged.
    #[error("config_url chain loops back to {url}")]
    ConfigUrlCycle { url: String },

    /// A `config_url` chain is longer than allowed.
    #[error("config_url chain exceeds {max_depth} links")]
    ConfigUrlDepth { max_depth: usize },
}

/// Errors reported by a [`crate::Fetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The fetcher has nothing to serve for this URL.
    #[error("no document available at {url}")]
    Unavailable { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeconf_config::ValueKind;

    #[test]
    fn test_merge_error_is_transparent() {
        let err = CollectorError::from(ConfigError::KindMismatch {
            base: ValueKind::Mapping,
            overlay: ValueKind::Sequence,
        });
        assert_eq!(err.to_string(), "cannot merge mapping with sequence");
    }

    #[test]
    fn test_messages_name_the_origin() {
        let err = CollectorError::Decode {
            origin: SourceOrigin::Reader(2),
            source: ConfigError::NotAMapping {
                kind: ValueKind::String,
            },
        };
        assert_eq!(
            err.to_string(),
            "cannot decode reader #2: configuration must be a mapping, found string"
        );

        let err = CollectorError::Fetch {
            url: "http://127.0.0.1/a.yaml".to_string(),
            source: FetchError::Status {
                url: "http://127.0.0.1/a.yaml".to_string(),
                status: 404,
            },
        };
        assert_eq!(
            err.to_string(),
            "cannot fetch http://127.0.0.1/a.yaml: http://127.0.0.1/a.yaml returned status 404"
        );
    }
}
