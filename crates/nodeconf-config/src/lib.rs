/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Deep merging of cloud-config documents.
 */

//! Configuration merging for provisioning documents.
//!
//! This crate holds the pieces of the collector that do no I/O: the deep
//! merge engine, the header check that decides whether a blob is a
//! configuration document at all, and the [`Config`] result type.
//!
//! # Merge rules
//!
//! [`merge`] combines a base value with an overlay value:
//!
//! - an overlay `null` resets the base to the empty value of its kind
//! - two sequences concatenate (base first, no deduplication)
//! - two mappings merge key by key, recursively
//! - two scalars: the overlay wins
//! - a container against a different kind is an error
//!
//! # Example
//!
//! ```rust
//! use nodeconf_config::Config;
//!
//! let mut config = Config::parse("#cloud-config\nname: Mario\n").unwrap();
//! config
//!     .merge_config(Config::parse("#cloud-config\nsurname: Bros\n").unwrap())
//!     .unwrap();
//!
//! assert_eq!(config.to_string(), "#cloud-config\n\nname: Mario\nsurname: Bros\n");
//! assert_eq!(config.query("surname").unwrap(), "Bros\n");
//! ```

mod config;
mod header;
mod merge;
mod types;

pub use config::{CONFIG_URL_KEY, Config};
pub use header::{
    CLOUD_CONFIG_HEADER, RECOGNIZED_HEADERS, TEMPLATE_MARKER, has_recognized_header,
    recognized_header,
};
pub use merge::{merge, merge_mappings};
pub use types::{ConfigError, Result};

pub use nodeconf_yaml::{Mapping, Number, Value, ValueKind};
