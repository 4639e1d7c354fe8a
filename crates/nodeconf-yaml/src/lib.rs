/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Untyped YAML value tree used by the nodeconf collector.
 */

//! # nodeconf-yaml
//!
//! Decoding of provisioning documents into an untyped [`Value`] tree, and the
//! canonical writer that turns a tree back into text.
//!
//! ## Design
//!
//! [`Value`] is a closed sum type (null, bool, number, string, sequence,
//! mapping) so that every consumer can match kinds exhaustively. Mappings
//! keep insertion order ([`Mapping`] is an `IndexMap`); the writer sorts keys,
//! so insertion order never leaks into the output.
//!
//! JSON is accepted as-is since it is a subset of YAML.
//!
//! ## Example
//!
//! ```rust
//! use nodeconf_yaml::{parse, to_yaml_string};
//!
//! let value = parse("name: Mario\ninfo: {job: plumber}").unwrap();
//! assert_eq!(to_yaml_string(&value), "info:\n    job: plumber\nname: Mario\n");
//! ```

mod emit;
mod error;
mod parser;
mod value;

pub use emit::{mapping_to_yaml_string, to_yaml_string};
pub use error::{Error, Result};
pub use parser::{parse, parse_bytes};
pub use value::{Mapping, Number, Value, ValueKind};
