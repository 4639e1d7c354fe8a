/*
 * filter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Key filters applied to every raw source before it is decoded.
//!
//! A filter is any `Fn(&[u8]) -> Result<Vec<u8>, FilterError>`. It sees the
//! raw bytes, header included, and returns the bytes to decode in their
//! place.

use nodeconf_config::{Value, recognized_header};
use nodeconf_yaml::{Mapping, mapping_to_yaml_string};
use std::collections::HashSet;

/// Error type returned by filters.
pub type FilterError = Box<dyn std::error::Error + Send + Sync>;

/// Filter that keeps every key.
pub fn passthrough(content: &[u8]) -> Result<Vec<u8>, FilterError> {
    Ok(content.to_vec())
}

/// Filter that keeps only the listed top-level keys.
///
/// Input that does not decode to a mapping (junk files, binaries, scalar
/// documents) is passed through untouched, leaving it to the header check
/// and the decoder. The header line, if the input had one, is written back
/// in front of the filtered document.
///
/// ```rust
/// use nodeconf_collector::allow_keys;
///
/// let filter = allow_keys(&["config_url", "options"]);
/// let out = filter(b"#cloud-config\noptions: {a: 1}\nconsole: tty0\n").unwrap();
/// assert_eq!(out, b"#cloud-config\n\noptions:\n    a: 1\n");
/// ```
pub fn allow_keys(keys: &[&str]) -> impl Fn(&[u8]) -> Result<Vec<u8>, FilterError> + use<> {
    let allowed: HashSet<String> = keys.iter().map(|k| k.to_string()).collect();

    move |content: &[u8]| -> Result<Vec<u8>, FilterError> {
        let entries = match nodeconf_yaml::parse_bytes(content) {
            Ok(Value::Mapping(entries)) => entries,
            _ => return Ok(content.to_vec()),
        };

        let kept: Mapping = entries
            .into_iter()
            .filter(|(key, _)| allowed.contains(key))
            .collect();

        let mut out = String::new();
        if let Some(header) = recognized_header(content) {
            out.push_str(header);
            out.push_str("\n\n");
        }
        out.push_str(&mapping_to_yaml_string(&kept));
        Ok(out.into_bytes())
    }
}
