/*
 * header.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Recognition of provisioning document headers.
//!
//! A blob is a configuration document only if one of the
//! [`RECOGNIZED_HEADERS`] appears as a line in its leading run of blank
//! lines and comments. Comment lines above the header (including a
//! `## template: jinja` marker) are skipped, so templated files and files
//! with a preamble are still recognized.

/// Header written by [`crate::Config`]'s `Display` implementation.
pub const CLOUD_CONFIG_HEADER: &str = "#cloud-config";

/// Accepted header lines.
pub const RECOGNIZED_HEADERS: [&str; 3] = [CLOUD_CONFIG_HEADER, "#kairos-config", "#node-config"];

/// Marker line left by templating tools above the header.
pub const TEMPLATE_MARKER: &str = "## template: jinja";

/// Check whether `content` begins with a recognized header.
///
/// # Examples
///
/// ```rust
/// use nodeconf_config::has_recognized_header;
///
/// assert!(has_recognized_header(b"## template: jinja\n#cloud-config\nfoo: bar\n"));
/// assert!(!has_recognized_header(b"foo: bar\n#cloud-config\n"));
/// ```
pub fn has_recognized_header(content: &[u8]) -> bool {
    recognized_header(content).is_some()
}

/// Return the header line that makes `content` a configuration document.
pub fn recognized_header(content: &[u8]) -> Option<&'static str> {
    let lossy = String::from_utf8_lossy(content);
    let text = lossy.strip_prefix('\u{feff}').unwrap_or(&*lossy);

    for line in text.lines() {
        let line = line.trim_end();
        if let Some(header) = RECOGNIZED_HEADERS.into_iter().find(|h| *h == line) {
            return Some(header);
        }
        if line.trim_start().is_empty() || line == TEMPLATE_MARKER || line.starts_with('#') {
            continue;
        }
        return None;
    }
    None
}
