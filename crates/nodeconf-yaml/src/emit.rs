/*
 * emit.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Canonical YAML writer.
//!
//! The output is deterministic: mapping keys are sorted lexicographically,
//! block style is used throughout and nesting is indented by four spaces.
//! A mapping that is a sequence item starts on the dash line:
//!
//! ```yaml
//! stages:
//!     initramfs:
//!         - name: set hostname
//!           users:
//!             kairos:
//!                 passwd: kairos
//! ```

use crate::parser::resolve_plain;
use crate::{Mapping, Value};

const INDENT: usize = 4;

/// Serialize a value as a YAML document, always terminated by a newline.
pub fn to_yaml_string(value: &Value) -> String {
    let mut out = String::new();
    match inline_repr(value) {
        Some(text) => {
            out.push_str(&text);
            out.push('\n');
        }
        None => write_block(&mut out, value, 0),
    }
    out
}

/// Serialize a mapping as a YAML document. An empty mapping is `{}`.
pub fn mapping_to_yaml_string(entries: &Mapping) -> String {
    if entries.is_empty() {
        return "{}\n".to_string();
    }
    let mut out = String::new();
    write_mapping(&mut out, entries, 0, INDENT, false);
    out
}

/// Text for values written on the same line as their key or dash: scalars
/// and empty containers. `None` for values that need a block.
fn inline_repr(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(format_string(s)),
        Value::Sequence(items) if items.is_empty() => Some("[]".to_string()),
        Value::Mapping(entries) if entries.is_empty() => Some("{}".to_string()),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn write_block(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Mapping(entries) => write_mapping(out, entries, indent, indent + INDENT, false),
        Value::Sequence(items) => write_sequence(out, items, indent, false),
        _ => {}
    }
}

/// Write mapping entries with keys at `key_indent`. Block values go to
/// `child_indent`. With `inline_first` the first key continues the current
/// line (after a sequence dash).
fn write_mapping(
    out: &mut String,
    entries: &Mapping,
    key_indent: usize,
    child_indent: usize,
    inline_first: bool,
) {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();

    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 || !inline_first {
            push_indent(out, key_indent);
        }
        out.push_str(&format_string(key));
        out.push(':');

        let value = &entries[key];
        match inline_repr(value) {
            Some(text) => {
                out.push(' ');
                out.push_str(&text);
                out.push('\n');
            }
            None => {
                out.push('\n');
                write_block(out, value, child_indent);
            }
        }
    }
}

fn write_sequence(out: &mut String, items: &[Value], dash_indent: usize, inline_first: bool) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 || !inline_first {
            push_indent(out, dash_indent);
        }
        out.push_str("- ");

        match (inline_repr(item), item) {
            (Some(text), _) => {
                out.push_str(&text);
                out.push('\n');
            }
            (None, Value::Mapping(entries)) => {
                write_mapping(out, entries, dash_indent + 2, dash_indent + INDENT, true);
            }
            (None, Value::Sequence(nested)) => {
                write_sequence(out, nested, dash_indent + 2, true);
            }
            (None, _) => {}
        }
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

/// Render a string scalar, quoting only when the plain form would not read
/// back as the same string.
fn format_string(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    if s.chars().any(char::is_control) {
        return double_quoted(s);
    }
    if !matches!(resolve_plain(s), Value::String(_)) || is_yaml11_bool(s) {
        return double_quoted(s);
    }
    if needs_single_quotes(s) {
        return format!("'{}'", s.replace('\'', "''"));
    }
    s.to_string()
}

/// Words older YAML readers take as booleans.
fn is_yaml11_bool(s: &str) -> bool {
    matches!(
        s,
        "y" | "Y"
            | "yes"
            | "Yes"
            | "YES"
            | "n"
            | "N"
            | "no"
            | "No"
            | "NO"
            | "on"
            | "On"
            | "ON"
            | "off"
            | "Off"
            | "OFF"
    )
}

fn needs_single_quotes(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    let second = chars.next();

    let indicator = match first {
        '-' | '?' | ':' => second.is_none_or(|c| c == ' '),
        ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%'
        | '@' | '`' => true,
        _ => false,
    };

    indicator
        || s.starts_with("---")
        || s.starts_with("...")
        || s.contains(": ")
        || s.contains(" #")
        || s.ends_with(':')
        || s.starts_with(' ')
        || s.ends_with(' ')
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() && (c as u32) < 0x100 => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
