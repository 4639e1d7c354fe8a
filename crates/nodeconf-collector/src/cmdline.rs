/*
 * cmdline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Boot command line parsing.
 */

//! Turns a kernel command line into a configuration document.
//!
//! Tokens are separated by whitespace outside of quotes. `key=value` sets a
//! string, a bare `key` sets `true`, and dotted keys nest:
//!
//! ```text
//! config_url="http://10.0.0.1/c.yaml" player.name=Toad quiet
//! ```
//!
//! becomes
//!
//! ```yaml
//! config_url: http://10.0.0.1/c.yaml
//! player:
//!     name: Toad
//! quiet: true
//! ```

use nodeconf_config::{Config, Mapping, Value};

/// Split a command line into tokens, honoring `"` and `'` quoting. Quote
/// characters are removed.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Parse a command line into a mapping. Later tokens replace earlier ones.
pub fn parse_cmdline(line: &str) -> Mapping {
    let mut root = Mapping::new();

    for token in tokenize(line) {
        let (key, value) = match token.split_once('=') {
            Some((key, value)) => (key, Value::from(value)),
            None => (token.as_str(), Value::Bool(true)),
        };
        let path: Vec<&str> = key.split('.').collect();
        if path.iter().any(|segment| segment.is_empty()) {
            continue;
        }
        insert_path(&mut root, &path, value);
    }

    root
}

/// The command line as `#cloud-config` text, ready for the same pipeline
/// as any file source.
pub fn cmdline_document(line: &str) -> String {
    Config::from_mapping(parse_cmdline(line)).to_string()
}

fn insert_path(entries: &mut Mapping, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = entries;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !matches!(slot, Value::Mapping(_)) {
            *slot = Value::Mapping(Mapping::new());
        }
        current = match slot {
            Value::Mapping(next) => next,
            _ => return,
        };
    }
    current.insert((*last).to_string(), value);
}
