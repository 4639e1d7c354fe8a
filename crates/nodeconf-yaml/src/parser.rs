/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! YAML parser that builds [`Value`] trees.

use crate::{Error, Mapping, Number, Result, Value};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());
static HEX_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").unwrap());
static OCTAL_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0o[0-7]+$").unwrap());
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$").unwrap()
});

/// Parse YAML (or JSON) from a string.
///
/// Only the first document of a multi-document stream is read. An empty
/// stream, or one holding nothing but comments, yields [`Value::Null`].
///
/// # Example
///
/// ```rust
/// use nodeconf_yaml::{parse, Value};
///
/// let value = parse("#cloud-config\nname: Mario").unwrap();
/// assert_eq!(value.get("name"), Some(&Value::from("Mario")));
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is malformed or uses a sequence or mapping
/// as a mapping key.
pub fn parse(content: &str) -> Result<Value> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut parser = Parser::new_from_str(content);
    let mut builder = ValueBuilder::new();

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(Error::from)?;

    builder.result()
}

/// Parse YAML from raw bytes, which must be UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<Value> {
    let content = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    parse(content)
}

/// Builder that implements MarkedEventReceiver to construct a Value.
struct ValueBuilder {
    /// Stack of containers being constructed
    stack: Vec<BuildNode>,

    /// Anchored nodes, by anchor id, for alias resolution
    anchors: HashMap<usize, Value>,

    /// The completed root node
    root: Option<Value>,

    /// First structural error seen; events after it are ignored
    error: Option<Error>,
}

/// A container being constructed during parsing.
enum BuildNode {
    Sequence {
        anchor_id: usize,
        items: Vec<Value>,
    },

    Mapping {
        anchor_id: usize,
        entries: Mapping,
        /// Key waiting for its value
        pending_key: Option<String>,
    },
}

impl ValueBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root.unwrap_or(Value::Null)),
        }
    }

    fn push_complete(&mut self, node: Value, anchor_id: usize) {
        if anchor_id != 0 {
            self.anchors.insert(anchor_id, node.clone());
        }

        let Some(parent) = self.stack.last_mut() else {
            // This is the root
            self.root = Some(node);
            return;
        };

        match parent {
            BuildNode::Sequence { items, .. } => items.push(node),
            BuildNode::Mapping {
                entries,
                pending_key,
                ..
            } => match pending_key.take() {
                Some(key) => {
                    // Later duplicates win
                    entries.insert(key, node);
                }
                None => match mapping_key(node) {
                    Ok(key) => *pending_key = Some(key),
                    Err(err) => self.error = Some(err),
                },
            },
        }
    }
}

impl MarkedEventReceiver for ValueBuilder {
    fn on_event(&mut self, ev: Event, _marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(value, style, anchor_id, tag) => {
                let forced_string = tag.as_ref().is_some_and(|t| t.suffix == "str");
                let node = if style != TScalarStyle::Plain || forced_string {
                    Value::String(value)
                } else {
                    resolve_plain(&value)
                };
                self.push_complete(node, anchor_id);
            }

            Event::SequenceStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::MappingStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    anchor_id,
                    entries: Mapping::new(),
                    pending_key: None,
                });
            }

            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(BuildNode::Sequence { anchor_id, items }) => {
                    self.push_complete(Value::Sequence(items), anchor_id);
                }
                Some(BuildNode::Mapping {
                    anchor_id, entries, ..
                }) => {
                    self.push_complete(Value::Mapping(entries), anchor_id);
                }
                None => {
                    self.error = Some(Error::InvalidStructure {
                        message: "unbalanced collection end".into(),
                    });
                }
            },

            Event::Alias(anchor_id) => {
                let node = self.anchors.get(&anchor_id).cloned().unwrap_or_default();
                self.push_complete(node, 0);
            }

            _ => {}
        }
    }
}

/// Turn a decoded key node into a mapping key. Scalars are stringified.
fn mapping_key(node: Value) -> Result<String> {
    match node {
        Value::String(s) => Ok(s),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::InvalidStructure {
            message: format!("{} used as a mapping key", other.kind()),
        }),
    }
}

/// Resolve a plain (unquoted) scalar with the YAML 1.2 core schema.
pub(crate) fn resolve_plain(text: &str) -> Value {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return Value::Number(Number::Float(f64::INFINITY));
        }
        "-.inf" | "-.Inf" | "-.INF" => return Value::Number(Number::Float(f64::NEG_INFINITY)),
        ".nan" | ".NaN" | ".NAN" => return Value::Number(Number::Float(f64::NAN)),
        _ => {}
    }

    if INTEGER.is_match(text) {
        if let Ok(i) = text.trim_start_matches('+').parse::<i64>() {
            return Value::Number(Number::Integer(i));
        }
    }
    if HEX_INTEGER.is_match(text) {
        if let Ok(i) = i64::from_str_radix(&text[2..], 16) {
            return Value::Number(Number::Integer(i));
        }
    }
    if OCTAL_INTEGER.is_match(text) {
        if let Ok(i) = i64::from_str_radix(&text[2..], 8) {
            return Value::Number(Number::Integer(i));
        }
    }
    // Integers too large for i64 fall through to here as well
    if FLOAT.is_match(text) {
        if let Ok(v) = text.parse::<f64>() {
            return Value::Number(Number::Float(v));
        }
    }

    Value::String(text.to_string())
}
