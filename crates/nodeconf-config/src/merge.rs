/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The deep merge engine.
//!
//! Merging is not idempotent: sequences concatenate, so merging a document
//! with itself doubles every list in it. Duplicate detection is left to the
//! author of the documents.

use crate::types::{ConfigError, Result};
use nodeconf_yaml::{Mapping, Value};

/// Merge `overlay` on top of `base`.
///
/// - `null` overlay: the empty value of `base`'s kind (a reset, not a removal)
/// - sequence + sequence: `base` followed by `overlay`
/// - mapping + mapping: key-wise union, shared keys merged recursively
/// - scalar + scalar, or a `null` base: `overlay`
/// - anything else: [`ConfigError::KindMismatch`], no partial result
pub fn merge(base: Value, overlay: Value) -> Result<Value> {
    match (base, overlay) {
        (base, Value::Null) => Ok(base.zero_value()),
        (Value::Sequence(mut items), Value::Sequence(more)) => {
            items.extend(more);
            Ok(Value::Sequence(items))
        }
        (Value::Mapping(entries), Value::Mapping(overlay)) => {
            merge_mappings(entries, overlay).map(Value::Mapping)
        }
        (Value::Null, overlay) => Ok(overlay),
        (base, overlay) if base.is_scalar() && overlay.is_scalar() => Ok(overlay),
        (base, overlay) => Err(ConfigError::KindMismatch {
            base: base.kind(),
            overlay: overlay.kind(),
        }),
    }
}

/// Merge two mappings key by key. Keys only present on one side are copied
/// unchanged; keys present on both sides go through [`merge`].
pub fn merge_mappings(mut base: Mapping, overlay: Mapping) -> Result<Mapping> {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(slot) => {
                let current = std::mem::take(slot);
                *slot = merge(current, value)?;
            }
            None => {
                base.insert(key, value);
            }
        }
    }
    Ok(base)
}
