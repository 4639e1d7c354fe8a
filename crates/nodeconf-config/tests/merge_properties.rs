/*
 * merge_properties.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property tests for the deep merge rules.
 */

use nodeconf_config::{ConfigError, Mapping, Value, merge, merge_mappings};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                .prop_map(|entries| Value::Mapping(entries.into_iter().collect())),
        ]
    })
}

fn mapping_with_prefix(prefix: &'static str) -> impl Strategy<Value = Mapping> {
    prop::collection::vec(("[a-z]{1,6}", value()), 0..5).prop_map(move |entries| {
        entries
            .into_iter()
            .map(|(key, value)| (format!("{prefix}{key}"), value))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn disjoint_keys_are_a_union(base in mapping_with_prefix("a_"), overlay in mapping_with_prefix("b_")) {
        let merged = merge_mappings(base.clone(), overlay.clone()).unwrap();
        prop_assert_eq!(merged.len(), base.len() + overlay.len());
        for (key, value) in base.iter().chain(overlay.iter()) {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    #[test]
    fn scalar_overlay_wins(base in scalar(), overlay in scalar()) {
        prop_assume!(!overlay.is_null());
        let mut a = Mapping::new();
        a.insert("key".to_string(), base);
        let mut b = Mapping::new();
        b.insert("key".to_string(), overlay.clone());
        let merged = merge_mappings(a, b).unwrap();
        prop_assert_eq!(merged.get("key"), Some(&overlay));
    }

    #[test]
    fn sequences_concatenate(
        a in prop::collection::vec(scalar(), 0..6),
        b in prop::collection::vec(scalar(), 0..6),
    ) {
        let merged = merge(Value::Sequence(a.clone()), Value::Sequence(b.clone())).unwrap();
        let mut expected = a;
        expected.extend(b);
        prop_assert_eq!(merged, Value::Sequence(expected));
    }

    #[test]
    fn merging_a_sequence_with_itself_doubles_it(a in prop::collection::vec(scalar(), 0..6)) {
        let merged = merge(Value::Sequence(a.clone()), Value::Sequence(a.clone())).unwrap();
        prop_assert_eq!(merged.as_sequence().map(<[Value]>::len), Some(a.len() * 2));
    }

    #[test]
    fn null_overlay_resets_to_empty_value(base in value()) {
        let merged = merge(base.clone(), Value::Null).unwrap();
        prop_assert_eq!(merged.kind(), base.kind());
        prop_assert_eq!(merged, base.zero_value());
    }

    #[test]
    fn mapping_against_sequence_is_an_error(
        entries in mapping_with_prefix("k_"),
        items in prop::collection::vec(value(), 0..4),
    ) {
        let err = merge(Value::Mapping(entries), Value::Sequence(items)).unwrap_err();
        let is_mismatch = matches!(err, ConfigError::KindMismatch { .. });
        prop_assert!(is_mismatch);
    }
}
