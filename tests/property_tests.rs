//! Property-based tests for activity_feed using proptest

use activity_feed::masking::{reveal_edges, Masked};
use activity_feed::prelude::*;
use activity_feed::ContextValue;
use proptest::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

fn any_level() -> impl Strategy<Value = ActivityLevel> {
    prop_oneof![
        Just(ActivityLevel::Trace),
        Just(ActivityLevel::Debug),
        Just(ActivityLevel::Info),
        Just(ActivityLevel::Warn),
        Just(ActivityLevel::Error),
    ]
}

fn non_blank() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 _-]{0,30}"
}

fn blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,5}"
}

#[derive(Debug, Serialize)]
struct Order {
    id: u64,
    customer: String,
    lines: Vec<OrderLine>,
    tags: BTreeMap<String, i32>,
}

#[derive(Debug, Serialize)]
struct OrderLine {
    sku: String,
    quantity: u32,
    price: f64,
}

fn any_order() -> impl Strategy<Value = Order> {
    (
        any::<u64>(),
        ".{0,20}",
        prop::collection::vec(("[A-Z]{3}-[0-9]{3}", any::<u32>(), -1.0e6f64..1.0e6), 0..5),
        prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..5),
    )
        .prop_map(|(id, customer, lines, tags)| Order {
            id,
            customer,
            lines: lines
                .into_iter()
                .map(|(sku, quantity, price)| OrderLine {
                    sku,
                    quantity,
                    price,
                })
                .collect(),
            tags,
        })
}

proptest! {
    /// Any level with a non-blank identifier and message builds, and the
    /// rendered context carries only the identifier
    #[test]
    fn test_valid_activity_builds(
        level in any_level(),
        identifier in non_blank(),
        message in non_blank(),
    ) {
        let activity = an_activity()
            .level(level)
            .with_identifier(identifier.clone())
            .with_message(message.clone())
            .build()
            .unwrap();

        let rendered = activity.context();
        let inner = rendered.get("context").and_then(ContextValue::as_map).unwrap();
        prop_assert_eq!(inner.len(), 1);
        prop_assert_eq!(inner.get("identifier"), Some(&ContextValue::from(identifier)));
        prop_assert_eq!(activity.message(), message.as_str());
    }

    /// A blank identifier or message is always rejected
    #[test]
    fn test_blank_fields_rejected(
        level in any_level(),
        valid in non_blank(),
        blank in blank(),
        blank_identifier in any::<bool>(),
    ) {
        let (identifier, message) = if blank_identifier {
            (blank, valid)
        } else {
            (valid, blank)
        };

        let err = Activity::new(level, identifier, message, Context::new()).unwrap_err();

        prop_assert!(err.is_invalid_argument());
    }

    /// Level names parse back to the same level, in any case
    #[test]
    fn test_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let text = if lower {
            level.to_str().to_lowercase()
        } else {
            level.to_string()
        };

        let parsed: ActivityLevel = text.parse().unwrap();

        prop_assert_eq!(parsed, level);
    }

    /// Severity order matches the numeric representation
    #[test]
    fn test_level_ordering(first in any_level(), second in any_level()) {
        prop_assert_eq!(first <= second, (first as u8) <= (second as u8));
    }

    /// Serializing the same graph twice yields equal contexts
    #[test]
    fn test_serializer_is_deterministic(order in any_order()) {
        let serializer = ContextSerializer::new();

        let first = serializer.to_context_map(&order).unwrap();
        let second = serializer.to_context_map(&order).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.keys().collect::<Vec<_>>(), vec!["id", "customer", "lines", "tags"]);
    }

    /// Masked text never appears in serialized output
    #[test]
    fn test_masked_text_never_serialized(secret in "[a-z]{8,20}") {
        let masked = Masked::with(secret.clone(), |value: &String, out: &mut String| {
            reveal_edges(value, out)
        });
        let context = Context::new().with_entry("secret", masked);

        let json = serde_json::to_string(&context).unwrap();

        prop_assert!(!json.contains(&secret));
    }

    /// Context keeps insertion order for distinct keys
    #[test]
    fn test_context_keeps_order(keys in prop::collection::hash_set("[a-z]{1,10}", 0..20)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut context = Context::new();
        for (index, key) in keys.iter().enumerate() {
            context.insert(key.clone(), index);
        }

        prop_assert_eq!(
            context.keys().map(str::to_string).collect::<Vec<_>>(),
            keys
        );
    }
}
