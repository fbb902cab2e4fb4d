//! The type-aware comparator is a total order over mixed values

use std::cmp::Ordering;

use chrono::NaiveDate;
use lab_records::{compare_values, FieldValue};
use proptest::prelude::*;

fn value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Null),
        Just(FieldValue::Text(String::new())),
        (-1e6f64..1e6).prop_map(FieldValue::Number),
        (-1000i64..1000).prop_map(|n| FieldValue::Text(n.to_string())),
        (0u32..3000).prop_map(|d| {
            let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(u64::from(d));
            FieldValue::Date(date)
        }),
        (0u32..3000).prop_map(|d| {
            let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(u64::from(d));
            FieldValue::Text(date.format("%Y-%m-%d").to_string())
        }),
        "[a-zA-Z ]{1,8}".prop_map(FieldValue::Text),
        any::<bool>().prop_map(FieldValue::Bool),
    ]
}

proptest! {
    #[test]
    fn antisymmetric(a in value(), b in value()) {
        prop_assert_eq!(compare_values(&a, &b), compare_values(&b, &a).reverse());
    }

    #[test]
    fn transitive(a in value(), b in value(), c in value()) {
        let mut sorted = [a, b, c];
        sorted.sort_by(compare_values);
        prop_assert_ne!(compare_values(&sorted[0], &sorted[1]), Ordering::Greater);
        prop_assert_ne!(compare_values(&sorted[1], &sorted[2]), Ordering::Greater);
        prop_assert_ne!(compare_values(&sorted[0], &sorted[2]), Ordering::Greater);
    }

    #[test]
    fn numeric_text_orders_numerically(a in -1000i64..1000, b in -1000i64..1000) {
        let left = FieldValue::Text(a.to_string());
        let right = FieldValue::Number(b as f64);
        prop_assert_eq!(compare_values(&left, &right), a.cmp(&b));
    }

    #[test]
    fn empty_sorts_first(v in value()) {
        prop_assume!(!v.is_empty());
        prop_assert_eq!(compare_values(&FieldValue::Null, &v), Ordering::Less);
    }
}
