//! NOT push-down keeps the meaning of a filter.

use super::{filter_strategy, objects_strategy};
use connector_framework::translator::{is_not_normalized, normalize_not};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_normalized_filter_accepts_same_objects(
        filter in filter_strategy(),
        objects in objects_strategy(),
    ) {
        let normalized = normalize_not(filter.clone());
        prop_assert!(is_not_normalized(&normalized), "not normalized: {}", normalized);
        for object in &objects {
            prop_assert_eq!(normalized.accept(object), filter.accept(object));
        }
    }

    #[test]
    fn prop_normalization_is_idempotent(filter in filter_strategy()) {
        let once = normalize_not(filter);
        let twice = normalize_not(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_double_negation_cancels(filter in filter_strategy()) {
        use connector_framework::filter::FilterBuilder;
        let doubled = FilterBuilder::not(FilterBuilder::not(filter.clone()));
        prop_assert_eq!(normalize_not(doubled), normalize_not(filter));
    }
}
