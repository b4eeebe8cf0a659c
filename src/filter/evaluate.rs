//! In-memory filter evaluation.
//!
//! Connectors that cannot filter natively, and callers re-checking results
//! of an imprecise native query, evaluate filters here.

use super::{ComparableFilter, Filter, StringFilter};
use crate::attribute::AttributeValue;
use crate::object::ConnectorObject;
use std::cmp::Ordering;

impl Filter {
    /// Test a candidate object against this filter.
    ///
    /// A leaf whose attribute is absent from the object evaluates to `false`.
    /// Multi-valued attributes match a string or comparison leaf when any of
    /// their values does. `Equals` compares the whole value list.
    pub fn accept(&self, object: &ConnectorObject) -> bool {
        match self {
            Self::And(left, right) => left.accept(object) && right.accept(object),
            Self::Or(left, right) => left.accept(object) || right.accept(object),
            Self::Not(inner) => !inner.accept(object),
            Self::Equals(eq) => object
                .attribute_by_name(eq.name())
                .is_some_and(|attr| attr.values() == eq.attribute().values()),
            Self::Contains(f) => any_string(object, f, |value, pattern| value.contains(pattern)),
            Self::StartsWith(f) => {
                any_string(object, f, |value, pattern| value.starts_with(pattern))
            }
            Self::EndsWith(f) => any_string(object, f, |value, pattern| value.ends_with(pattern)),
            Self::GreaterThan(f) => any_ordering(object, f, |ord| ord == Ordering::Greater),
            Self::GreaterThanOrEqual(f) => any_ordering(object, f, |ord| ord != Ordering::Less),
            Self::LessThan(f) => any_ordering(object, f, |ord| ord == Ordering::Less),
            Self::LessThanOrEqual(f) => any_ordering(object, f, |ord| ord != Ordering::Greater),
            Self::ContainsAllValues(f) => object.attribute_by_name(f.name()).is_some_and(|attr| {
                let present = attr.values_or_empty();
                f.values().iter().all(|wanted| present.contains(wanted))
            }),
        }
    }
}

fn any_string(
    object: &ConnectorObject,
    filter: &StringFilter,
    matches: impl Fn(&str, &str) -> bool,
) -> bool {
    object.attribute_by_name(filter.name()).is_some_and(|attr| {
        attr.values_or_empty()
            .iter()
            .filter_map(AttributeValue::as_str)
            .any(|value| matches(value, filter.value()))
    })
}

/// True if any object value, ordered against the filter value, satisfies `test`.
fn any_ordering(
    object: &ConnectorObject,
    filter: &ComparableFilter,
    test: impl Fn(Ordering) -> bool,
) -> bool {
    object.attribute_by_name(filter.name()).is_some_and(|attr| {
        attr.values_or_empty()
            .iter()
            .filter_map(|value| value.compare(filter.value()))
            .any(&test)
    })
}
