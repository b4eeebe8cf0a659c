//! Property-based tests of the translation engine.
//!
//! Filters and objects are drawn from a small attribute vocabulary so that
//! generated filters actually match some generated objects.

use crate::common::Capabilities;
use connector_framework::attribute::{Attribute, Uid};
use connector_framework::filter::{Filter, FilterBuilder};
use connector_framework::object::{ConnectorObject, ConnectorObjectBuilder};
use proptest::prelude::*;

pub mod normalization;

const DEPARTMENTS: [&str; 3] = ["eng", "ops", "sales"];
const PREFIXES: [&str; 4] = ["e", "o", "s", "x"];
const FRAGMENTS: [&str; 3] = ["n", "l", "z"];
const TAGS: [&str; 3] = ["a", "b", "c"];

/// Accounts with a department, an optional level and optional tags.
pub fn object_strategy() -> impl Strategy<Value = ConnectorObject> {
    (
        0u32..1000,
        prop::sample::select(DEPARTMENTS.to_vec()),
        prop::option::of(0i32..5),
        prop::collection::btree_set(prop::sample::select(TAGS.to_vec()), 0..=3),
    )
        .prop_map(|(id, department, level, tags)| {
            let mut builder = ConnectorObjectBuilder::new()
                .uid(Uid::new(id.to_string()).unwrap())
                .name(format!("user{id}"))
                .add_attribute(Attribute::single("dept", department).unwrap());
            if let Some(level) = level {
                builder = builder.add_attribute(Attribute::single("level", level).unwrap());
            }
            if !tags.is_empty() {
                builder = builder.add_attribute(Attribute::multi("tags", tags).unwrap());
            }
            builder.build().unwrap()
        })
}

pub fn objects_strategy() -> impl Strategy<Value = Vec<ConnectorObject>> {
    prop::collection::vec(object_strategy(), 1..12)
}

fn leaf_strategy() -> impl Strategy<Value = Filter> {
    prop_oneof![
        prop::sample::select(DEPARTMENTS.to_vec())
            .prop_map(|d| FilterBuilder::equal_to(Attribute::single("dept", d).unwrap())),
        prop::sample::select(PREFIXES.to_vec()).prop_map(|p| {
            FilterBuilder::starts_with(Attribute::single("dept", p).unwrap()).unwrap()
        }),
        prop::sample::select(FRAGMENTS.to_vec()).prop_map(|p| {
            FilterBuilder::contains(Attribute::single("dept", p).unwrap()).unwrap()
        }),
        (0i32..5).prop_map(|n| {
            FilterBuilder::greater_than(Attribute::single("level", n).unwrap()).unwrap()
        }),
        (0i32..5).prop_map(|n| {
            FilterBuilder::less_than_or_equal(Attribute::single("level", n).unwrap()).unwrap()
        }),
        prop::collection::btree_set(prop::sample::select(TAGS.to_vec()), 1..=2).prop_map(|t| {
            FilterBuilder::contains_all_values(Attribute::multi("tags", t).unwrap()).unwrap()
        }),
    ]
}

/// Filter trees up to four levels deep over the test vocabulary.
pub fn filter_strategy() -> impl Strategy<Value = Filter> {
    leaf_strategy().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| FilterBuilder::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| FilterBuilder::or(l, r)),
            inner.prop_map(FilterBuilder::not),
        ]
    })
}

/// Any combination of native operators.
pub fn capabilities_strategy() -> impl Strategy<Value = Capabilities> {
    any::<[bool; 7]>().prop_map(|flags| Capabilities {
        and: flags[0],
        or: flags[1],
        equals: flags[2],
        string_match: flags[3],
        ordering: flags[4],
        contains_all_values: flags[5],
        negation: flags[6],
    })
}
