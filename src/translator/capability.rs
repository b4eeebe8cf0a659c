//! Closure-backed translator.

use super::FilterTranslator;
use crate::filter::{ComparableFilter, ContainsAllValuesFilter, EqualsFilter, StringFilter};
use std::fmt;

type CombineHook<Q> = Box<dyn Fn(&Q, &Q) -> Option<Q> + Send + Sync>;
type LeafHook<F, Q> = Box<dyn Fn(&F, bool) -> Option<Q> + Send + Sync>;

/// A [`FilterTranslator`] assembled from optional closures.
///
/// Hooks that were never registered answer "not supported". Useful for
/// connectors whose capabilities are only known at runtime and for fakes in
/// tests.
///
/// ```rust
/// use connector_framework::translator::{CapabilityTable, FilterTranslator};
///
/// let table: CapabilityTable<String> = CapabilityTable::new()
///     .with_equals(|f, negated| (!negated).then(|| format!("{}=?", f.name())))
///     .with_or(|l, r| Some(format!("{l} OR {r}")));
/// assert!(format!("{table:?}").contains("equals"));
/// ```
pub struct CapabilityTable<Q> {
    and: Option<CombineHook<Q>>,
    or: Option<CombineHook<Q>>,
    equals: Option<LeafHook<EqualsFilter, Q>>,
    contains: Option<LeafHook<StringFilter, Q>>,
    starts_with: Option<LeafHook<StringFilter, Q>>,
    ends_with: Option<LeafHook<StringFilter, Q>>,
    greater_than: Option<LeafHook<ComparableFilter, Q>>,
    greater_than_or_equal: Option<LeafHook<ComparableFilter, Q>>,
    less_than: Option<LeafHook<ComparableFilter, Q>>,
    less_than_or_equal: Option<LeafHook<ComparableFilter, Q>>,
    contains_all_values: Option<LeafHook<ContainsAllValuesFilter, Q>>,
}

impl<Q> Default for CapabilityTable<Q> {
    fn default() -> Self {
        Self {
            and: None,
            or: None,
            equals: None,
            contains: None,
            starts_with: None,
            ends_with: None,
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
            contains_all_values: None,
        }
    }
}

impl<Q> CapabilityTable<Q> {
    /// A table with no capabilities; every filter translates to everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_and(mut self, hook: impl Fn(&Q, &Q) -> Option<Q> + Send + Sync + 'static) -> Self {
        self.and = Some(Box::new(hook));
        self
    }

    pub fn with_or(mut self, hook: impl Fn(&Q, &Q) -> Option<Q> + Send + Sync + 'static) -> Self {
        self.or = Some(Box::new(hook));
        self
    }

    pub fn with_equals(
        mut self,
        hook: impl Fn(&EqualsFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.equals = Some(Box::new(hook));
        self
    }

    pub fn with_contains(
        mut self,
        hook: impl Fn(&StringFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.contains = Some(Box::new(hook));
        self
    }

    pub fn with_starts_with(
        mut self,
        hook: impl Fn(&StringFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.starts_with = Some(Box::new(hook));
        self
    }

    pub fn with_ends_with(
        mut self,
        hook: impl Fn(&StringFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.ends_with = Some(Box::new(hook));
        self
    }

    pub fn with_greater_than(
        mut self,
        hook: impl Fn(&ComparableFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.greater_than = Some(Box::new(hook));
        self
    }

    pub fn with_greater_than_or_equal(
        mut self,
        hook: impl Fn(&ComparableFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.greater_than_or_equal = Some(Box::new(hook));
        self
    }

    pub fn with_less_than(
        mut self,
        hook: impl Fn(&ComparableFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.less_than = Some(Box::new(hook));
        self
    }

    pub fn with_less_than_or_equal(
        mut self,
        hook: impl Fn(&ComparableFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.less_than_or_equal = Some(Box::new(hook));
        self
    }

    pub fn with_contains_all_values(
        mut self,
        hook: impl Fn(&ContainsAllValuesFilter, bool) -> Option<Q> + Send + Sync + 'static,
    ) -> Self {
        self.contains_all_values = Some(Box::new(hook));
        self
    }

    /// Names of the registered hooks, in declaration order.
    pub fn supported(&self) -> Vec<&'static str> {
        [
            ("and", self.and.is_some()),
            ("or", self.or.is_some()),
            ("equals", self.equals.is_some()),
            ("contains", self.contains.is_some()),
            ("startsWith", self.starts_with.is_some()),
            ("endsWith", self.ends_with.is_some()),
            ("greaterThan", self.greater_than.is_some()),
            ("greaterThanOrEqual", self.greater_than_or_equal.is_some()),
            ("lessThan", self.less_than.is_some()),
            ("lessThanOrEqual", self.less_than_or_equal.is_some()),
            ("containsAllValues", self.contains_all_values.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

impl<Q> fmt::Debug for CapabilityTable<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityTable")
            .field("supported", &self.supported())
            .finish()
    }
}

impl<Q: PartialEq> FilterTranslator for CapabilityTable<Q> {
    type Query = Q;

    fn create_and_expression(&self, left: &Q, right: &Q) -> Option<Q> {
        self.and.as_ref().and_then(|hook| hook(left, right))
    }

    fn create_or_expression(&self, left: &Q, right: &Q) -> Option<Q> {
        self.or.as_ref().and_then(|hook| hook(left, right))
    }

    fn create_equals_expression(&self, filter: &EqualsFilter, negated: bool) -> Option<Q> {
        self.equals.as_ref().and_then(|hook| hook(filter, negated))
    }

    fn create_contains_expression(&self, filter: &StringFilter, negated: bool) -> Option<Q> {
        self.contains.as_ref().and_then(|hook| hook(filter, negated))
    }

    fn create_starts_with_expression(&self, filter: &StringFilter, negated: bool) -> Option<Q> {
        self.starts_with.as_ref().and_then(|hook| hook(filter, negated))
    }

    fn create_ends_with_expression(&self, filter: &StringFilter, negated: bool) -> Option<Q> {
        self.ends_with.as_ref().and_then(|hook| hook(filter, negated))
    }

    fn create_greater_than_expression(&self, filter: &ComparableFilter, negated: bool) -> Option<Q> {
        self.greater_than.as_ref().and_then(|hook| hook(filter, negated))
    }

    fn create_greater_than_or_equal_expression(
        &self,
        filter: &ComparableFilter,
        negated: bool,
    ) -> Option<Q> {
        self.greater_than_or_equal
            .as_ref()
            .and_then(|hook| hook(filter, negated))
    }

    fn create_less_than_expression(&self, filter: &ComparableFilter, negated: bool) -> Option<Q> {
        self.less_than.as_ref().and_then(|hook| hook(filter, negated))
    }

    fn create_less_than_or_equal_expression(
        &self,
        filter: &ComparableFilter,
        negated: bool,
    ) -> Option<Q> {
        self.less_than_or_equal
            .as_ref()
            .and_then(|hook| hook(filter, negated))
    }

    fn create_contains_all_values_expression(
        &self,
        filter: &ContainsAllValuesFilter,
        negated: bool,
    ) -> Option<Q> {
        self.contains_all_values
            .as_ref()
            .and_then(|hook| hook(filter, negated))
    }
}
