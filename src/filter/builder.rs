//! Construction API for filters.

use super::{ComparableFilter, ContainsAllValuesFilter, EqualsFilter, Filter, StringFilter};
use crate::attribute::Attribute;
use crate::error::ValidationResult;

/// Builds [`Filter`] trees.
///
/// Leaf constructors validate the wrapped attribute and fail instead of
/// producing a filter that could only misbehave at evaluation time.
#[derive(Debug, Clone, Copy)]
pub struct FilterBuilder;

impl FilterBuilder {
    /// Objects whose attribute value list equals the given one.
    pub fn equal_to(attribute: Attribute) -> Filter {
        Filter::Equals(EqualsFilter::new(attribute))
    }

    /// Objects with a string value containing the given substring.
    pub fn contains(attribute: Attribute) -> ValidationResult<Filter> {
        StringFilter::new(attribute, "Contains").map(Filter::Contains)
    }

    pub fn starts_with(attribute: Attribute) -> ValidationResult<Filter> {
        StringFilter::new(attribute, "StartsWith").map(Filter::StartsWith)
    }

    pub fn ends_with(attribute: Attribute) -> ValidationResult<Filter> {
        StringFilter::new(attribute, "EndsWith").map(Filter::EndsWith)
    }

    pub fn greater_than(attribute: Attribute) -> ValidationResult<Filter> {
        ComparableFilter::new(attribute, "GreaterThan").map(Filter::GreaterThan)
    }

    pub fn greater_than_or_equal(attribute: Attribute) -> ValidationResult<Filter> {
        ComparableFilter::new(attribute, "GreaterThanOrEqual").map(Filter::GreaterThanOrEqual)
    }

    pub fn less_than(attribute: Attribute) -> ValidationResult<Filter> {
        ComparableFilter::new(attribute, "LessThan").map(Filter::LessThan)
    }

    pub fn less_than_or_equal(attribute: Attribute) -> ValidationResult<Filter> {
        ComparableFilter::new(attribute, "LessThanOrEqual").map(Filter::LessThanOrEqual)
    }

    /// Objects holding every value of the given attribute.
    pub fn contains_all_values(attribute: Attribute) -> ValidationResult<Filter> {
        ContainsAllValuesFilter::new(attribute).map(Filter::ContainsAllValues)
    }

    pub fn and(left: Filter, right: Filter) -> Filter {
        Filter::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Filter, right: Filter) -> Filter {
        Filter::Or(Box::new(left), Box::new(right))
    }

    pub fn not(filter: Filter) -> Filter {
        Filter::Not(Box::new(filter))
    }

    /// Fold filters into a left-leaning conjunction.
    ///
    /// Returns `None`, the everything filter, for an empty input.
    pub fn and_all(filters: impl IntoIterator<Item = Filter>) -> Option<Filter> {
        filters.into_iter().reduce(Self::and)
    }

    /// Fold filters into a left-leaning disjunction.
    ///
    /// Returns `None` for an empty input.
    pub fn or_all(filters: impl IntoIterator<Item = Filter>) -> Option<Filter> {
        filters.into_iter().reduce(Self::or)
    }
}
