//! Filter expressions over resource object attributes.
//!
//! A [`Filter`] is a binary tree of boolean predicates. Leaves test a single
//! attribute; `And`, `Or` and `Not` combine them. Filters are built through
//! [`FilterBuilder`], which enforces the leaf invariants at construction:
//!
//! * string leaves (`Contains`, `StartsWith`, `EndsWith`) wrap exactly one
//!   string value
//! * comparison leaves wrap exactly one comparable value
//! * `ContainsAllValues` wraps a non-empty value list
//! * the `__UID__` attribute only appears in `Equals`
//!
//! Filters are evaluated in memory with [`Filter::accept`] and translated into
//! native queries by [`crate::translator`].
//!
//! # Example
//!
//! ```rust
//! use connector_framework::attribute::Attribute;
//! use connector_framework::filter::FilterBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let filter = FilterBuilder::and(
//!     FilterBuilder::equal_to(Attribute::single("department", "R&D")?),
//!     FilterBuilder::not(FilterBuilder::starts_with(Attribute::single("mail", "test")?)?),
//! );
//! assert_eq!(
//!     filter.to_string(),
//!     r#"(department eq "R&D" and not (mail sw "test"))"#
//! );
//! # Ok(())
//! # }
//! ```

mod builder;
mod evaluate;

pub use builder::FilterBuilder;

use crate::attribute::{Attribute, AttributeValue, names};
use crate::error::{ValidationError, ValidationResult};
use serde::Serialize;
use std::fmt;

/// A boolean expression over attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "args", rename_all = "camelCase")]
pub enum Filter {
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
    Equals(EqualsFilter),
    Contains(StringFilter),
    StartsWith(StringFilter),
    EndsWith(StringFilter),
    GreaterThan(ComparableFilter),
    GreaterThanOrEqual(ComparableFilter),
    LessThan(ComparableFilter),
    LessThanOrEqual(ComparableFilter),
    ContainsAllValues(ContainsAllValuesFilter),
}

impl Filter {
    /// Whether this node is an attribute predicate.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::And(..) | Self::Or(..) | Self::Not(_))
    }

    /// Operator keyword used in display output.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::And(..) => "and",
            Self::Or(..) => "or",
            Self::Not(_) => "not",
            Self::Equals(_) => "eq",
            Self::Contains(_) => "co",
            Self::StartsWith(_) => "sw",
            Self::EndsWith(_) => "ew",
            Self::GreaterThan(_) => "gt",
            Self::GreaterThanOrEqual(_) => "ge",
            Self::LessThan(_) => "lt",
            Self::LessThanOrEqual(_) => "le",
            Self::ContainsAllValues(_) => "ca",
        }
    }

    /// Name of the attribute tested by a leaf, `None` for composites.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Self::And(..) | Self::Or(..) | Self::Not(_) => None,
            Self::Equals(f) => Some(f.name()),
            Self::Contains(f) | Self::StartsWith(f) | Self::EndsWith(f) => Some(f.name()),
            Self::GreaterThan(f)
            | Self::GreaterThanOrEqual(f)
            | Self::LessThan(f)
            | Self::LessThanOrEqual(f) => Some(f.name()),
            Self::ContainsAllValues(f) => Some(f.name()),
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Self::And(l, r) | Self::Or(l, r) => 1 + l.node_count() + r.node_count(),
            Self::Not(inner) => 1 + inner.node_count(),
            _ => 1,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(l, r) | Self::Or(l, r) => {
                write!(f, "({} {} {})", l, self.operator(), r)
            }
            Self::Not(inner) if inner.is_leaf() => write!(f, "not ({})", inner),
            Self::Not(inner) => write!(f, "not {}", inner),
            Self::Equals(eq) => {
                write!(f, "{} eq ", eq.name())?;
                match eq.attribute.values() {
                    None => f.write_str("null"),
                    Some([value]) => write!(f, "{}", value),
                    Some(values) => write_list(f, values),
                }
            }
            Self::Contains(s) | Self::StartsWith(s) | Self::EndsWith(s) => {
                write!(f, "{} {} {:?}", s.name(), self.operator(), s.value())
            }
            Self::GreaterThan(c)
            | Self::GreaterThanOrEqual(c)
            | Self::LessThan(c)
            | Self::LessThanOrEqual(c) => {
                write!(f, "{} {} {}", c.name(), self.operator(), c.value())
            }
            Self::ContainsAllValues(ca) => {
                write!(f, "{} ca ", ca.name())?;
                write_list(f, ca.values())
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[AttributeValue]) -> fmt::Result {
    f.write_str("[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    f.write_str("]")
}

fn reject_uid(attribute: &Attribute, filter: &str) -> ValidationResult<()> {
    if attribute.is(names::UID) {
        return Err(ValidationError::UidNotAllowed {
            filter: filter.to_string(),
        });
    }
    Ok(())
}

fn require_single<'a>(attribute: &'a Attribute) -> ValidationResult<&'a AttributeValue> {
    match attribute.values_or_empty() {
        [value] => Ok(value),
        other => Err(ValidationError::ExpectedSingleValue {
            attribute: attribute.name().to_string(),
            actual: other.len(),
        }),
    }
}

/// Payload of an `Equals` leaf: the full attribute value list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EqualsFilter {
    attribute: Attribute,
}

impl EqualsFilter {
    pub(crate) fn new(attribute: Attribute) -> Self {
        Self { attribute }
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    /// Whether this filter selects by `__UID__`.
    pub fn is_uid(&self) -> bool {
        self.attribute.is(names::UID)
    }
}

/// Payload of a string-matching leaf: one string value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringFilter {
    attribute: Attribute,
}

impl StringFilter {
    pub(crate) fn new(attribute: Attribute, filter: &str) -> ValidationResult<Self> {
        reject_uid(&attribute, filter)?;
        match require_single(&attribute)? {
            AttributeValue::String(_) => Ok(Self { attribute }),
            other => Err(ValidationError::invalid_type(
                attribute.name(),
                "string",
                other.value_type().to_string(),
            )),
        }
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    pub fn value(&self) -> &str {
        self.attribute
            .values_or_empty()
            .first()
            .and_then(AttributeValue::as_str)
            .unwrap_or_default()
    }
}

/// Payload of an ordering leaf: one comparable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparableFilter {
    attribute: Attribute,
}

impl ComparableFilter {
    pub(crate) fn new(attribute: Attribute, filter: &str) -> ValidationResult<Self> {
        reject_uid(&attribute, filter)?;
        let value = require_single(&attribute)?;
        if !value.is_comparable() {
            return Err(ValidationError::NotComparable {
                attribute: attribute.name().to_string(),
                actual: value.value_type().to_string(),
            });
        }
        Ok(Self { attribute })
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    pub fn value(&self) -> &AttributeValue {
        // Construction guarantees exactly one value.
        &self.attribute.values_or_empty()[0]
    }
}

/// Payload of a `ContainsAllValues` leaf: a non-empty value list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainsAllValuesFilter {
    attribute: Attribute,
}

impl ContainsAllValuesFilter {
    pub(crate) fn new(attribute: Attribute) -> ValidationResult<Self> {
        reject_uid(&attribute, "ContainsAllValues")?;
        if attribute.values_or_empty().is_empty() {
            return Err(ValidationError::ExpectedValues {
                attribute: attribute.name().to_string(),
            });
        }
        Ok(Self { attribute })
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    pub fn values(&self) -> &[AttributeValue] {
        self.attribute.values_or_empty()
    }
}
