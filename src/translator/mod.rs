//! Filter translation.
//!
//! Turns a [`Filter`] tree into a list of native queries for a resource,
//! driven entirely by which expressions the resource can build. A connector
//! implements [`FilterTranslator`], overriding the hooks for the operators
//! its query language supports. Every hook defaults to "not supported".
//!
//! Translation runs in three phases:
//!
//! 1. NOT push-down ([`normalize_not`]) so that negation only ever wraps a
//!    leaf and is handed to the leaf hooks as a `negated` flag.
//! 2. Simplification: untranslatable subtrees widen to "everything", ANDs the
//!    resource cannot express drop one side, and ANDs over a multi-query OR
//!    are distributed.
//! 3. Translation of the simplified tree, then removal of duplicate queries.
//!
//! The union of the results of the returned queries is always a superset of
//! the objects accepted by the input filter. Callers that need exact results
//! re-check objects with [`Filter::accept`]. An empty list means "run one
//! unfiltered query".
//!
//! # Example
//!
//! ```rust
//! use connector_framework::attribute::Attribute;
//! use connector_framework::filter::{EqualsFilter, FilterBuilder};
//! use connector_framework::translator::{FilterTranslator, translate};
//!
//! struct Ldapish;
//!
//! impl FilterTranslator for Ldapish {
//!     type Query = String;
//!
//!     fn create_equals_expression(&self, filter: &EqualsFilter, negated: bool) -> Option<String> {
//!         let value = filter.attribute().string_value().ok()??;
//!         let expr = format!("({}={})", filter.name(), value);
//!         Some(if negated { format!("(!{expr})") } else { expr })
//!     }
//!
//!     fn create_and_expression(&self, left: &String, right: &String) -> Option<String> {
//!         Some(format!("(&{left}{right})"))
//!     }
//! }
//!
//! let filter = FilterBuilder::and(
//!     FilterBuilder::equal_to(Attribute::single("department", "R&D").unwrap()),
//!     FilterBuilder::not(FilterBuilder::equal_to(Attribute::single("title", "Intern").unwrap())),
//! );
//! let queries = translate(&Ldapish, Some(&filter)).unwrap();
//! assert_eq!(queries, vec!["(&(department=R&D)(!(title=Intern)))".to_string()]);
//! ```

mod capability;
mod normalize;
mod simplify;


pub use capability::CapabilityTable;
pub use normalize::{is_not_normalized, normalize_not};

use crate::error::{TranslationError, TranslationResult};
use crate::filter::{ComparableFilter, ContainsAllValuesFilter, EqualsFilter, Filter, StringFilter};
use log::debug;
use simplify::simplify_and_distribute;

/// Native expression hooks for one resource.
///
/// Each hook returns `None` when the resource cannot express the requested
/// predicate. Leaf hooks receive `negated = true` for a `Not` directly around
/// the leaf. A translator must answer consistently for the same input during
/// one translation.
pub trait FilterTranslator {
    /// The resource's native query type.
    type Query: PartialEq;

    fn create_and_expression(&self, _left: &Self::Query, _right: &Self::Query) -> Option<Self::Query> {
        None
    }

    fn create_or_expression(&self, _left: &Self::Query, _right: &Self::Query) -> Option<Self::Query> {
        None
    }

    fn create_equals_expression(&self, _filter: &EqualsFilter, _negated: bool) -> Option<Self::Query> {
        None
    }

    fn create_contains_expression(&self, _filter: &StringFilter, _negated: bool) -> Option<Self::Query> {
        None
    }

    fn create_starts_with_expression(
        &self,
        _filter: &StringFilter,
        _negated: bool,
    ) -> Option<Self::Query> {
        None
    }

    fn create_ends_with_expression(&self, _filter: &StringFilter, _negated: bool) -> Option<Self::Query> {
        None
    }

    fn create_greater_than_expression(
        &self,
        _filter: &ComparableFilter,
        _negated: bool,
    ) -> Option<Self::Query> {
        None
    }

    fn create_greater_than_or_equal_expression(
        &self,
        _filter: &ComparableFilter,
        _negated: bool,
    ) -> Option<Self::Query> {
        None
    }

    fn create_less_than_expression(
        &self,
        _filter: &ComparableFilter,
        _negated: bool,
    ) -> Option<Self::Query> {
        None
    }

    fn create_less_than_or_equal_expression(
        &self,
        _filter: &ComparableFilter,
        _negated: bool,
    ) -> Option<Self::Query> {
        None
    }

    fn create_contains_all_values_expression(
        &self,
        _filter: &ContainsAllValuesFilter,
        _negated: bool,
    ) -> Option<Self::Query> {
        None
    }

    /// Translate `filter` with this translator's hooks. See [`translate`].
    fn translate(&self, filter: Option<&Filter>) -> TranslationResult<Vec<Self::Query>> {
        translate(self, filter)
    }
}

/// Translate a filter into the minimal list of native queries.
///
/// `None` and filters that simplify to everything yield an empty list.
/// Errors are only returned when the translator answered inconsistently
/// between phases.
pub fn translate<T>(translator: &T, filter: Option<&Filter>) -> TranslationResult<Vec<T::Query>>
where
    T: FilterTranslator + ?Sized,
{
    let Some(filter) = filter else {
        debug!("No filter given, translating to a single unfiltered query");
        return Ok(Vec::new());
    };

    let normalized = normalize_not(filter.clone());
    let Some(simplified) = simplify_and_distribute(translator, normalized)? else {
        debug!("Filter {} cannot be narrowed natively, translating to everything", filter);
        return Ok(Vec::new());
    };

    let queries = dedup(translate_internal(translator, &simplified)?);
    debug!(
        "Translated filter {} into {} native quer{}",
        filter,
        queries.len(),
        if queries.len() == 1 { "y" } else { "ies" }
    );
    Ok(queries)
}

/// Translate an already simplified tree.
pub(crate) fn translate_internal<T>(translator: &T, filter: &Filter) -> TranslationResult<Vec<T::Query>>
where
    T: FilterTranslator + ?Sized,
{
    match filter {
        Filter::And(left, right) => {
            let left_expr = single(translate_internal(translator, left)?, left)?;
            let right_expr = single(translate_internal(translator, right)?, right)?;
            match translator.create_and_expression(&left_expr, &right_expr) {
                Some(expr) => Ok(vec![expr]),
                None => Err(TranslationError::AndRejected {
                    filter: filter.to_string(),
                }),
            }
        }
        Filter::Or(left, right) => {
            let mut left_exprs = translate_internal(translator, left)?;
            let mut right_exprs = translate_internal(translator, right)?;
            if let ([l], [r]) = (left_exprs.as_slice(), right_exprs.as_slice()) {
                if let Some(expr) = translator.create_or_expression(l, r) {
                    return Ok(vec![expr]);
                }
            }
            left_exprs.append(&mut right_exprs);
            Ok(left_exprs)
        }
        leaf => Ok(create_leaf_expression(translator, leaf)?.into_iter().collect()),
    }
}

/// Ask the matching leaf hook, unwrapping a `Not` into the negated flag.
pub(crate) fn create_leaf_expression<T>(
    translator: &T,
    filter: &Filter,
) -> TranslationResult<Option<T::Query>>
where
    T: FilterTranslator + ?Sized,
{
    match filter {
        Filter::Not(inner) if inner.is_leaf() => Ok(leaf_expression(translator, inner, true)),
        Filter::Not(_) => Err(TranslationError::UnnormalizedNot {
            filter: filter.to_string(),
        }),
        other => Ok(leaf_expression(translator, other, false)),
    }
}

fn leaf_expression<T>(translator: &T, filter: &Filter, negated: bool) -> Option<T::Query>
where
    T: FilterTranslator + ?Sized,
{
    match filter {
        Filter::Equals(f) => translator.create_equals_expression(f, negated),
        Filter::Contains(f) => translator.create_contains_expression(f, negated),
        Filter::StartsWith(f) => translator.create_starts_with_expression(f, negated),
        Filter::EndsWith(f) => translator.create_ends_with_expression(f, negated),
        Filter::GreaterThan(f) => translator.create_greater_than_expression(f, negated),
        Filter::GreaterThanOrEqual(f) => {
            translator.create_greater_than_or_equal_expression(f, negated)
        }
        Filter::LessThan(f) => translator.create_less_than_expression(f, negated),
        Filter::LessThanOrEqual(f) => translator.create_less_than_or_equal_expression(f, negated),
        Filter::ContainsAllValues(f) => {
            translator.create_contains_all_values_expression(f, negated)
        }
        // Composites never reach the leaf hooks.
        Filter::And(..) | Filter::Or(..) | Filter::Not(_) => None,
    }
}

fn single<Q>(mut exprs: Vec<Q>, operand: &Filter) -> TranslationResult<Q> {
    let count = exprs.len();
    match exprs.pop() {
        Some(expr) if count == 1 => Ok(expr),
        _ => Err(TranslationError::AndOperandNotSingular {
            filter: operand.to_string(),
            count,
        }),
    }
}

/// Drop later duplicates, keeping first-occurrence order.
fn dedup<Q: PartialEq>(queries: Vec<Q>) -> Vec<Q> {
    let mut unique: Vec<Q> = Vec::with_capacity(queries.len());
    for query in queries {
        if !unique.contains(&query) {
            unique.push(query);
        }
    }
    unique
}
