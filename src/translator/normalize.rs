//! NOT push-down.

use crate::filter::{Filter, FilterBuilder};

/// Push every `Not` down to the leaves using De Morgan's laws.
///
/// `not (a and b)` becomes `not a or not b`, `not (a or b)` becomes
/// `not a and not b`, and double negations cancel. In the result every `Not`
/// wraps a leaf directly. The rewrite preserves [`Filter::accept`] semantics.
pub fn normalize_not(filter: Filter) -> Filter {
    match filter {
        Filter::And(left, right) => FilterBuilder::and(normalize_not(*left), normalize_not(*right)),
        Filter::Or(left, right) => FilterBuilder::or(normalize_not(*left), normalize_not(*right)),
        Filter::Not(inner) => negate(*inner),
        leaf => leaf,
    }
}

fn negate(filter: Filter) -> Filter {
    match filter {
        Filter::And(left, right) => FilterBuilder::or(negate(*left), negate(*right)),
        Filter::Or(left, right) => FilterBuilder::and(negate(*left), negate(*right)),
        Filter::Not(inner) => normalize_not(*inner),
        leaf => FilterBuilder::not(leaf),
    }
}

/// Whether every `Not` in the tree wraps a leaf.
pub fn is_not_normalized(filter: &Filter) -> bool {
    match filter {
        Filter::And(left, right) | Filter::Or(left, right) => {
            is_not_normalized(left) && is_not_normalized(right)
        }
        Filter::Not(inner) => inner.is_leaf(),
        _ => true,
    }
}
