//! Capability pruning and AND-over-OR distribution.
//!
//! Runs bottom-up over a NOT-normalized tree. `None` stands for the
//! everything filter: a subtree the resource cannot narrow at all.

use super::{FilterTranslator, create_leaf_expression, translate_internal};
use crate::error::{TranslationError, TranslationResult};
use crate::filter::{Filter, FilterBuilder};
use log::{trace, warn};

/// Simplify a NOT-normalized filter against the translator's capabilities.
///
/// On return every `And` node has operands that translate to exactly one
/// expression each and that the AND hook accepts. Untranslatable leaves have
/// been widened to everything.
pub(crate) fn simplify_and_distribute<T>(
    translator: &T,
    filter: Filter,
) -> TranslationResult<Option<Filter>>
where
    T: FilterTranslator + ?Sized,
{
    match filter {
        Filter::And(left, right) => {
            let left = simplify_and_distribute(translator, *left)?;
            let right = simplify_and_distribute(translator, *right)?;
            match (left, right) {
                (None, other) | (other, None) => Ok(other),
                (Some(left), Some(right)) => simplify_and(translator, left, right),
            }
        }
        Filter::Or(left, right) => {
            let left = simplify_and_distribute(translator, *left)?;
            let right = simplify_and_distribute(translator, *right)?;
            match (left, right) {
                (Some(left), Some(right)) => Ok(Some(FilterBuilder::or(left, right))),
                // An unconstrained branch makes the whole OR unconstrained.
                _ => Ok(None),
            }
        }
        leaf => Ok(create_leaf_expression(translator, &leaf)?.map(|_| leaf)),
    }
}

fn simplify_and<T>(translator: &T, left: Filter, right: Filter) -> TranslationResult<Option<Filter>>
where
    T: FilterTranslator + ?Sized,
{
    let left_exprs = translate_internal(translator, &left)?;
    let right_exprs = translate_internal(translator, &right)?;
    if left_exprs.is_empty() {
        return Err(TranslationError::EmptyOperand {
            filter: left.to_string(),
        });
    }
    if right_exprs.is_empty() {
        return Err(TranslationError::EmptyOperand {
            filter: right.to_string(),
        });
    }

    if !any_and_possible(translator, &left_exprs, &right_exprs) {
        warn!(
            "AND of {} and {} cannot be expressed natively, dropping the side with more queries",
            left, right
        );
        return Ok(Some(if left_exprs.len() <= right_exprs.len() {
            left
        } else {
            right
        }));
    }

    if left_exprs.len() > 1 {
        return match left {
            Filter::Or(a, b) => {
                trace!("Distributing {} over left OR ({} or {})", right, a, b);
                let distributed = FilterBuilder::or(
                    FilterBuilder::and(*a, right.clone()),
                    FilterBuilder::and(*b, right),
                );
                simplify_and_distribute(translator, distributed)
            }
            other => Err(TranslationError::UnexpectedMultiExpression {
                filter: other.to_string(),
            }),
        };
    }

    if right_exprs.len() > 1 {
        return match right {
            Filter::Or(a, b) => {
                trace!("Distributing {} over right OR ({} or {})", left, a, b);
                let distributed = FilterBuilder::or(
                    FilterBuilder::and(left.clone(), *a),
                    FilterBuilder::and(left, *b),
                );
                simplify_and_distribute(translator, distributed)
            }
            other => Err(TranslationError::UnexpectedMultiExpression {
                filter: other.to_string(),
            }),
        };
    }

    Ok(Some(FilterBuilder::and(left, right)))
}

/// Whether the AND hook accepts at least one pairing of the two sides.
fn any_and_possible<T>(translator: &T, left: &[T::Query], right: &[T::Query]) -> bool
where
    T: FilterTranslator + ?Sized,
{
    left.iter().any(|l| {
        right
            .iter()
            .any(|r| translator.create_and_expression(l, r).is_some())
    })
}
