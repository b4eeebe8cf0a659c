//! Helpers over attribute collections.

use super::attribute::Attribute;
use super::guarded::GuardedString;
use super::names;
use super::uid::{Name, Uid};
use crate::error::ValidationResult;
use std::collections::HashMap;

/// Find an attribute by name, ignoring case.
pub fn find<'a>(name: &str, attributes: &'a [Attribute]) -> Option<&'a Attribute> {
    attributes.iter().find(|attr| attr.is(name))
}

/// Index attributes by lowercased name.
///
/// Later attributes with the same name replace earlier ones.
pub fn to_map(attributes: &[Attribute]) -> HashMap<String, &Attribute> {
    attributes
        .iter()
        .map(|attr| (attr.name().to_lowercase(), attr))
        .collect()
}

/// Find the first attribute name that occurs more than once, ignoring case.
pub fn find_duplicate_name(attributes: &[Attribute]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    attributes
        .iter()
        .find(|attr| !seen.insert(attr.name().to_lowercase()))
        .map(Attribute::name)
}

pub fn contains_uid(attributes: &[Attribute]) -> bool {
    find(names::UID, attributes).is_some()
}

pub fn get_uid(attributes: &[Attribute]) -> ValidationResult<Option<Uid>> {
    find(names::UID, attributes).map(Uid::try_from).transpose()
}

pub fn get_name(attributes: &[Attribute]) -> ValidationResult<Option<Name>> {
    find(names::NAME, attributes).map(Name::try_from).transpose()
}

pub fn get_password(attributes: &[Attribute]) -> Option<&GuardedString> {
    find(names::PASSWORD, attributes)
        .and_then(|attr| attr.values_or_empty().first())
        .and_then(|value| value.as_guarded_string())
}

pub fn get_current_password(attributes: &[Attribute]) -> Option<&GuardedString> {
    find(names::CURRENT_PASSWORD, attributes)
        .and_then(|attr| attr.values_or_empty().first())
        .and_then(|value| value.as_guarded_string())
}

/// Value of the `__ENABLE__` operational attribute, if present.
pub fn is_enabled(attributes: &[Attribute]) -> ValidationResult<Option<bool>> {
    match find(names::ENABLE, attributes) {
        Some(attr) => attr.bool_value(),
        None => Ok(None),
    }
}

/// Split attributes into regular and reserved `__NAME__`-form ones.
pub fn partition_special(attributes: &[Attribute]) -> (Vec<&Attribute>, Vec<&Attribute>) {
    attributes.iter().partition(|attr| !attr.is_special())
}
