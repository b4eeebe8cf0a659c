//! Typed identity attributes.

use super::attribute::Attribute;
use super::names;
use super::value::AttributeValue;
use crate::error::{ValidationError, ValidationResult};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A validated resource object identifier.
///
/// The value is a non-blank string. An optional revision tracks the object
/// version on resources that expose one; it does not take part in equality.
///
/// ```rust
/// use connector_framework::attribute::Uid;
///
/// let uid = Uid::new("2819c223").unwrap();
/// assert_eq!(uid.value(), "2819c223");
/// assert!(Uid::new("").is_err());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Uid {
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    revision: Option<String>,
}

impl Uid {
    /// Attribute name carrying the Uid.
    pub const NAME: &'static str = names::UID;

    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::BlankUid);
        }
        Ok(Self {
            value,
            revision: None,
        })
    }

    pub fn with_revision(
        value: impl Into<String>,
        revision: impl Into<String>,
    ) -> ValidationResult<Self> {
        let mut uid = Self::new(value)?;
        uid.revision = Some(revision.into());
        Ok(uid)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn to_attribute(&self) -> Attribute {
        Attribute::new_unchecked(
            names::UID,
            Some(vec![AttributeValue::String(self.value.clone())]),
        )
    }
}

impl PartialEq for Uid {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Uid {}

impl Hash for Uid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<&str> for Uid {
    type Error = ValidationError;

    fn try_from(value: &str) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&Attribute> for Uid {
    type Error = ValidationError;

    fn try_from(attribute: &Attribute) -> ValidationResult<Self> {
        if !attribute.is(names::UID) {
            return Err(ValidationError::MissingUid);
        }
        match attribute.string_value()? {
            Some(value) => Self::new(value),
            None => Err(ValidationError::MissingUid),
        }
    }
}

impl From<Uid> for Attribute {
    fn from(uid: Uid) -> Self {
        uid.to_attribute()
    }
}

/// The human-meaningful name of a resource object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Name(String);

impl Name {
    /// Attribute name carrying the Name.
    pub const NAME: &'static str = names::NAME;

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn to_attribute(&self) -> Attribute {
        Attribute::new_unchecked(names::NAME, Some(vec![AttributeValue::String(self.0.clone())]))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&Attribute> for Name {
    type Error = ValidationError;

    fn try_from(attribute: &Attribute) -> ValidationResult<Self> {
        if !attribute.is(names::NAME) {
            return Err(ValidationError::MissingName);
        }
        match attribute.string_value()? {
            Some(value) => Ok(Self::new(value)),
            None => Err(ValidationError::MissingName),
        }
    }
}

impl From<Name> for Attribute {
    fn from(name: Name) -> Self {
        name.to_attribute()
    }
}
