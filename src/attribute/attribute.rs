//! Immutable named, multi-valued attributes.

use super::guarded::GuardedString;
use super::names::{self, names_equal};
use super::value::{AttributeValue, AttributeValueType};
use crate::error::{ValidationError, ValidationResult};
use serde::Serialize;

/// A named attribute with an ordered list of values.
///
/// The value list may be absent, which is distinct from an empty list: an
/// absent list asks the resource to clear the attribute on update.
///
/// Names compare case-insensitively. Reserved attributes carry extra
/// invariants checked at construction:
///
/// - `__UID__` holds exactly one non-blank string
/// - `__NAME__` holds exactly one string
/// - `__PASSWORD__` and `__CURRENT_PASSWORD__` hold exactly one guarded string
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    name: String,
    values: Option<Vec<AttributeValue>>,
}

impl Attribute {
    /// Create a validated attribute.
    pub fn new(
        name: impl Into<String>,
        values: Option<Vec<AttributeValue>>,
    ) -> ValidationResult<Self> {
        let name = name.into();
        Self::validate(&name, values.as_deref())?;
        Ok(Self { name, values })
    }

    /// Create an attribute with exactly one value.
    pub fn single(name: impl Into<String>, value: impl Into<AttributeValue>) -> ValidationResult<Self> {
        Self::new(name, Some(vec![value.into()]))
    }

    /// Create an attribute from any number of values.
    pub fn multi<I, V>(name: impl Into<String>, values: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        Self::new(name, Some(values.into_iter().map(Into::into).collect()))
    }

    /// Create an attribute with an absent value list.
    pub fn empty(name: impl Into<String>) -> ValidationResult<Self> {
        Self::new(name, None)
    }

    /// Create an attribute that is known to be valid.
    pub(crate) fn new_unchecked(name: impl Into<String>, values: Option<Vec<AttributeValue>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> Option<&[AttributeValue]> {
        self.values.as_deref()
    }

    /// Values as a slice, treating an absent list as empty.
    pub fn values_or_empty(&self) -> &[AttributeValue] {
        self.values.as_deref().unwrap_or(&[])
    }

    /// Whether this attribute has the given name, ignoring case.
    pub fn is(&self, name: &str) -> bool {
        names_equal(&self.name, name)
    }

    pub fn is_special(&self) -> bool {
        names::is_special_name(&self.name)
    }

    /// Get the only value of the attribute.
    ///
    /// Returns `Ok(None)` when the attribute has no values and an error when
    /// it has more than one.
    pub fn single_value(&self) -> ValidationResult<Option<&AttributeValue>> {
        match self.values_or_empty() {
            [] => Ok(None),
            [value] => Ok(Some(value)),
            many => Err(ValidationError::ExpectedSingleValue {
                attribute: self.name.clone(),
                actual: many.len(),
            }),
        }
    }

    /// Get the only value of the attribute as a string.
    pub fn string_value(&self) -> ValidationResult<Option<&str>> {
        match self.single_value()? {
            None => Ok(None),
            Some(AttributeValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(ValidationError::invalid_type(
                &self.name,
                AttributeValueType::String.to_string(),
                other.value_type().to_string(),
            )),
        }
    }

    /// Get the only value of the attribute as a boolean.
    pub fn bool_value(&self) -> ValidationResult<Option<bool>> {
        match self.single_value()? {
            None => Ok(None),
            Some(AttributeValue::Boolean(b)) => Ok(Some(*b)),
            Some(other) => Err(ValidationError::invalid_type(
                &self.name,
                AttributeValueType::Boolean.to_string(),
                other.value_type().to_string(),
            )),
        }
    }

    fn validate(name: &str, values: Option<&[AttributeValue]>) -> ValidationResult<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }

        if names_equal(name, names::UID) {
            match Self::require_single(name, values)? {
                AttributeValue::String(s) if s.trim().is_empty() => Err(ValidationError::BlankUid),
                AttributeValue::String(_) => Ok(()),
                other => Err(ValidationError::invalid_type(
                    name,
                    AttributeValueType::String.to_string(),
                    other.value_type().to_string(),
                )),
            }
        } else if names_equal(name, names::NAME) {
            match Self::require_single(name, values)? {
                AttributeValue::String(_) => Ok(()),
                other => Err(ValidationError::invalid_type(
                    name,
                    AttributeValueType::String.to_string(),
                    other.value_type().to_string(),
                )),
            }
        } else if names::is_password_name(name) {
            match Self::require_single(name, values)? {
                AttributeValue::GuardedString(_) => Ok(()),
                other => Err(ValidationError::invalid_type(
                    name,
                    AttributeValueType::GuardedString.to_string(),
                    other.value_type().to_string(),
                )),
            }
        } else {
            Ok(())
        }
    }

    fn require_single<'a>(
        name: &str,
        values: Option<&'a [AttributeValue]>,
    ) -> ValidationResult<&'a AttributeValue> {
        match values.unwrap_or(&[]) {
            [value] => Ok(value),
            other => Err(ValidationError::ExpectedSingleValue {
                attribute: name.to_string(),
                actual: other.len(),
            }),
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        names_equal(&self.name, &other.name) && self.values == other.values
    }
}

/// Accumulates values for an [`Attribute`] and validates on [`build`](Self::build).
///
/// ```rust
/// use connector_framework::attribute::AttributeBuilder;
///
/// let attr = AttributeBuilder::new("mail")
///     .add_value("a@example.com")
///     .add_value("b@example.com")
///     .build()
///     .unwrap();
/// assert_eq!(attr.values().map(|v| v.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeBuilder {
    name: String,
    values: Option<Vec<AttributeValue>>,
}

impl AttributeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.values.get_or_insert_with(Vec::new).push(value.into());
        self
    }

    pub fn add_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.values
            .get_or_insert_with(Vec::new)
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Mark the value list as present even if no value gets added.
    pub fn with_empty_values(mut self) -> Self {
        self.values.get_or_insert_with(Vec::new);
        self
    }

    pub fn build(self) -> ValidationResult<Attribute> {
        Attribute::new(self.name, self.values)
    }

    pub fn password(password: GuardedString) -> Attribute {
        Attribute::new_unchecked(names::PASSWORD, Some(vec![password.into()]))
    }

    pub fn current_password(password: GuardedString) -> Attribute {
        Attribute::new_unchecked(names::CURRENT_PASSWORD, Some(vec![password.into()]))
    }

    pub fn enabled(enabled: bool) -> Attribute {
        Attribute::new_unchecked(names::ENABLE, Some(vec![enabled.into()]))
    }

    pub fn locked_out(locked: bool) -> Attribute {
        Attribute::new_unchecked(names::LOCK_OUT, Some(vec![locked.into()]))
    }

    pub fn password_expired(expired: bool) -> Attribute {
        Attribute::new_unchecked(names::PASSWORD_EXPIRED, Some(vec![expired.into()]))
    }

    pub fn enable_date(epoch_millis: i64) -> Attribute {
        Attribute::new_unchecked(names::ENABLE_DATE, Some(vec![epoch_millis.into()]))
    }

    pub fn disable_date(epoch_millis: i64) -> Attribute {
        Attribute::new_unchecked(names::DISABLE_DATE, Some(vec![epoch_millis.into()]))
    }

    pub fn password_expiration_date(epoch_millis: i64) -> Attribute {
        Attribute::new_unchecked(
            names::PASSWORD_EXPIRATION_DATE,
            Some(vec![epoch_millis.into()]),
        )
    }

    pub fn last_login_date(epoch_millis: i64) -> Attribute {
        Attribute::new_unchecked(names::LAST_LOGIN_DATE, Some(vec![epoch_millis.into()]))
    }

    pub fn last_password_change_date(epoch_millis: i64) -> Attribute {
        Attribute::new_unchecked(
            names::LAST_PASSWORD_CHANGE_DATE,
            Some(vec![epoch_millis.into()]),
        )
    }

    pub fn password_change_interval(millis: i64) -> Attribute {
        Attribute::new_unchecked(names::PASSWORD_CHANGE_INTERVAL, Some(vec![millis.into()]))
    }

    pub fn description(description: impl Into<String>) -> Attribute {
        Attribute::new_unchecked(names::DESCRIPTION, Some(vec![AttributeValue::String(description.into())]))
    }

    pub fn short_name(short_name: impl Into<String>) -> Attribute {
        Attribute::new_unchecked(names::SHORT_NAME, Some(vec![AttributeValue::String(short_name.into())]))
    }
}
