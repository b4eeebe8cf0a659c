//! Resource objects and object classes.
//!
//! A [`ConnectorObject`] is what a connector hands back from a search or a
//! sync: an object class plus an attribute set that always carries a Uid and
//! a Name.

use crate::attribute::{Attribute, Name, Uid, names, util};
use crate::error::{ValidationError, ValidationResult};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A named category of resource object, such as accounts or groups.
///
/// Names compare case-insensitively.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectClass(String);

impl ObjectClass {
    pub const ACCOUNT_NAME: &'static str = "__ACCOUNT__";
    pub const GROUP_NAME: &'static str = "__GROUP__";
    /// Pseudo class matching every object class, used by sync.
    pub const ALL_NAME: &'static str = "__ALL__";

    pub fn new(name: impl Into<String>) -> ValidationResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        Ok(Self(name))
    }

    pub fn account() -> Self {
        Self(Self::ACCOUNT_NAME.to_string())
    }

    pub fn group() -> Self {
        Self(Self::GROUP_NAME.to_string())
    }

    pub fn all() -> Self {
        Self(Self::ALL_NAME.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is(&self, name: &str) -> bool {
        names::names_equal(&self.0, name)
    }

    pub fn is_special(&self) -> bool {
        names::is_special_name(&self.0)
    }

    pub fn is_all(&self) -> bool {
        self.is(Self::ALL_NAME)
    }
}

impl PartialEq for ObjectClass {
    fn eq(&self, other: &Self) -> bool {
        self.is(&other.0)
    }
}

impl Eq for ObjectClass {}

impl Hash for ObjectClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_lowercase().hash(state);
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object read from the resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorObject {
    object_class: ObjectClass,
    #[serde(skip)]
    uid: Uid,
    #[serde(skip)]
    name: Name,
    attributes: Vec<Attribute>,
}

impl ConnectorObject {
    pub fn object_class(&self) -> &ObjectClass {
        &self.object_class
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// All attributes, including `__UID__` and `__NAME__`.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by name, ignoring case.
    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        util::find(name, &self.attributes)
    }

    /// Copy of this object restricted to the named attributes.
    ///
    /// `__UID__` and `__NAME__` are always kept.
    pub fn retain_attributes(&self, keep: &[String]) -> ConnectorObject {
        let attributes = self
            .attributes
            .iter()
            .filter(|attr| {
                attr.is(names::UID)
                    || attr.is(names::NAME)
                    || keep.iter().any(|name| attr.is(name))
            })
            .cloned()
            .collect();

        ConnectorObject {
            object_class: self.object_class.clone(),
            uid: self.uid.clone(),
            name: self.name.clone(),
            attributes,
        }
    }

    /// Render the object as JSON for diagnostics.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Builder for [`ConnectorObject`].
///
/// The object class defaults to `__ACCOUNT__`. Adding an attribute whose name
/// is already present replaces the earlier one. [`build`](Self::build) fails
/// unless both a Uid and a Name were supplied.
#[derive(Debug, Clone)]
pub struct ConnectorObjectBuilder {
    object_class: ObjectClass,
    attributes: Vec<Attribute>,
}

impl Default for ConnectorObjectBuilder {
    fn default() -> Self {
        Self {
            object_class: ObjectClass::account(),
            attributes: Vec::new(),
        }
    }
}

impl ConnectorObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_class(mut self, object_class: ObjectClass) -> Self {
        self.object_class = object_class;
        self
    }

    pub fn uid(self, uid: Uid) -> Self {
        self.add_attribute(uid.to_attribute())
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.add_attribute(Name::new(name).to_attribute())
    }

    pub fn add_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.retain(|existing| !existing.is(attribute.name()));
        self.attributes.push(attribute);
        self
    }

    pub fn add_attributes(self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        attributes
            .into_iter()
            .fold(self, |builder, attr| builder.add_attribute(attr))
    }

    pub fn build(self) -> ValidationResult<ConnectorObject> {
        let uid = util::get_uid(&self.attributes)?.ok_or(ValidationError::MissingUid)?;
        let name = util::get_name(&self.attributes)?.ok_or(ValidationError::MissingName)?;

        Ok(ConnectorObject {
            object_class: self.object_class,
            uid,
            name,
            attributes: self.attributes,
        })
    }
}
