//! Attribute, object class and operation option descriptions.
//!
//! These are what a connector reports about the resource: which object
//! classes exist, which attributes they carry and how each attribute may be
//! used.

use crate::attribute::{AttributeValueType, names};
use crate::error::{SchemaError, SchemaResult};
use crate::object::ObjectClass;
use crate::operations::options;
use serde::Serialize;

/// Description of one attribute of an object class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInfo {
    name: String,
    value_type: AttributeValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    native_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtype: Option<String>,
    required: bool,
    multi_valued: bool,
    creatable: bool,
    updateable: bool,
    readable: bool,
    returned_by_default: bool,
}

impl AttributeInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> AttributeValueType {
        self.value_type
    }

    /// Resource-side name, when it differs from the framework name.
    pub fn native_name(&self) -> Option<&str> {
        self.native_name.as_deref()
    }

    /// Finer-grained type hint, e.g. `"caseIgnore"` or `"ldap:dn"`.
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn is_creatable(&self) -> bool {
        self.creatable
    }

    pub fn is_updateable(&self) -> bool {
        self.updateable
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    pub fn is_returned_by_default(&self) -> bool {
        self.returned_by_default
    }

    /// Case-insensitive name check.
    pub fn is(&self, name: &str) -> bool {
        names::names_equal(&self.name, name)
    }

    /// The default `__NAME__` info: a required single-valued string.
    pub fn name_info() -> Self {
        AttributeInfoBuilder::new(names::NAME)
            .required(true)
            .build_unchecked()
    }

    /// `__PASSWORD__`: write-only guarded string.
    pub fn password() -> Self {
        AttributeInfoBuilder::new(names::PASSWORD)
            .value_type(AttributeValueType::GuardedString)
            .readable(false)
            .returned_by_default(false)
            .build_unchecked()
    }

    /// `__CURRENT_PASSWORD__`: supplied alongside a password change.
    pub fn current_password() -> Self {
        AttributeInfoBuilder::new(names::CURRENT_PASSWORD)
            .value_type(AttributeValueType::GuardedString)
            .creatable(false)
            .readable(false)
            .returned_by_default(false)
            .build_unchecked()
    }

    pub fn enable() -> Self {
        Self::operational(names::ENABLE, AttributeValueType::Boolean)
    }

    pub fn lock_out() -> Self {
        Self::operational(names::LOCK_OUT, AttributeValueType::Boolean)
    }

    pub fn password_expired() -> Self {
        Self::operational(names::PASSWORD_EXPIRED, AttributeValueType::Boolean)
    }

    pub fn enable_date() -> Self {
        Self::operational(names::ENABLE_DATE, AttributeValueType::Long)
    }

    pub fn disable_date() -> Self {
        Self::operational(names::DISABLE_DATE, AttributeValueType::Long)
    }

    pub fn password_expiration_date() -> Self {
        Self::operational(names::PASSWORD_EXPIRATION_DATE, AttributeValueType::Long)
    }

    pub fn last_login_date() -> Self {
        AttributeInfoBuilder::new(names::LAST_LOGIN_DATE)
            .value_type(AttributeValueType::Long)
            .creatable(false)
            .updateable(false)
            .returned_by_default(false)
            .build_unchecked()
    }

    /// `__GROUPS__`: multi-valued, fetched only on request.
    pub fn groups() -> Self {
        AttributeInfoBuilder::new(names::GROUPS)
            .multi_valued(true)
            .returned_by_default(false)
            .build_unchecked()
    }

    fn operational(name: &str, value_type: AttributeValueType) -> Self {
        AttributeInfoBuilder::new(name)
            .value_type(value_type)
            .returned_by_default(false)
            .build_unchecked()
    }
}

/// Builder for [`AttributeInfo`].
///
/// Defaults: string, optional, single-valued, creatable, updateable,
/// readable, returned by default.
#[derive(Debug, Clone)]
pub struct AttributeInfoBuilder {
    info: AttributeInfo,
}

impl AttributeInfoBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: AttributeInfo {
                name: name.into(),
                value_type: AttributeValueType::String,
                native_name: None,
                subtype: None,
                required: false,
                multi_valued: false,
                creatable: true,
                updateable: true,
                readable: true,
                returned_by_default: true,
            },
        }
    }

    pub fn value_type(mut self, value_type: AttributeValueType) -> Self {
        self.info.value_type = value_type;
        self
    }

    pub fn native_name(mut self, native_name: impl Into<String>) -> Self {
        self.info.native_name = Some(native_name.into());
        self
    }

    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.info.subtype = Some(subtype.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.info.required = required;
        self
    }

    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.info.multi_valued = multi_valued;
        self
    }

    pub fn creatable(mut self, creatable: bool) -> Self {
        self.info.creatable = creatable;
        self
    }

    pub fn updateable(mut self, updateable: bool) -> Self {
        self.info.updateable = updateable;
        self
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.info.readable = readable;
        self
    }

    pub fn returned_by_default(mut self, returned_by_default: bool) -> Self {
        self.info.returned_by_default = returned_by_default;
        self
    }

    pub fn build(self) -> SchemaResult<AttributeInfo> {
        let info = self.info;
        if info.name.trim().is_empty() {
            return Err(SchemaError::BlankName);
        }
        if names::is_password_name(&info.name)
            && info.value_type != AttributeValueType::GuardedString
        {
            return Err(SchemaError::InvalidAttributeInfo {
                attribute: info.name,
                message: "password attributes must hold guarded strings".to_string(),
            });
        }
        if info.is(names::NAME) && (info.multi_valued || info.value_type != AttributeValueType::String) {
            return Err(SchemaError::InvalidAttributeInfo {
                attribute: info.name,
                message: "__NAME__ must be a single-valued string".to_string(),
            });
        }
        if info.is(names::UID) {
            return Err(SchemaError::InvalidAttributeInfo {
                attribute: info.name,
                message: "__UID__ is implicit and must not be declared".to_string(),
            });
        }
        Ok(info)
    }

    /// For the predefined infos above, which are valid by construction.
    fn build_unchecked(self) -> AttributeInfo {
        self.info
    }
}

/// Description of one object class.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectClassInfo {
    #[serde(rename = "type")]
    object_class: ObjectClass,
    attribute_infos: Vec<AttributeInfo>,
    container: bool,
    auxiliary: bool,
}

impl ObjectClassInfo {
    pub fn object_class(&self) -> &ObjectClass {
        &self.object_class
    }

    pub fn type_name(&self) -> &str {
        self.object_class.name()
    }

    pub fn attribute_infos(&self) -> &[AttributeInfo] {
        &self.attribute_infos
    }

    pub fn attribute_info(&self, name: &str) -> Option<&AttributeInfo> {
        self.attribute_infos.iter().find(|info| info.is(name))
    }

    /// Whether objects of this class can contain other objects.
    pub fn is_container(&self) -> bool {
        self.container
    }

    /// Auxiliary classes only add attributes to other classes.
    pub fn is_auxiliary(&self) -> bool {
        self.auxiliary
    }

    pub fn is(&self, name: &str) -> bool {
        self.object_class.is(name)
    }
}

/// Builder for [`ObjectClassInfo`].
#[derive(Debug, Clone)]
pub struct ObjectClassInfoBuilder {
    object_class: ObjectClass,
    attribute_infos: Vec<AttributeInfo>,
    container: bool,
    auxiliary: bool,
}

impl ObjectClassInfoBuilder {
    pub fn new(object_class: ObjectClass) -> Self {
        Self {
            object_class,
            attribute_infos: Vec::new(),
            container: false,
            auxiliary: false,
        }
    }

    pub fn add_attribute_info(mut self, info: AttributeInfo) -> Self {
        self.attribute_infos.push(info);
        self
    }

    pub fn add_all_attribute_infos(mut self, infos: impl IntoIterator<Item = AttributeInfo>) -> Self {
        self.attribute_infos.extend(infos);
        self
    }

    pub fn container(mut self, container: bool) -> Self {
        self.container = container;
        self
    }

    pub fn auxiliary(mut self, auxiliary: bool) -> Self {
        self.auxiliary = auxiliary;
        self
    }

    /// Validate and build.
    ///
    /// Fails on duplicate attribute names. A structural class without a
    /// `__NAME__` info gets [`AttributeInfo::name_info`] prepended.
    pub fn build(mut self) -> SchemaResult<ObjectClassInfo> {
        for (i, info) in self.attribute_infos.iter().enumerate() {
            if self.attribute_infos[..i].iter().any(|seen| seen.is(info.name())) {
                return Err(SchemaError::DuplicateAttributeInfo {
                    object_class: self.object_class.name().to_string(),
                    attribute: info.name().to_string(),
                });
            }
        }

        let has_name = self.attribute_infos.iter().any(|info| info.is(names::NAME));
        if !has_name && !self.auxiliary {
            self.attribute_infos.insert(0, AttributeInfo::name_info());
        }

        Ok(ObjectClassInfo {
            object_class: self.object_class,
            attribute_infos: self.attribute_infos,
            container: self.container,
            auxiliary: self.auxiliary,
        })
    }
}

/// Value type of an operation option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionValueType {
    String,
    StringList,
    Integer,
    Boolean,
    GuardedString,
    SortKeys,
    Scope,
    ObjectReference,
}

/// Description of one operation option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOptionInfo {
    name: String,
    value_type: OptionValueType,
}

impl OperationOptionInfo {
    pub fn new(name: impl Into<String>, value_type: OptionValueType) -> SchemaResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::BlankName);
        }
        Ok(Self { name, value_type })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> OptionValueType {
        self.value_type
    }

    pub fn attributes_to_get() -> Self {
        Self::known(options::ATTRIBUTES_TO_GET, OptionValueType::StringList)
    }

    pub fn page_size() -> Self {
        Self::known(options::PAGE_SIZE, OptionValueType::Integer)
    }

    pub fn paged_results_cookie() -> Self {
        Self::known(options::PAGED_RESULTS_COOKIE, OptionValueType::String)
    }

    pub fn paged_results_offset() -> Self {
        Self::known(options::PAGED_RESULTS_OFFSET, OptionValueType::Integer)
    }

    pub fn sort_keys() -> Self {
        Self::known(options::SORT_KEYS, OptionValueType::SortKeys)
    }

    pub fn scope() -> Self {
        Self::known(options::SCOPE, OptionValueType::Scope)
    }

    pub fn container() -> Self {
        Self::known(options::CONTAINER, OptionValueType::ObjectReference)
    }

    pub fn run_as_user() -> Self {
        Self::known(options::RUN_AS_USER, OptionValueType::String)
    }

    pub fn run_with_password() -> Self {
        Self::known(options::RUN_WITH_PASSWORD, OptionValueType::GuardedString)
    }

    pub fn allow_partial_results() -> Self {
        Self::known(options::ALLOW_PARTIAL_RESULTS, OptionValueType::Boolean)
    }

    pub fn allow_partial_attribute_values() -> Self {
        Self::known(options::ALLOW_PARTIAL_ATTRIBUTE_VALUES, OptionValueType::Boolean)
    }

    pub fn fail_on_error() -> Self {
        Self::known(options::FAIL_ON_ERROR, OptionValueType::Boolean)
    }

    pub fn require_serial() -> Self {
        Self::known(options::REQUIRE_SERIAL, OptionValueType::Boolean)
    }

    fn known(name: &str, value_type: OptionValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
        }
    }
}
