//! Connector schema.
//!
//! A [`Schema`] lists the object classes and operation options a connector
//! supports and, per operation, which of them that operation accepts. It is
//! assembled once with [`SchemaBuilder`] and read-only afterwards; the
//! operation dispatcher consults it to reject unsupported requests before
//! they reach the connector.
//!
//! ```rust
//! use connector_framework::object::ObjectClass;
//! use connector_framework::operations::OperationKind;
//! use connector_framework::schema::{AttributeInfoBuilder, ObjectClassInfoBuilder, SchemaBuilder};
//!
//! let account = ObjectClassInfoBuilder::new(ObjectClass::account())
//!     .add_attribute_info(AttributeInfoBuilder::new("mail").build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let mut builder = SchemaBuilder::new([OperationKind::Search, OperationKind::Create]);
//! builder.define_object_class(account).unwrap();
//! let schema = builder.build().unwrap();
//!
//! assert!(schema.supports_object_class(OperationKind::Create, &ObjectClass::account()));
//! assert!(!schema.supports_object_class(OperationKind::Delete, &ObjectClass::account()));
//! ```

mod builder;
mod types;


pub use builder::SchemaBuilder;
pub use types::{
    AttributeInfo, AttributeInfoBuilder, ObjectClassInfo, ObjectClassInfoBuilder,
    OperationOptionInfo, OptionValueType,
};

use crate::attribute::names;
use crate::object::ObjectClass;
use crate::operations::OperationKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// What a connector supports, per operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    object_class_infos: Vec<ObjectClassInfo>,
    operation_option_infos: Vec<OperationOptionInfo>,
    supported_object_classes_by_operation: BTreeMap<OperationKind, Vec<String>>,
    supported_options_by_operation: BTreeMap<OperationKind, Vec<String>>,
}

impl Schema {
    pub fn object_class_infos(&self) -> &[ObjectClassInfo] {
        &self.object_class_infos
    }

    pub fn operation_option_infos(&self) -> &[OperationOptionInfo] {
        &self.operation_option_infos
    }

    /// Look up an object class by name, case-insensitively.
    pub fn find_object_class_info(&self, name: &str) -> Option<&ObjectClassInfo> {
        self.object_class_infos.iter().find(|info| info.is(name))
    }

    pub fn find_operation_option_info(&self, name: &str) -> Option<&OperationOptionInfo> {
        self.operation_option_infos
            .iter()
            .find(|info| info.name() == name)
    }

    /// Object classes accepted by `operation`.
    pub fn supported_object_classes(&self, operation: OperationKind) -> Vec<&ObjectClassInfo> {
        self.supported_object_classes_by_operation
            .get(&operation)
            .into_iter()
            .flatten()
            .filter_map(|name| self.find_object_class_info(name))
            .collect()
    }

    /// Options accepted by `operation`.
    pub fn supported_options(&self, operation: OperationKind) -> Vec<&OperationOptionInfo> {
        self.supported_options_by_operation
            .get(&operation)
            .into_iter()
            .flatten()
            .filter_map(|name| self.find_operation_option_info(name))
            .collect()
    }

    /// Whether `operation` accepts `object_class`.
    ///
    /// `__ALL__` is accepted by sync whenever some class supports sync.
    pub fn supports_object_class(&self, operation: OperationKind, object_class: &ObjectClass) -> bool {
        let Some(classes) = self.supported_object_classes_by_operation.get(&operation) else {
            return false;
        };
        if object_class.is_all() && operation == OperationKind::Sync {
            return !classes.is_empty();
        }
        classes.iter().any(|name| object_class.is(name))
    }

    pub fn supports_option(&self, operation: OperationKind, option: &str) -> bool {
        self.supported_options_by_operation
            .get(&operation)
            .is_some_and(|options| options.iter().any(|name| name == option))
    }

    /// Operations with at least one supported object class.
    pub fn supported_operations(&self) -> impl Iterator<Item = OperationKind> + '_ {
        self.supported_object_classes_by_operation
            .iter()
            .filter(|(_, classes)| !classes.is_empty())
            .map(|(operation, _)| *operation)
    }

    /// Attribute info for `attribute` on `object_class`, if declared.
    pub fn attribute_info(&self, object_class: &ObjectClass, attribute: &str) -> Option<&AttributeInfo> {
        self.find_object_class_info(object_class.name())
            .and_then(|info| info.attribute_info(attribute))
    }

    /// Names of readable attributes returned without an explicit request.
    ///
    /// Always includes `__NAME__`; `__UID__` is implicit.
    pub fn default_attributes_to_get(&self, object_class: &ObjectClass) -> Vec<String> {
        let Some(info) = self.find_object_class_info(object_class.name()) else {
            return Vec::new();
        };
        let mut attributes: Vec<String> = info
            .attribute_infos()
            .iter()
            .filter(|attr| attr.is_readable() && attr.is_returned_by_default())
            .map(|attr| attr.name().to_string())
            .collect();
        if !attributes.iter().any(|name| names::names_equal(name, names::NAME)) {
            attributes.insert(0, names::NAME.to_string());
        }
        attributes
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
