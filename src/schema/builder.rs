//! Schema assembly.

use super::{ObjectClassInfo, OperationOptionInfo, Schema};
use crate::error::{SchemaError, SchemaResult};
use crate::operations::OperationKind;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Assembles a [`Schema`] for a connector.
///
/// Created with the operations the connector implements. Object classes and
/// options are supported by every implemented operation that takes them
/// unless restricted at definition; support can be adjusted afterwards with
/// the add/remove methods.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    implemented: BTreeSet<OperationKind>,
    object_class_infos: Vec<ObjectClassInfo>,
    operation_option_infos: Vec<OperationOptionInfo>,
    supported_object_classes: BTreeMap<OperationKind, Vec<String>>,
    supported_options: BTreeMap<OperationKind, Vec<String>>,
}

impl SchemaBuilder {
    pub fn new(implemented: impl IntoIterator<Item = OperationKind>) -> Self {
        let implemented: BTreeSet<OperationKind> = implemented.into_iter().collect();
        let per_operation = || {
            implemented
                .iter()
                .map(|operation| (*operation, Vec::new()))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            supported_object_classes: per_operation(),
            supported_options: per_operation(),
            implemented,
            object_class_infos: Vec::new(),
            operation_option_infos: Vec::new(),
        }
    }

    /// Declare an object class supported by every implemented object operation.
    pub fn define_object_class(&mut self, info: ObjectClassInfo) -> SchemaResult<()> {
        let operations = self.default_operations();
        self.define_object_class_for(info, operations)
    }

    /// Declare an object class supported only by `operations`.
    pub fn define_object_class_for(
        &mut self,
        info: ObjectClassInfo,
        operations: impl IntoIterator<Item = OperationKind>,
    ) -> SchemaResult<()> {
        if self.object_class_infos.iter().any(|existing| existing.is(info.type_name())) {
            return Err(SchemaError::DuplicateObjectClass {
                name: info.type_name().to_string(),
            });
        }
        let operations = self.check_implemented(operations)?;
        let name = info.type_name().to_string();
        self.object_class_infos.push(info);
        for operation in operations {
            add_unique(&mut self.supported_object_classes, operation, &name);
        }
        debug!("Defined object class {}", name);
        Ok(())
    }

    /// Declare an option supported by every implemented object operation.
    pub fn define_operation_option(&mut self, info: OperationOptionInfo) -> SchemaResult<()> {
        let operations = self.default_operations();
        self.define_operation_option_for(info, operations)
    }

    pub fn define_operation_option_for(
        &mut self,
        info: OperationOptionInfo,
        operations: impl IntoIterator<Item = OperationKind>,
    ) -> SchemaResult<()> {
        if self
            .operation_option_infos
            .iter()
            .any(|existing| existing.name() == info.name())
        {
            return Err(SchemaError::DuplicateOperationOption {
                name: info.name().to_string(),
            });
        }
        let operations = self.check_implemented(operations)?;
        let name = info.name().to_string();
        self.operation_option_infos.push(info);
        for operation in operations {
            add_unique(&mut self.supported_options, operation, &name);
        }
        Ok(())
    }

    pub fn add_supported_object_class(
        &mut self,
        operation: OperationKind,
        object_class: &str,
    ) -> SchemaResult<()> {
        let name = self.declared_object_class(object_class)?;
        self.check_implemented([operation])?;
        add_unique(&mut self.supported_object_classes, operation, &name);
        Ok(())
    }

    pub fn remove_supported_object_class(
        &mut self,
        operation: OperationKind,
        object_class: &str,
    ) -> SchemaResult<()> {
        let name = self.declared_object_class(object_class)?;
        self.check_implemented([operation])?;
        if let Some(classes) = self.supported_object_classes.get_mut(&operation) {
            classes.retain(|existing| *existing != name);
        }
        Ok(())
    }

    pub fn add_supported_operation_option(
        &mut self,
        operation: OperationKind,
        option: &str,
    ) -> SchemaResult<()> {
        self.declared_option(option)?;
        self.check_implemented([operation])?;
        add_unique(&mut self.supported_options, operation, option);
        Ok(())
    }

    pub fn remove_supported_operation_option(
        &mut self,
        operation: OperationKind,
        option: &str,
    ) -> SchemaResult<()> {
        self.declared_option(option)?;
        self.check_implemented([operation])?;
        if let Some(options) = self.supported_options.get_mut(&operation) {
            options.retain(|existing| existing != option);
        }
        Ok(())
    }

    /// Drop all per-operation object class support, keeping the declarations.
    pub fn clear_supported_object_classes_by_operation(&mut self) {
        self.supported_object_classes.values_mut().for_each(Vec::clear);
    }

    pub fn clear_supported_options_by_operation(&mut self) {
        self.supported_options.values_mut().for_each(Vec::clear);
    }

    pub fn build(self) -> SchemaResult<Schema> {
        if self.object_class_infos.is_empty() {
            return Err(SchemaError::NoObjectClasses);
        }
        debug!(
            "Built schema with {} object classes and {} operation options",
            self.object_class_infos.len(),
            self.operation_option_infos.len()
        );
        Ok(Schema {
            object_class_infos: self.object_class_infos,
            operation_option_infos: self.operation_option_infos,
            supported_object_classes_by_operation: self.supported_object_classes,
            supported_options_by_operation: self.supported_options,
        })
    }

    fn default_operations(&self) -> Vec<OperationKind> {
        self.implemented
            .iter()
            .copied()
            .filter(|operation| operation.takes_object_class())
            .collect()
    }

    fn check_implemented(
        &self,
        operations: impl IntoIterator<Item = OperationKind>,
    ) -> SchemaResult<Vec<OperationKind>> {
        operations
            .into_iter()
            .map(|operation| {
                if self.implemented.contains(&operation) {
                    Ok(operation)
                } else {
                    Err(SchemaError::OperationNotImplemented {
                        operation: operation.to_string(),
                    })
                }
            })
            .collect()
    }

    /// The declared spelling of an object class name.
    fn declared_object_class(&self, name: &str) -> SchemaResult<String> {
        self.object_class_infos
            .iter()
            .find(|info| info.is(name))
            .map(|info| info.type_name().to_string())
            .ok_or_else(|| SchemaError::UndefinedObjectClass {
                name: name.to_string(),
            })
    }

    fn declared_option(&self, name: &str) -> SchemaResult<()> {
        if self
            .operation_option_infos
            .iter()
            .any(|info| info.name() == name)
        {
            Ok(())
        } else {
            Err(SchemaError::UndefinedOperationOption {
                name: name.to_string(),
            })
        }
    }
}

fn add_unique(map: &mut BTreeMap<OperationKind, Vec<String>>, operation: OperationKind, name: &str) {
    let names = map.entry(operation).or_default();
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}
