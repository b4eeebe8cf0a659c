//! Test data shared by the integration tests.

use connector_framework::attribute::{Attribute, AttributeBuilder, AttributeValueType, GuardedString};
use connector_framework::error::SchemaResult;
use connector_framework::object::ObjectClass;
use connector_framework::operations::OperationKind;
use connector_framework::schema::{
    AttributeInfo, AttributeInfoBuilder, ObjectClassInfoBuilder, OperationOptionInfo, Schema,
    SchemaBuilder,
};

/// Schema of the in-memory connector: accounts and groups, with paging
/// options on search only.
pub fn schema() -> SchemaResult<Schema> {
    let account = ObjectClassInfoBuilder::new(ObjectClass::account())
        .add_attribute_info(AttributeInfoBuilder::new("mail").required(true).build()?)
        .add_attribute_info(AttributeInfoBuilder::new("department").build()?)
        .add_attribute_info(
            AttributeInfoBuilder::new("employeeNumber")
                .value_type(AttributeValueType::Integer)
                .build()?,
        )
        .add_attribute_info(
            AttributeInfoBuilder::new("title")
                .returned_by_default(false)
                .build()?,
        )
        .add_attribute_info(AttributeInfo::password())
        .add_attribute_info(AttributeInfo::groups())
        .build()?;
    let group = ObjectClassInfoBuilder::new(ObjectClass::group())
        .add_attribute_info(
            AttributeInfoBuilder::new("members")
                .multi_valued(true)
                .build()?,
        )
        .build()?;

    let mut builder = SchemaBuilder::new(OperationKind::ALL);
    builder.define_object_class(account)?;
    builder.define_object_class_for(
        group,
        [
            OperationKind::Create,
            OperationKind::Search,
            OperationKind::Delete,
            OperationKind::Sync,
        ],
    )?;
    builder.define_operation_option_for(OperationOptionInfo::attributes_to_get(), [OperationKind::Search])?;
    builder.define_operation_option_for(OperationOptionInfo::page_size(), [OperationKind::Search])?;
    builder.define_operation_option_for(
        OperationOptionInfo::paged_results_cookie(),
        [OperationKind::Search],
    )?;
    builder.build()
}

/// Attributes of a new account named `name`.
pub fn account(name: &str, department: &str, employee_number: i32) -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("__NAME__").add_value(name).build().unwrap(),
        Attribute::single("mail", format!("{name}@example.com")).unwrap(),
        Attribute::single("department", department).unwrap(),
        Attribute::single("employeeNumber", employee_number).unwrap(),
        Attribute::single("title", "Engineer").unwrap(),
        AttributeBuilder::password(GuardedString::new(&format!("{name}-secret"))),
    ]
}

/// Attributes of a new group with the given members.
pub fn group(name: &str, members: &[&str]) -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("__NAME__").add_value(name).build().unwrap(),
        Attribute::multi("members", members.iter().copied()).unwrap(),
    ]
}

/// Accounts created by [`super::seeded_dispatcher`]: name, department,
/// employee number.
pub const ACCOUNTS: [(&str, &str, i32); 5] = [
    ("alice", "Engineering", 100),
    ("bob", "Engineering", 205),
    ("carol", "Sales", 310),
    ("dave", "Sales", 415),
    ("erin", "Support", 520),
];
