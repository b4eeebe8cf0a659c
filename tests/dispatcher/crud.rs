//! Create, update, delete and credential operations through the dispatcher.

use crate::common::{Capabilities, fixtures, seeded_dispatcher};
use connector_framework::attribute::{Attribute, AttributeValue, GuardedString, Uid, names};
use connector_framework::config::FrameworkConfig;
use connector_framework::error::{ConnectorError, ValidationError};
use connector_framework::object::ObjectClass;
use connector_framework::operations::OperationOptions;

fn groups(values: &[&str]) -> Attribute {
    Attribute::multi(names::GROUPS, values.iter().copied()).unwrap()
}

fn values(values: &[&str]) -> Vec<AttributeValue> {
    values.iter().map(|v| AttributeValue::from(*v)).collect()
}

#[tokio::test]
async fn test_create_stores_object() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    assert_eq!(uids.len(), fixtures::ACCOUNTS.len());
    assert_eq!(dispatcher.connector().object_count(), fixtures::ACCOUNTS.len());

    let stored = dispatcher.connector().stored(&uids[0]).unwrap();
    assert_eq!(stored.name().value(), "alice");
    assert_eq!(
        stored.attribute_by_name("mail").unwrap().string_value().unwrap(),
        Some("alice@example.com")
    );
    assert!(stored.attribute_by_name(names::PASSWORD).is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_attribute_sets() {
    let (dispatcher, _) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    let mut with_uid = fixtures::account("frank", "Support", 600);
    with_uid.push(Uid::new("42").unwrap().to_attribute());
    let result = dispatcher.create(&account, with_uid, &options).await;
    assert!(matches!(
        result,
        Err(ConnectorError::Validation(ValidationError::AttributeNotAllowed { attribute, .. }))
            if attribute == names::UID
    ));

    let mut duplicated = fixtures::account("frank", "Support", 600);
    duplicated.push(Attribute::single("MAIL", "other@example.com").unwrap());
    let result = dispatcher.create(&account, duplicated, &options).await;
    assert!(matches!(
        result,
        Err(ConnectorError::Validation(ValidationError::DuplicateAttribute { .. }))
    ));

    let existing = fixtures::account("alice", "Support", 600);
    let result = dispatcher.create(&account, existing, &options).await;
    assert!(matches!(result, Err(ConnectorError::AlreadyExists { .. })));
}

#[tokio::test]
async fn test_update_replaces_values() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    let uid = dispatcher
        .update(
            &account,
            &uids[1],
            vec![Attribute::single("department", "Research").unwrap()],
            &options,
        )
        .await
        .unwrap();
    assert_eq!(uid, uids[1]);

    let bob = dispatcher
        .get_object(&account, &uids[1], &options)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        bob.attribute_by_name("department").unwrap().string_value().unwrap(),
        Some("Research")
    );
}

#[tokio::test]
async fn test_update_validation() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    let empty = dispatcher.update(&account, &uids[0], Vec::new(), &options).await;
    assert!(matches!(
        empty,
        Err(ConnectorError::Validation(ValidationError::Custom { .. }))
    ));

    let uid_change = dispatcher
        .update(
            &account,
            &uids[0],
            vec![Uid::new("77").unwrap().to_attribute()],
            &options,
        )
        .await;
    assert!(matches!(
        uid_change,
        Err(ConnectorError::Validation(ValidationError::AttributeNotAllowed { .. }))
    ));

    let missing = dispatcher
        .update(
            &account,
            &Uid::new("999").unwrap(),
            vec![Attribute::single("department", "Research").unwrap()],
            &options,
        )
        .await;
    assert!(matches!(missing, Err(ConnectorError::ObjectNotFound { .. })));
}

#[tokio::test]
async fn test_add_and_remove_attribute_values() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    dispatcher
        .add_attribute_values(&account, &uids[0], vec![groups(&["admins", "ops"])], &options)
        .await
        .unwrap();
    dispatcher
        .remove_attribute_values(&account, &uids[0], vec![groups(&["admins"])], &options)
        .await
        .unwrap();

    let alice = dispatcher.connector().stored(&uids[0]).unwrap();
    assert_eq!(
        alice.attribute_by_name(names::GROUPS).unwrap().values_or_empty(),
        values(&["ops"]).as_slice()
    );
}

#[tokio::test]
async fn test_value_updates_reject_identity_and_empty_attributes() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    let rename = Attribute::single(names::NAME, "alicia").unwrap();
    let result = dispatcher
        .add_attribute_values(&account, &uids[0], vec![rename], &options)
        .await;
    assert!(matches!(
        result,
        Err(ConnectorError::Validation(ValidationError::AttributeNotAllowed { .. }))
    ));

    let result = dispatcher
        .remove_attribute_values(&account, &uids[0], vec![Attribute::empty(names::GROUPS).unwrap()], &options)
        .await;
    assert!(matches!(
        result,
        Err(ConnectorError::Validation(ValidationError::ExpectedValues { .. }))
    ));

    let result = dispatcher
        .add_attribute_values(&account, &uids[0], Vec::new(), &options)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_merge_attribute_values_through_replace() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    dispatcher
        .merge_attribute_values(&account, &uids[2], vec![groups(&["a", "b"])], Vec::new(), &options)
        .await
        .unwrap();
    dispatcher
        .merge_attribute_values(
            &account,
            &uids[2],
            vec![groups(&["b", "c"])],
            vec![groups(&["a"])],
            &options,
        )
        .await
        .unwrap();

    let carol = dispatcher.connector().stored(&uids[2]).unwrap();
    assert_eq!(
        carol.attribute_by_name(names::GROUPS).unwrap().values_or_empty(),
        values(&["b", "c"]).as_slice()
    );
    // Untouched attributes survive the replace.
    assert!(carol.attribute_by_name("department").is_some());

    let missing = dispatcher
        .merge_attribute_values(
            &account,
            &Uid::new("999").unwrap(),
            vec![groups(&["a"])],
            Vec::new(),
            &options,
        )
        .await;
    assert!(matches!(missing, Err(ConnectorError::ObjectNotFound { .. })));

    let nothing = dispatcher
        .merge_attribute_values(&account, &uids[2], Vec::new(), Vec::new(), &options)
        .await;
    assert!(matches!(
        nothing,
        Err(ConnectorError::Validation(ValidationError::Custom { .. }))
    ));
}

#[tokio::test]
async fn test_delete() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    dispatcher.delete(&account, &uids[4], &options).await.unwrap();
    assert_eq!(dispatcher.connector().object_count(), fixtures::ACCOUNTS.len() - 1);
    assert!(
        dispatcher
            .get_object(&account, &uids[4], &options)
            .await
            .unwrap()
            .is_none()
    );

    let again = dispatcher.delete(&account, &uids[4], &options).await;
    assert!(matches!(again, Err(ConnectorError::ObjectNotFound { .. })));
}

#[tokio::test]
async fn test_authenticate_and_resolve_username() {
    let (dispatcher, uids) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let account = ObjectClass::account();
    let options = OperationOptions::none();

    let uid = dispatcher
        .authenticate(&account, "alice", &GuardedString::new("alice-secret"), &options)
        .await
        .unwrap();
    assert_eq!(uid, uids[0]);

    let wrong = dispatcher
        .authenticate(&account, "alice", &GuardedString::new("guess"), &options)
        .await;
    assert!(matches!(wrong, Err(ConnectorError::InvalidCredential { username }) if username == "alice"));

    let blank = dispatcher
        .authenticate(&account, "  ", &GuardedString::new("x"), &options)
        .await;
    assert!(matches!(blank, Err(ConnectorError::Validation(_))));

    let resolved = dispatcher
        .resolve_username(&account, "bob", &options)
        .await
        .unwrap();
    assert_eq!(resolved, uids[1]);

    let unknown = dispatcher
        .resolve_username(&account, "mallory", &options)
        .await;
    assert!(matches!(unknown, Err(ConnectorError::ObjectNotFound { .. })));
}
