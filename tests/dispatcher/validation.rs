//! Request validation against the schema and configuration, and timeouts.

use crate::common::{
    Capabilities, InMemoryConnector, MemoryConfig, dispatcher, fixtures, init_logging,
    seeded_dispatcher,
};
use connector_framework::attribute::{Attribute, Uid};
use connector_framework::config::FrameworkConfig;
use connector_framework::error::ConnectorError;
use connector_framework::object::{ConnectorObject, ObjectClass};
use connector_framework::operations::{
    OperationDispatcher, OperationKind, OperationOptions, OperationOptionsBuilder,
};
use std::time::Duration;

#[test]
fn test_invalid_configuration_is_rejected() {
    init_logging();
    let blank = InMemoryConnector::with_config(
        MemoryConfig {
            instance: " ".to_string(),
        },
        Capabilities::all(),
    );
    let result = OperationDispatcher::new(blank, FrameworkConfig::default());
    assert!(matches!(result, Err(ConnectorError::InvalidConfiguration { .. })));

    let framework = FrameworkConfig {
        query_count_warning_threshold: 0,
        ..FrameworkConfig::default()
    };
    let result = OperationDispatcher::new(InMemoryConnector::new(Capabilities::all()), framework);
    assert!(matches!(result, Err(ConnectorError::InvalidConfiguration { .. })));
}

#[tokio::test]
async fn test_schema_is_fetched_and_attached() {
    let dispatcher = dispatcher(Capabilities::all());
    assert!(dispatcher.attached_schema().is_none());

    let schema = dispatcher.schema().await.unwrap();
    assert!(schema.find_object_class_info("__account__").is_some());

    let dispatcher = dispatcher.with_connector_schema().await.unwrap();
    let attached = dispatcher.attached_schema().unwrap();
    assert!(attached.supports_object_class(OperationKind::Update, &ObjectClass::account()));
    assert!(!attached.supports_object_class(OperationKind::Update, &ObjectClass::group()));
}

#[tokio::test]
async fn test_unsupported_object_class_is_rejected() {
    let (dispatcher, _) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let options = OperationOptions::none();

    let result = dispatcher
        .update(
            &ObjectClass::group(),
            &Uid::new("1").unwrap(),
            vec![Attribute::single("members", "alice").unwrap()],
            &options,
        )
        .await;
    assert!(matches!(
        result,
        Err(ConnectorError::UnsupportedObjectClass { object_class, operation })
            if object_class == "__GROUP__" && operation == "update"
    ));

    let printers = ObjectClass::new("printer").unwrap();
    let result = dispatcher
        .create(&printers, fixtures::group("hp", &[]), &options)
        .await;
    assert!(matches!(result, Err(ConnectorError::UnsupportedObjectClass { .. })));
}

#[tokio::test]
async fn test_all_class_is_only_for_sync() {
    let unchecked = dispatcher(Capabilities::all());
    let mut ignore = |_: ConnectorObject| true;
    let result = unchecked
        .search(&ObjectClass::all(), None, &mut ignore, &OperationOptions::none())
        .await;
    assert!(matches!(result, Err(ConnectorError::UnsupportedObjectClass { .. })));

    let token = unchecked.latest_sync_token(&ObjectClass::all()).await;
    assert!(token.is_ok());
}

#[tokio::test]
async fn test_custom_class_allowed_without_schema() {
    let unchecked = dispatcher(Capabilities::all());
    let printers = ObjectClass::new("printer").unwrap();

    let uid = unchecked
        .create(&printers, fixtures::group("hp", &["floor-2"]), &OperationOptions::none())
        .await
        .unwrap();
    assert!(
        unchecked
            .get_object(&printers, &uid, &OperationOptions::none())
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_unsupported_option_is_rejected() {
    let (dispatcher, _) = seeded_dispatcher(Capabilities::all(), FrameworkConfig::default()).await;
    let paged = OperationOptionsBuilder::new().page_size(10).build();

    let result = dispatcher
        .create(
            &ObjectClass::account(),
            fixtures::account("frank", "Support", 600),
            &paged,
        )
        .await;
    assert!(matches!(
        result,
        Err(ConnectorError::UnsupportedOption { option, operation })
            if option == "PAGE_SIZE" && operation == "create"
    ));

    let mut ignore = |_: ConnectorObject| true;
    let allowed = dispatcher
        .search(&ObjectClass::account(), None, &mut ignore, &paged)
        .await;
    assert!(allowed.is_ok());
}

#[tokio::test]
async fn test_operation_timeout() {
    init_logging();
    let connector = InMemoryConnector::new(Capabilities::all()).with_test_delay(Duration::from_millis(500));
    let config = FrameworkConfig::builder()
        .operation_timeout(OperationKind::Test, Duration::from_millis(20))
        .build()
        .unwrap();
    let slow = OperationDispatcher::new(connector, config).unwrap();

    let result = slow.test().await;
    assert!(matches!(
        result,
        Err(ConnectorError::OperationTimeout { operation, timeout })
            if operation == "test" && timeout == Duration::from_millis(20)
    ));

    let fast = dispatcher(Capabilities::all());
    assert!(fast.test().await.is_ok());
    fast.dispose().await;
}
