//! Shared test utilities.
//!
//! Provides an in-memory reference connector, fixture data and helpers
//! that build dispatchers around it.

use connector_framework::attribute::Uid;
use connector_framework::config::FrameworkConfig;
use connector_framework::error::ConnectorResult;
use connector_framework::filter::Filter;
use connector_framework::object::{ConnectorObject, ObjectClass};
use connector_framework::operations::{OperationDispatcher, OperationOptions, SearchResult};

pub mod connector;
pub mod fixtures;

pub use connector::{Capabilities, InMemoryConnector, MemoryConfig, MemoryTranslator};

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Dispatcher with default configuration over an empty store.
pub fn dispatcher(capabilities: Capabilities) -> OperationDispatcher<InMemoryConnector> {
    init_logging();
    OperationDispatcher::new(InMemoryConnector::new(capabilities), FrameworkConfig::default())
        .unwrap()
}

/// Dispatcher with the schema attached and [`fixtures::ACCOUNTS`] created.
/// Returns the Uids in fixture order.
pub async fn seeded_dispatcher(
    capabilities: Capabilities,
    config: FrameworkConfig,
) -> (OperationDispatcher<InMemoryConnector>, Vec<Uid>) {
    init_logging();
    let dispatcher = OperationDispatcher::new(InMemoryConnector::new(capabilities), config)
        .unwrap()
        .with_connector_schema()
        .await
        .unwrap();

    let mut uids = Vec::new();
    for (name, department, number) in fixtures::ACCOUNTS {
        let uid = dispatcher
            .create(
                &ObjectClass::account(),
                fixtures::account(name, department, number),
                &OperationOptions::none(),
            )
            .await
            .unwrap();
        uids.push(uid);
    }
    dispatcher.connector().clear_executed_queries();
    (dispatcher, uids)
}

/// Search accounts and collect every delivered object.
pub async fn search_accounts(
    dispatcher: &OperationDispatcher<InMemoryConnector>,
    filter: Option<&Filter>,
    options: &OperationOptions,
) -> ConnectorResult<(Vec<ConnectorObject>, SearchResult)> {
    let mut found = Vec::new();
    let mut collect = |object: ConnectorObject| {
        found.push(object);
        true
    };
    let result = dispatcher
        .search(&ObjectClass::account(), filter, &mut collect, options)
        .await?;
    Ok((found, result))
}

/// Names of the objects, in delivery order.
pub fn names_of(objects: &[ConnectorObject]) -> Vec<String> {
    objects
        .iter()
        .map(|object| object.name().value().to_string())
        .collect()
}
