//! Connector service provider interface.
//!
//! A connector implements [`Connector`] plus one trait per operation its
//! resource supports. Operation traits return `impl Future + Send`, so
//! implementations may be plain `async fn`s.
//!
//! # Examples
//!
//! ```rust
//! use connector_framework::error::ConnectorResult;
//! use connector_framework::operations::{Configuration, Connector, OperationKind, TestOp};
//!
//! struct PingConfig;
//!
//! impl Configuration for PingConfig {
//!     fn validate(&self) -> ConnectorResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! struct PingConnector {
//!     config: PingConfig,
//! }
//!
//! impl Connector for PingConnector {
//!     type Config = PingConfig;
//!
//!     fn configuration(&self) -> &PingConfig {
//!         &self.config
//!     }
//!
//!     fn supported_operations(&self) -> Vec<OperationKind> {
//!         vec![OperationKind::Test]
//!     }
//! }
//!
//! impl TestOp for PingConnector {
//!     async fn test(&self) -> ConnectorResult<()> {
//!         Ok(())
//!     }
//! }
//! ```

use super::{
    OperationKind, OperationOptions, ResultsHandler, SearchResult, SyncResultsHandler, SyncToken,
};
use crate::attribute::{Attribute, GuardedString, Uid};
use crate::error::ConnectorResult;
use crate::object::ObjectClass;
use crate::schema::Schema;
use crate::translator::FilterTranslator;
use std::future::Future;

/// Connector configuration, validated before the connector is used.
pub trait Configuration: Send + Sync {
    fn validate(&self) -> ConnectorResult<()>;
}

/// Base trait of every connector.
pub trait Connector: Send + Sync {
    type Config: Configuration;

    fn configuration(&self) -> &Self::Config;

    /// Operations this connector implements.
    fn supported_operations(&self) -> Vec<OperationKind>;

    /// Release resource connections. Called once; the connector is not used
    /// afterwards.
    fn dispose(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

pub trait CreateOp: Connector {
    /// Create an object and return its Uid.
    ///
    /// `attributes` never contain `__UID__`.
    fn create(
        &self,
        object_class: &ObjectClass,
        attributes: Vec<Attribute>,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send;
}

pub trait UpdateOp: Connector {
    /// Replace the values of the given attributes.
    ///
    /// Returns the object's Uid, which changes if the update renamed it.
    fn update(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        replace_attributes: Vec<Attribute>,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send;
}

/// Value-level updates of multi-valued attributes.
pub trait UpdateAttributeValuesOp: UpdateOp {
    fn add_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_add: Vec<Attribute>,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send;

    fn remove_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_remove: Vec<Attribute>,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send;
}

pub trait DeleteOp: Connector {
    fn delete(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<()>> + Send;
}

/// Native search.
///
/// The framework obtains a translator for each search, turns the caller's
/// filter into native queries with it and runs [`execute_query`] once per
/// query, or once with `None` when the filter cannot be narrowed natively.
///
/// [`execute_query`]: SearchOp::execute_query
pub trait SearchOp: Connector {
    type Query: PartialEq + Send + Sync;
    type Translator: FilterTranslator<Query = Self::Query>;

    fn create_filter_translator(
        &self,
        object_class: &ObjectClass,
        options: &OperationOptions,
    ) -> Self::Translator;

    /// Run one native query, delivering objects until the handler returns
    /// `false` or the results are exhausted.
    fn execute_query(
        &self,
        object_class: &ObjectClass,
        query: Option<&Self::Query>,
        handler: &mut dyn ResultsHandler,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<SearchResult>> + Send;
}

pub trait SyncOp: Connector {
    /// Deliver changes newer than `token`, oldest first.
    ///
    /// Returns the token of the last change examined, which may be newer
    /// than the last delta delivered.
    fn sync(
        &self,
        object_class: &ObjectClass,
        token: Option<&SyncToken>,
        handler: &mut dyn SyncResultsHandler,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Option<SyncToken>>> + Send;

    /// Token of the most recent change, `None` for an empty change log.
    fn latest_sync_token(
        &self,
        object_class: &ObjectClass,
    ) -> impl Future<Output = ConnectorResult<Option<SyncToken>>> + Send;
}

pub trait AuthenticateOp: Connector {
    fn authenticate(
        &self,
        object_class: &ObjectClass,
        username: &str,
        password: &GuardedString,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send;
}

pub trait ResolveUsernameOp: Connector {
    fn resolve_username(
        &self,
        object_class: &ObjectClass,
        username: &str,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send;
}

pub trait SchemaOp: Connector {
    fn schema(&self) -> impl Future<Output = ConnectorResult<Schema>> + Send;
}

pub trait TestOp: Connector {
    /// Check that the configuration reaches a working resource.
    fn test(&self) -> impl Future<Output = ConnectorResult<()>> + Send;
}
