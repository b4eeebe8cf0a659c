//! Connector operations.
//!
//! The connector-facing SPI ([`spi`]) is a set of small traits, one per
//! operation, that a connector implements for whatever its resource
//! supports. Applications do not call those traits directly; they go through
//! [`OperationDispatcher`], which validates arguments against the
//! connector's schema, translates filters, wraps result handlers and applies
//! timeouts.
//!
//! # Key Types
//!
//! - [`OperationKind`] - the operations a connector may implement
//! - [`OperationOptions`] - optional per-call settings
//! - [`ResultsHandler`] / [`SyncResultsHandler`] - streaming result sinks
//! - [`OperationDispatcher`] - the application-facing entry point

mod dispatcher;
mod handlers;
pub mod options;
mod results;
pub mod spi;

pub use dispatcher::OperationDispatcher;
pub use options::{ContainerRef, OperationOptions, OperationOptionsBuilder, SearchScope, SortKey};
pub use results::{
    ResultsHandler, SearchResult, SyncDelta, SyncDeltaBuilder, SyncDeltaType, SyncResultsHandler,
    SyncToken,
};
pub use spi::{
    AuthenticateOp, Configuration, Connector, CreateOp, DeleteOp, ResolveUsernameOp, SchemaOp,
    SearchOp, SyncOp, TestOp, UpdateAttributeValuesOp, UpdateOp,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The operations a connector can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationKind {
    Authenticate,
    Create,
    Delete,
    ResolveUsername,
    Schema,
    Search,
    Sync,
    Test,
    Update,
    UpdateAttributeValues,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        Self::Authenticate,
        Self::Create,
        Self::Delete,
        Self::ResolveUsername,
        Self::Schema,
        Self::Search,
        Self::Sync,
        Self::Test,
        Self::Update,
        Self::UpdateAttributeValues,
    ];

    /// Whether the operation acts on an object class and accepts options.
    pub fn takes_object_class(self) -> bool {
        !matches!(self, Self::Schema | Self::Test)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::ResolveUsername => "resolveUsername",
            Self::Schema => "schema",
            Self::Search => "search",
            Self::Sync => "sync",
            Self::Test => "test",
            Self::Update => "update",
            Self::UpdateAttributeValues => "updateAttributeValues",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
