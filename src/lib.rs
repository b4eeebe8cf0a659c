//! Identity connector framework for Rust.
//!
//! Provides the building blocks for connectors that provision identities
//! into external resources (directories, databases, SaaS APIs) behind one
//! vendor-neutral model: attributes and objects, a filter language, a
//! capability-driven filter translator, schemas and async operation traits.
//!
//! # Core Components
//!
//! - [`Attribute`] / [`ConnectorObject`] - the data model
//! - [`Filter`] - resource-independent search filters
//! - [`FilterTranslator`] - turns filters into native queries
//! - [`Schema`] - what a connector supports, per operation
//! - [`OperationDispatcher`] - validated, logged, time-bounded operation calls
//!
//! # Quick Start
//!
//! ```rust
//! use connector_framework::{Attribute, FilterBuilder};
//! use connector_framework::translator::{CapabilityTable, translate};
//!
//! let translator: CapabilityTable<String> = CapabilityTable::new()
//!     .with_equals(|f, negated| (!negated).then(|| format!("{} = ?", f.name())))
//!     .with_and(|l, r| Some(format!("{l} AND {r}")));
//!
//! let filter = FilterBuilder::or(
//!     FilterBuilder::equal_to(Attribute::single("mail", "a@example.com").unwrap()),
//!     FilterBuilder::equal_to(Attribute::single("employeeNumber", "4711").unwrap()),
//! );
//!
//! // No OR support: one native query per branch.
//! let queries = translate(&translator, Some(&filter)).unwrap();
//! assert_eq!(queries, vec!["mail = ?".to_string(), "employeeNumber = ?".to_string()]);
//! ```

pub mod attribute;
pub mod config;
pub mod error;
pub mod filter;
pub mod object;
pub mod operations;
pub mod schema;
pub mod translator;

// Re-export commonly used types for convenience
pub use attribute::{Attribute, AttributeBuilder, AttributeValue, GuardedString, Name, Uid};
pub use config::{FrameworkConfig, FrameworkConfigBuilder};
pub use error::{
    ConnectorError, ConnectorResult, SchemaError, SchemaResult, TranslationError,
    TranslationResult, ValidationError, ValidationResult,
};
pub use filter::{Filter, FilterBuilder};
pub use object::{ConnectorObject, ConnectorObjectBuilder, ObjectClass};
pub use operations::{OperationDispatcher, OperationKind, OperationOptions};
pub use schema::{Schema, SchemaBuilder};
pub use translator::{FilterTranslator, translate};
