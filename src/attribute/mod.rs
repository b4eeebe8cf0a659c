//! Attribute model.
//!
//! Attributes are immutable named value lists. Construction validates the
//! invariants of reserved attributes (`__UID__`, `__NAME__`, passwords), so an
//! [`Attribute`] that exists is always well formed.
//!
//! # Value Types
//!
//! * [`AttributeValue`] - closed set of supported value types
//! * [`GuardedString`] - secret values, redacted in all output
//! * [`ScriptRef`] - script carried verbatim to the connector
//!
//! # Identity
//!
//! * [`Uid`] - non-blank resource identifier
//! * [`Name`] - human-meaningful object name

#[allow(clippy::module_inception)]
mod attribute;
mod guarded;
pub mod names;
mod uid;
pub mod util;
mod value;

pub use attribute::{Attribute, AttributeBuilder};
pub use guarded::GuardedString;
pub use uid::{Name, Uid};
pub use value::{AttributeValue, AttributeValueType, ScriptRef};
