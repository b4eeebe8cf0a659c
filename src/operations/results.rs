//! Result handlers and result records for search and sync.

use crate::attribute::{AttributeValue, Uid};
use crate::error::{ValidationError, ValidationResult};
use crate::object::{ConnectorObject, ObjectClass};
use serde::Serialize;
use std::fmt;

/// Receives search results one object at a time.
///
/// Returning `false` asks the producer to stop; no further objects are
/// delivered for the current call. Closures of the right shape implement the
/// trait.
///
/// ```rust
/// use connector_framework::operations::ResultsHandler;
/// use connector_framework::object::ConnectorObject;
///
/// let mut seen = Vec::new();
/// let mut handler = |object: ConnectorObject| {
///     seen.push(object.uid().value().to_string());
///     seen.len() < 10
/// };
/// fn takes(_: &mut dyn ResultsHandler) {}
/// takes(&mut handler);
/// ```
pub trait ResultsHandler: Send {
    fn handle(&mut self, object: ConnectorObject) -> bool;
}

impl<F> ResultsHandler for F
where
    F: FnMut(ConnectorObject) -> bool + Send,
{
    fn handle(&mut self, object: ConnectorObject) -> bool {
        self(object)
    }
}

/// Completion record of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    paged_results_cookie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_paged_results: Option<u64>,
    all_results_returned: bool,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::complete()
    }
}

impl SearchResult {
    /// Every matching object was delivered; no further pages.
    pub fn complete() -> Self {
        Self {
            paged_results_cookie: None,
            remaining_paged_results: None,
            all_results_returned: true,
        }
    }

    /// A page of a larger result; `cookie` fetches the next page.
    pub fn paged(cookie: impl Into<String>, remaining: Option<u64>) -> Self {
        Self {
            paged_results_cookie: Some(cookie.into()),
            remaining_paged_results: remaining,
            all_results_returned: true,
        }
    }

    /// Mark the result as truncated by the resource, e.g. by a size limit.
    pub fn incomplete(mut self) -> Self {
        self.all_results_returned = false;
        self
    }

    pub fn paged_results_cookie(&self) -> Option<&str> {
        self.paged_results_cookie.as_deref()
    }

    pub fn remaining_paged_results(&self) -> Option<u64> {
        self.remaining_paged_results
    }

    pub fn all_results_returned(&self) -> bool {
        self.all_results_returned
    }

    /// Fold the result of a subsequent native query into this one.
    ///
    /// The last cookie wins; completeness requires every query to be complete.
    pub(crate) fn merge(self, next: SearchResult) -> Self {
        Self {
            paged_results_cookie: next.paged_results_cookie.or(self.paged_results_cookie),
            remaining_paged_results: next.remaining_paged_results.or(self.remaining_paged_results),
            all_results_returned: self.all_results_returned && next.all_results_returned,
        }
    }
}

/// Opaque position in a resource's change log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncToken(AttributeValue);

impl SyncToken {
    pub fn new(value: impl Into<AttributeValue>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &AttributeValue {
        &self.0
    }
}

impl fmt::Display for SyncToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of change carried by a [`SyncDelta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncDeltaType {
    Create,
    Update,
    /// The resource cannot tell a create from an update.
    CreateOrUpdate,
    Delete,
}

/// One change reported by sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncDelta {
    token: SyncToken,
    delta_type: SyncDeltaType,
    previous_uid: Option<Uid>,
    object_class: Option<ObjectClass>,
    uid: Uid,
    object: Option<ConnectorObject>,
}

impl SyncDelta {
    pub fn token(&self) -> &SyncToken {
        &self.token
    }

    pub fn delta_type(&self) -> SyncDeltaType {
        self.delta_type
    }

    /// Uid before a rename, when the resource reports one.
    pub fn previous_uid(&self) -> Option<&Uid> {
        self.previous_uid.as_ref()
    }

    pub fn object_class(&self) -> Option<&ObjectClass> {
        self.object_class.as_ref()
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// State after the change. Absent only for deletes.
    pub fn object(&self) -> Option<&ConnectorObject> {
        self.object.as_ref()
    }
}

/// Builder for [`SyncDelta`].
#[derive(Debug, Clone, Default)]
pub struct SyncDeltaBuilder {
    token: Option<SyncToken>,
    delta_type: Option<SyncDeltaType>,
    previous_uid: Option<Uid>,
    object_class: Option<ObjectClass>,
    uid: Option<Uid>,
    object: Option<ConnectorObject>,
}

impl SyncDeltaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, token: SyncToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn delta_type(mut self, delta_type: SyncDeltaType) -> Self {
        self.delta_type = Some(delta_type);
        self
    }

    pub fn previous_uid(mut self, uid: Uid) -> Self {
        self.previous_uid = Some(uid);
        self
    }

    pub fn object_class(mut self, object_class: ObjectClass) -> Self {
        self.object_class = Some(object_class);
        self
    }

    pub fn uid(mut self, uid: Uid) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Set the changed object; also fills in uid and object class.
    pub fn object(mut self, object: ConnectorObject) -> Self {
        self.uid = Some(object.uid().clone());
        self.object_class = Some(object.object_class().clone());
        self.object = Some(object);
        self
    }

    pub fn build(self) -> ValidationResult<SyncDelta> {
        let token = self.token.ok_or_else(|| invalid("token is required"))?;
        let delta_type = self.delta_type.ok_or_else(|| invalid("delta type is required"))?;
        let uid = self.uid.ok_or_else(|| invalid("uid is required"))?;

        match &self.object {
            None if delta_type != SyncDeltaType::Delete => {
                return Err(invalid("object is required unless the delta is a delete"));
            }
            Some(object) if object.uid() != &uid => {
                return Err(invalid(format!(
                    "object uid {} does not match delta uid {}",
                    object.uid(),
                    uid
                )));
            }
            _ => {}
        }

        Ok(SyncDelta {
            token,
            delta_type,
            previous_uid: self.previous_uid,
            object_class: self.object_class,
            uid,
            object: self.object,
        })
    }
}

fn invalid(message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidSyncDelta {
        message: message.into(),
    }
}

/// Receives sync deltas in change-log order. `false` stops the sync.
pub trait SyncResultsHandler: Send {
    fn handle(&mut self, delta: SyncDelta) -> bool;
}

impl<F> SyncResultsHandler for F
where
    F: FnMut(SyncDelta) -> bool + Send,
{
    fn handle(&mut self, delta: SyncDelta) -> bool {
        self(delta)
    }
}
