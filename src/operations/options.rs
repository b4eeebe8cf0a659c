//! Operation options.
//!
//! Optional knobs passed with every operation: which attributes to return,
//! paging, sorting, search scope, impersonation and error tolerance.

use crate::attribute::{GuardedString, Uid};
use crate::object::ObjectClass;
use serde::Serialize;
use std::fmt;

pub const ATTRIBUTES_TO_GET: &str = "ATTRS_TO_GET";
pub const PAGE_SIZE: &str = "PAGE_SIZE";
pub const PAGED_RESULTS_COOKIE: &str = "PAGED_RESULTS_COOKIE";
pub const PAGED_RESULTS_OFFSET: &str = "PAGED_RESULTS_OFFSET";
pub const SORT_KEYS: &str = "SORT_KEYS";
pub const SCOPE: &str = "SCOPE";
pub const CONTAINER: &str = "CONTAINER";
pub const RUN_AS_USER: &str = "RUN_AS_USER";
pub const RUN_WITH_PASSWORD: &str = "RUN_WITH_PASSWORD";
pub const ALLOW_PARTIAL_RESULTS: &str = "ALLOW_PARTIAL_RESULTS";
pub const ALLOW_PARTIAL_ATTRIBUTE_VALUES: &str = "ALLOW_PARTIAL_ATTRIBUTE_VALUES";
pub const FAIL_ON_ERROR: &str = "FAIL_ON_ERROR";
pub const REQUIRE_SERIAL: &str = "REQUIRE_SERIAL";

/// How far below the container a search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchScope {
    /// Only the container object itself.
    Object,
    /// Direct children of the container.
    OneLevel,
    /// The container and everything beneath it.
    Subtree,
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "object",
            Self::OneLevel => "onelevel",
            Self::Subtree => "subtree",
        })
    }
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    field: String,
    ascending: bool,
}

impl SortKey {
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            ascending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, true)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, false)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }
}

/// The container a search is rooted at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRef {
    object_class: ObjectClass,
    uid: Uid,
}

impl ContainerRef {
    pub fn new(object_class: ObjectClass, uid: Uid) -> Self {
        Self { object_class, uid }
    }

    pub fn object_class(&self) -> &ObjectClass {
        &self.object_class
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }
}

/// Options for one operation call. Every option is optional.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes_to_get: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paged_results_cookie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paged_results_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_keys: Option<Vec<SortKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<SearchScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<ContainerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_as_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_with_password: Option<GuardedString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_partial_results: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_partial_attribute_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fail_on_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    require_serial: Option<bool>,
}

impl OperationOptions {
    /// No options set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Attribute names the caller wants returned. `None` means the defaults.
    pub fn attributes_to_get(&self) -> Option<&[String]> {
        self.attributes_to_get.as_deref()
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub fn paged_results_cookie(&self) -> Option<&str> {
        self.paged_results_cookie.as_deref()
    }

    /// One-based offset of the first result to return.
    pub fn paged_results_offset(&self) -> Option<u32> {
        self.paged_results_offset
    }

    pub fn sort_keys(&self) -> Option<&[SortKey]> {
        self.sort_keys.as_deref()
    }

    pub fn scope(&self) -> Option<SearchScope> {
        self.scope
    }

    pub fn container(&self) -> Option<&ContainerRef> {
        self.container.as_ref()
    }

    pub fn run_as_user(&self) -> Option<&str> {
        self.run_as_user.as_deref()
    }

    pub fn run_with_password(&self) -> Option<&GuardedString> {
        self.run_with_password.as_ref()
    }

    pub fn allow_partial_results(&self) -> Option<bool> {
        self.allow_partial_results
    }

    pub fn allow_partial_attribute_values(&self) -> Option<bool> {
        self.allow_partial_attribute_values
    }

    pub fn fail_on_error(&self) -> Option<bool> {
        self.fail_on_error
    }

    pub fn require_serial(&self) -> Option<bool> {
        self.require_serial
    }

    /// Names of the options that are set, in declaration order.
    pub fn option_names(&self) -> Vec<&'static str> {
        [
            (ATTRIBUTES_TO_GET, self.attributes_to_get.is_some()),
            (PAGE_SIZE, self.page_size.is_some()),
            (PAGED_RESULTS_COOKIE, self.paged_results_cookie.is_some()),
            (PAGED_RESULTS_OFFSET, self.paged_results_offset.is_some()),
            (SORT_KEYS, self.sort_keys.is_some()),
            (SCOPE, self.scope.is_some()),
            (CONTAINER, self.container.is_some()),
            (RUN_AS_USER, self.run_as_user.is_some()),
            (RUN_WITH_PASSWORD, self.run_with_password.is_some()),
            (ALLOW_PARTIAL_RESULTS, self.allow_partial_results.is_some()),
            (
                ALLOW_PARTIAL_ATTRIBUTE_VALUES,
                self.allow_partial_attribute_values.is_some(),
            ),
            (FAIL_ON_ERROR, self.fail_on_error.is_some()),
            (REQUIRE_SERIAL, self.require_serial.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.option_names().is_empty()
    }

    /// A copy with the attributes to get replaced.
    pub(crate) fn with_attributes_to_get(&self, attributes: Vec<String>) -> Self {
        Self {
            attributes_to_get: Some(attributes),
            ..self.clone()
        }
    }
}

/// Builder for [`OperationOptions`].
#[derive(Debug, Clone, Default)]
pub struct OperationOptionsBuilder {
    options: OperationOptions,
}

impl OperationOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes_to_get<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.attributes_to_get = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.options.page_size = Some(page_size);
        self
    }

    pub fn paged_results_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.options.paged_results_cookie = Some(cookie.into());
        self
    }

    pub fn paged_results_offset(mut self, offset: u32) -> Self {
        self.options.paged_results_offset = Some(offset);
        self
    }

    pub fn sort_keys(mut self, keys: impl IntoIterator<Item = SortKey>) -> Self {
        self.options.sort_keys = Some(keys.into_iter().collect());
        self
    }

    pub fn add_sort_key(mut self, key: SortKey) -> Self {
        self.options.sort_keys.get_or_insert_with(Vec::new).push(key);
        self
    }

    pub fn scope(mut self, scope: SearchScope) -> Self {
        self.options.scope = Some(scope);
        self
    }

    pub fn container(mut self, object_class: ObjectClass, uid: Uid) -> Self {
        self.options.container = Some(ContainerRef::new(object_class, uid));
        self
    }

    pub fn run_as_user(mut self, username: impl Into<String>) -> Self {
        self.options.run_as_user = Some(username.into());
        self
    }

    pub fn run_with_password(mut self, password: GuardedString) -> Self {
        self.options.run_with_password = Some(password);
        self
    }

    pub fn allow_partial_results(mut self, allow: bool) -> Self {
        self.options.allow_partial_results = Some(allow);
        self
    }

    pub fn allow_partial_attribute_values(mut self, allow: bool) -> Self {
        self.options.allow_partial_attribute_values = Some(allow);
        self
    }

    pub fn fail_on_error(mut self, fail: bool) -> Self {
        self.options.fail_on_error = Some(fail);
        self
    }

    pub fn require_serial(mut self, serial: bool) -> Self {
        self.options.require_serial = Some(serial);
        self
    }

    pub fn build(self) -> OperationOptions {
        self.options
    }
}
