//! In-memory reference connector.
//!
//! Stores objects in a map guarded by a mutex and answers searches with
//! native queries that are themselves [`Filter`]s, restricted to the
//! operators enabled in its [`Capabilities`]. Returned objects carry only
//! the requested attributes when `attributes_to_get` is set. Every executed
//! query is recorded so tests can check how a search was split up.

use connector_framework::attribute::{Attribute, GuardedString, Uid, names, util};
use connector_framework::error::{ConnectorError, ConnectorResult, ValidationError};
use connector_framework::filter::{
    ComparableFilter, ContainsAllValuesFilter, EqualsFilter, Filter, FilterBuilder, StringFilter,
};
use connector_framework::object::{ConnectorObject, ConnectorObjectBuilder, ObjectClass};
use connector_framework::operations::{
    AuthenticateOp, Configuration, Connector, CreateOp, DeleteOp, OperationKind, OperationOptions,
    ResolveUsernameOp, ResultsHandler, SchemaOp, SearchOp, SearchResult, SyncDeltaBuilder,
    SyncDeltaType, SyncOp, SyncResultsHandler, SyncToken, TestOp, UpdateAttributeValuesOp,
    UpdateOp,
};
use connector_framework::schema::Schema;
use connector_framework::translator::FilterTranslator;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use super::fixtures;

/// Connector configuration: a named store instance.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    pub instance: String,
}

impl Configuration for MemoryConfig {
    fn validate(&self) -> ConnectorResult<()> {
        if self.instance.trim().is_empty() {
            return Err(ConnectorError::InvalidConfiguration {
                message: "instance name must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

/// Which native operators the store's query language offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub and: bool,
    pub or: bool,
    pub equals: bool,
    pub string_match: bool,
    pub ordering: bool,
    pub contains_all_values: bool,
    pub negation: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            and: true,
            or: true,
            equals: true,
            string_match: true,
            ordering: true,
            contains_all_values: true,
            negation: true,
        }
    }

    pub fn none() -> Self {
        Self {
            and: false,
            or: false,
            equals: false,
            string_match: false,
            ordering: false,
            contains_all_values: false,
            negation: false,
        }
    }

    /// Equality and AND only, like a simple key-value lookup API.
    pub fn equals_and() -> Self {
        Self {
            and: true,
            equals: true,
            ..Self::none()
        }
    }
}

/// Translator whose native queries are filters over the supported operators.
#[derive(Debug, Clone)]
pub struct MemoryTranslator {
    capabilities: Capabilities,
}

impl MemoryTranslator {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    fn leaf(&self, supported: bool, leaf: Filter, negated: bool) -> Option<Filter> {
        if !supported || (negated && !self.capabilities.negation) {
            return None;
        }
        Some(if negated { FilterBuilder::not(leaf) } else { leaf })
    }
}

impl FilterTranslator for MemoryTranslator {
    type Query = Filter;

    fn create_and_expression(&self, left: &Filter, right: &Filter) -> Option<Filter> {
        self.capabilities
            .and
            .then(|| FilterBuilder::and(left.clone(), right.clone()))
    }

    fn create_or_expression(&self, left: &Filter, right: &Filter) -> Option<Filter> {
        self.capabilities
            .or
            .then(|| FilterBuilder::or(left.clone(), right.clone()))
    }

    fn create_equals_expression(&self, filter: &EqualsFilter, negated: bool) -> Option<Filter> {
        self.leaf(self.capabilities.equals, Filter::Equals(filter.clone()), negated)
    }

    fn create_contains_expression(&self, filter: &StringFilter, negated: bool) -> Option<Filter> {
        self.leaf(self.capabilities.string_match, Filter::Contains(filter.clone()), negated)
    }

    fn create_starts_with_expression(&self, filter: &StringFilter, negated: bool) -> Option<Filter> {
        self.leaf(self.capabilities.string_match, Filter::StartsWith(filter.clone()), negated)
    }

    fn create_ends_with_expression(&self, filter: &StringFilter, negated: bool) -> Option<Filter> {
        self.leaf(self.capabilities.string_match, Filter::EndsWith(filter.clone()), negated)
    }

    fn create_greater_than_expression(&self, filter: &ComparableFilter, negated: bool) -> Option<Filter> {
        self.leaf(self.capabilities.ordering, Filter::GreaterThan(filter.clone()), negated)
    }

    fn create_greater_than_or_equal_expression(
        &self,
        filter: &ComparableFilter,
        negated: bool,
    ) -> Option<Filter> {
        self.leaf(self.capabilities.ordering, Filter::GreaterThanOrEqual(filter.clone()), negated)
    }

    fn create_less_than_expression(&self, filter: &ComparableFilter, negated: bool) -> Option<Filter> {
        self.leaf(self.capabilities.ordering, Filter::LessThan(filter.clone()), negated)
    }

    fn create_less_than_or_equal_expression(
        &self,
        filter: &ComparableFilter,
        negated: bool,
    ) -> Option<Filter> {
        self.leaf(self.capabilities.ordering, Filter::LessThanOrEqual(filter.clone()), negated)
    }

    fn create_contains_all_values_expression(
        &self,
        filter: &ContainsAllValuesFilter,
        negated: bool,
    ) -> Option<Filter> {
        self.leaf(
            self.capabilities.contains_all_values,
            Filter::ContainsAllValues(filter.clone()),
            negated,
        )
    }
}

#[derive(Debug, Clone)]
struct Entry {
    object_class: ObjectClass,
    attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
struct Change {
    token: i64,
    delta_type: SyncDeltaType,
    object_class: ObjectClass,
    uid: Uid,
    object: Option<ConnectorObject>,
}

#[derive(Debug, Default)]
struct Store {
    objects: BTreeMap<u64, Entry>,
    next_id: u64,
    changes: Vec<Change>,
}

impl Store {
    fn key(uid: &Uid) -> Option<u64> {
        uid.value().parse().ok()
    }

    fn entry_mut(&mut self, object_class: &ObjectClass, uid: &Uid) -> ConnectorResult<&mut Entry> {
        Self::key(uid)
            .and_then(|key| self.objects.get_mut(&key))
            .filter(|entry| &entry.object_class == object_class)
            .ok_or_else(|| ConnectorError::object_not_found(object_class.name(), uid.value()))
    }

    fn find_by_name(&self, object_class: &ObjectClass, name: &str) -> Option<(u64, &Entry)> {
        self.objects
            .iter()
            .find(|(_, entry)| {
                &entry.object_class == object_class
                    && util::get_name(&entry.attributes)
                        .ok()
                        .flatten()
                        .is_some_and(|n| n.value() == name)
            })
            .map(|(key, entry)| (*key, entry))
    }

    fn record(&mut self, delta_type: SyncDeltaType, object_class: &ObjectClass, key: u64) {
        let uid = Uid::new(key.to_string()).unwrap();
        let object = self
            .objects
            .get(&key)
            .map(|entry| to_object(key, entry));
        let token = self.changes.len() as i64 + 1;
        self.changes.push(Change {
            token,
            delta_type,
            object_class: object_class.clone(),
            uid,
            object,
        });
    }
}

fn to_object(key: u64, entry: &Entry) -> ConnectorObject {
    ConnectorObjectBuilder::new()
        .object_class(entry.object_class.clone())
        .uid(Uid::new(key.to_string()).unwrap())
        .add_attributes(
            entry
                .attributes
                .iter()
                .filter(|attr| !names::is_password_name(attr.name()))
                .cloned(),
        )
        .build()
        .unwrap()
}

/// Connector over an in-process object store.
pub struct InMemoryConnector {
    config: MemoryConfig,
    capabilities: Capabilities,
    store: Mutex<Store>,
    executed: Mutex<Vec<Option<String>>>,
    test_delay: Option<Duration>,
}

impl InMemoryConnector {
    pub fn new(capabilities: Capabilities) -> Self {
        Self::with_config(
            MemoryConfig {
                instance: "test".to_string(),
            },
            capabilities,
        )
    }

    pub fn with_config(config: MemoryConfig, capabilities: Capabilities) -> Self {
        Self {
            config,
            capabilities,
            store: Mutex::new(Store::default()),
            executed: Mutex::new(Vec::new()),
            test_delay: None,
        }
    }

    /// Make `test` take this long before answering.
    pub fn with_test_delay(mut self, delay: Duration) -> Self {
        self.test_delay = Some(delay);
        self
    }

    /// Native queries executed so far, `None` for unfiltered runs.
    pub fn executed_queries(&self) -> Vec<Option<String>> {
        self.executed.lock().unwrap().clone()
    }

    pub fn clear_executed_queries(&self) {
        self.executed.lock().unwrap().clear();
    }

    pub fn object_count(&self) -> usize {
        self.store.lock().unwrap().objects.len()
    }

    /// Stored object, bypassing the dispatcher.
    pub fn stored(&self, uid: &Uid) -> Option<ConnectorObject> {
        let store = self.store.lock().unwrap();
        let key = Store::key(uid)?;
        store.objects.get(&key).map(|entry| to_object(key, entry))
    }

    fn change_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        changes: Vec<Attribute>,
        add: bool,
    ) -> ConnectorResult<Uid> {
        let mut store = self.store.lock().unwrap();
        let entry = store.entry_mut(object_class, uid)?;
        for change in changes {
            let mut values = util::find(change.name(), &entry.attributes)
                .map(|attr| attr.values_or_empty().to_vec())
                .unwrap_or_default();
            for value in change.values_or_empty() {
                if add && !values.contains(value) {
                    values.push(value.clone());
                } else if !add {
                    values.retain(|existing| existing != value);
                }
            }
            entry.attributes.retain(|attr| !attr.is(change.name()));
            entry.attributes.push(Attribute::new(change.name(), Some(values))?);
        }
        let key = Store::key(uid).unwrap_or_default();
        store.record(SyncDeltaType::Update, object_class, key);
        Ok(uid.clone())
    }
}

impl Connector for InMemoryConnector {
    type Config = MemoryConfig;

    fn configuration(&self) -> &MemoryConfig {
        &self.config
    }

    fn supported_operations(&self) -> Vec<OperationKind> {
        OperationKind::ALL.to_vec()
    }
}

impl CreateOp for InMemoryConnector {
    async fn create(
        &self,
        object_class: &ObjectClass,
        attributes: Vec<Attribute>,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        let name = util::get_name(&attributes)?.ok_or(ValidationError::MissingName)?;
        let mut store = self.store.lock().unwrap();
        if store.find_by_name(object_class, name.value()).is_some() {
            return Err(ConnectorError::AlreadyExists {
                object_class: object_class.to_string(),
                uid: name.value().to_string(),
            });
        }
        store.next_id += 1;
        let key = store.next_id;
        store.objects.insert(
            key,
            Entry {
                object_class: object_class.clone(),
                attributes,
            },
        );
        store.record(SyncDeltaType::Create, object_class, key);
        Ok(Uid::new(key.to_string())?)
    }
}

impl UpdateOp for InMemoryConnector {
    async fn update(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        replace_attributes: Vec<Attribute>,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        let mut store = self.store.lock().unwrap();
        let entry = store.entry_mut(object_class, uid)?;
        for replacement in replace_attributes {
            entry.attributes.retain(|attr| !attr.is(replacement.name()));
            if !replacement.values_or_empty().is_empty() {
                entry.attributes.push(replacement);
            }
        }
        let key = Store::key(uid).unwrap_or_default();
        store.record(SyncDeltaType::Update, object_class, key);
        Ok(uid.clone())
    }
}

impl UpdateAttributeValuesOp for InMemoryConnector {
    async fn add_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_add: Vec<Attribute>,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.change_values(object_class, uid, values_to_add, true)
    }

    async fn remove_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_remove: Vec<Attribute>,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.change_values(object_class, uid, values_to_remove, false)
    }
}

impl DeleteOp for InMemoryConnector {
    async fn delete(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        _options: &OperationOptions,
    ) -> ConnectorResult<()> {
        let mut store = self.store.lock().unwrap();
        store.entry_mut(object_class, uid)?;
        let key = Store::key(uid).unwrap_or_default();
        store.objects.remove(&key);
        store.record(SyncDeltaType::Delete, object_class, key);
        Ok(())
    }
}

impl SearchOp for InMemoryConnector {
    type Query = Filter;
    type Translator = MemoryTranslator;

    fn create_filter_translator(
        &self,
        _object_class: &ObjectClass,
        _options: &OperationOptions,
    ) -> MemoryTranslator {
        MemoryTranslator::new(self.capabilities)
    }

    async fn execute_query(
        &self,
        object_class: &ObjectClass,
        query: Option<&Filter>,
        handler: &mut dyn ResultsHandler,
        options: &OperationOptions,
    ) -> ConnectorResult<SearchResult> {
        self.executed
            .lock()
            .unwrap()
            .push(query.map(|q| q.to_string()));

        let matches: Vec<ConnectorObject> = {
            let store = self.store.lock().unwrap();
            store
                .objects
                .iter()
                .filter(|(_, entry)| &entry.object_class == object_class)
                .map(|(key, entry)| to_object(*key, entry))
                .filter(|object| query.is_none_or(|q| q.accept(object)))
                .collect()
        };

        let offset: usize = options
            .paged_results_cookie()
            .and_then(|cookie| cookie.parse().ok())
            .unwrap_or(0);
        let page_end = match options.page_size() {
            Some(size) => (offset + size as usize).min(matches.len()),
            None => matches.len(),
        };

        for object in matches.iter().skip(offset).take(page_end.saturating_sub(offset)) {
            let object = match options.attributes_to_get() {
                Some(keep) => object.retain_attributes(keep),
                None => object.clone(),
            };
            if !handler.handle(object) {
                return Ok(SearchResult::complete());
            }
        }

        if page_end < matches.len() {
            Ok(SearchResult::paged(
                page_end.to_string(),
                Some((matches.len() - page_end) as u64),
            ))
        } else {
            Ok(SearchResult::complete())
        }
    }
}

impl SyncOp for InMemoryConnector {
    async fn sync(
        &self,
        object_class: &ObjectClass,
        token: Option<&SyncToken>,
        handler: &mut dyn SyncResultsHandler,
        _options: &OperationOptions,
    ) -> ConnectorResult<Option<SyncToken>> {
        let since = match token.map(SyncToken::value) {
            Some(connector_framework::attribute::AttributeValue::Long(value)) => *value,
            Some(other) => {
                return Err(ValidationError::custom(format!("unexpected sync token {:?}", other)).into());
            }
            None => 0,
        };
        let changes: Vec<Change> = {
            let store = self.store.lock().unwrap();
            store
                .changes
                .iter()
                .filter(|change| change.token > since)
                .filter(|change| object_class.is_all() || &change.object_class == object_class)
                .cloned()
                .collect()
        };

        let mut last = token.cloned();
        for change in changes {
            let mut builder = SyncDeltaBuilder::new()
                .token(SyncToken::new(change.token))
                .delta_type(change.delta_type)
                .object_class(change.object_class)
                .uid(change.uid);
            if change.delta_type != SyncDeltaType::Delete {
                if let Some(object) = change.object {
                    builder = builder.object(object);
                }
            }
            last = Some(SyncToken::new(change.token));
            if !handler.handle(builder.build()?) {
                break;
            }
        }
        Ok(last)
    }

    async fn latest_sync_token(&self, _object_class: &ObjectClass) -> ConnectorResult<Option<SyncToken>> {
        let store = self.store.lock().unwrap();
        Ok(store.changes.last().map(|change| SyncToken::new(change.token)))
    }
}

impl AuthenticateOp for InMemoryConnector {
    async fn authenticate(
        &self,
        object_class: &ObjectClass,
        username: &str,
        password: &GuardedString,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        let store = self.store.lock().unwrap();
        match store.find_by_name(object_class, username) {
            Some((key, entry)) if util::get_password(&entry.attributes) == Some(password) => {
                Ok(Uid::new(key.to_string())?)
            }
            _ => Err(ConnectorError::InvalidCredential {
                username: username.to_string(),
            }),
        }
    }
}

impl ResolveUsernameOp for InMemoryConnector {
    async fn resolve_username(
        &self,
        object_class: &ObjectClass,
        username: &str,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        let store = self.store.lock().unwrap();
        let (key, _) = store
            .find_by_name(object_class, username)
            .ok_or_else(|| ConnectorError::object_not_found(object_class.name(), username))?;
        Ok(Uid::new(key.to_string())?)
    }
}

impl SchemaOp for InMemoryConnector {
    async fn schema(&self) -> ConnectorResult<Schema> {
        Ok(fixtures::schema()?)
    }
}

impl TestOp for InMemoryConnector {
    async fn test(&self) -> ConnectorResult<()> {
        if let Some(delay) = self.test_delay {
            tokio::time::sleep(delay).await;
        }
        self.config.validate()
    }
}
