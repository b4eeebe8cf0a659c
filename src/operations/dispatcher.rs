//! Application-facing operation dispatch.
//!
//! [`OperationDispatcher`] owns a connector and exposes one method per
//! operation. Each call gets a request id for log correlation, has its
//! arguments validated against the attached schema, runs under the
//! configured timeout and has its outcome logged.

use super::handlers::{
    AttributesToGetHandler, DeduplicatingHandler, FilteringHandler, StopTrackingHandler,
};
use super::spi::{
    AuthenticateOp, Configuration, Connector, CreateOp, DeleteOp, ResolveUsernameOp, SchemaOp,
    SearchOp, SyncOp, TestOp, UpdateAttributeValuesOp, UpdateOp,
};
use super::{
    OperationKind, OperationOptions, ResultsHandler, SearchResult, SyncResultsHandler, SyncToken,
};
use crate::attribute::{Attribute, GuardedString, Uid, names, util};
use crate::config::FrameworkConfig;
use crate::error::{ConnectorError, ConnectorResult, ValidationError};
use crate::filter::{Filter, FilterBuilder};
use crate::object::{ConnectorObject, ObjectClass};
use crate::schema::Schema;
use crate::translator::translate;
use log::{debug, info, trace, warn};
use std::future::Future;
use uuid::Uuid;

/// Runs connector operations on behalf of an application.
///
/// Operation methods are available when the connector implements the
/// matching SPI trait. Without an attached [`Schema`] only structural
/// checks are made; with one, object classes and options are checked
/// against what each operation supports.
pub struct OperationDispatcher<C: Connector> {
    connector: C,
    schema: Option<Schema>,
    config: FrameworkConfig,
}

impl<C: Connector> OperationDispatcher<C> {
    /// Validate the connector and framework configuration and take ownership
    /// of the connector.
    pub fn new(connector: C, config: FrameworkConfig) -> ConnectorResult<Self> {
        connector.configuration().validate()?;
        config.validate()?;
        info!(
            "Operation dispatcher created for connector implementing {:?}",
            connector.supported_operations()
        );
        Ok(Self {
            connector,
            schema: None,
            config,
        })
    }

    /// Attach a schema used for argument validation.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn attached_schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    /// Dispose of the connector. The dispatcher is consumed.
    pub async fn dispose(self) {
        debug!("Disposing connector");
        self.connector.dispose().await;
    }

    pub async fn create(
        &self,
        object_class: &ObjectClass,
        attributes: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: CreateOp,
    {
        self.dispatch(OperationKind::Create, object_class.name(), move |_| {
            self.create_checked(object_class, attributes, options)
        })
        .await
    }

    pub async fn update(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        replace_attributes: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: UpdateOp,
    {
        self.dispatch(OperationKind::Update, object_class.name(), move |_| {
            self.update_checked(object_class, uid, replace_attributes, options)
        })
        .await
    }

    pub async fn add_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_add: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: UpdateAttributeValuesOp,
    {
        self.dispatch(
            OperationKind::UpdateAttributeValues,
            object_class.name(),
            move |_| async move {
                self.check_request(OperationKind::UpdateAttributeValues, object_class, options)?;
                validate_value_updates(&values_to_add)?;
                self.connector
                    .add_attribute_values(object_class, uid, values_to_add, options)
                    .await
            },
        )
        .await
    }

    pub async fn remove_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_remove: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: UpdateAttributeValuesOp,
    {
        self.dispatch(
            OperationKind::UpdateAttributeValues,
            object_class.name(),
            move |_| async move {
                self.check_request(OperationKind::UpdateAttributeValues, object_class, options)?;
                validate_value_updates(&values_to_remove)?;
                self.connector
                    .remove_attribute_values(object_class, uid, values_to_remove, options)
                    .await
            },
        )
        .await
    }

    /// Add and remove individual values on a connector that can only replace
    /// whole attributes.
    ///
    /// Reads the current values, applies the changes and writes the touched
    /// attributes back with a replace. Not atomic: a concurrent writer between
    /// the read and the update is overwritten.
    pub async fn merge_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_add: Vec<Attribute>,
        values_to_remove: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: SearchOp + UpdateOp,
    {
        self.dispatch(OperationKind::Update, object_class.name(), move |request_id| {
            self.merge_checked(
                request_id,
                object_class,
                uid,
                values_to_add,
                values_to_remove,
                options,
            )
        })
        .await
    }

    pub async fn delete(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> ConnectorResult<()>
    where
        C: DeleteOp,
    {
        self.dispatch(OperationKind::Delete, object_class.name(), move |_| async move {
            self.check_request(OperationKind::Delete, object_class, options)?;
            self.connector.delete(object_class, uid, options).await
        })
        .await
    }

    /// Search with a filter, streaming matches to `handler`.
    ///
    /// The filter is translated with the connector's translator and every
    /// resulting native query runs in order. Objects are re-checked against
    /// the filter, deduplicated by Uid when several queries ran and trimmed
    /// to the requested attributes, as configured. A `false` from the
    /// handler ends the whole search.
    pub async fn search(
        &self,
        object_class: &ObjectClass,
        filter: Option<&Filter>,
        handler: &mut dyn ResultsHandler,
        options: &OperationOptions,
    ) -> ConnectorResult<SearchResult>
    where
        C: SearchOp,
    {
        self.dispatch(OperationKind::Search, object_class.name(), move |request_id| {
            self.search_checked(request_id, object_class, filter, handler, options)
        })
        .await
    }

    /// Fetch one object by Uid.
    pub async fn get_object(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> ConnectorResult<Option<ConnectorObject>>
    where
        C: SearchOp,
    {
        self.dispatch(OperationKind::Search, object_class.name(), move |request_id| {
            self.find_by_uid(request_id, object_class, uid, options)
        })
        .await
    }

    pub async fn sync(
        &self,
        object_class: &ObjectClass,
        token: Option<&SyncToken>,
        handler: &mut dyn SyncResultsHandler,
        options: &OperationOptions,
    ) -> ConnectorResult<Option<SyncToken>>
    where
        C: SyncOp,
    {
        self.dispatch(OperationKind::Sync, object_class.name(), move |request_id| async move {
            self.check_request(OperationKind::Sync, object_class, options)?;
            match token {
                Some(token) => debug!("Syncing from token {} (request: '{}')", token, request_id),
                None => debug!("Syncing from the beginning (request: '{}')", request_id),
            }
            self.connector
                .sync(object_class, token, handler, options)
                .await
        })
        .await
    }

    pub async fn latest_sync_token(&self, object_class: &ObjectClass) -> ConnectorResult<Option<SyncToken>>
    where
        C: SyncOp,
    {
        self.dispatch(OperationKind::Sync, object_class.name(), move |_| async move {
            self.check_object_class(OperationKind::Sync, object_class)?;
            self.connector.latest_sync_token(object_class).await
        })
        .await
    }

    pub async fn authenticate(
        &self,
        object_class: &ObjectClass,
        username: &str,
        password: &GuardedString,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: AuthenticateOp,
    {
        self.dispatch(OperationKind::Authenticate, object_class.name(), move |_| async move {
            self.check_request(OperationKind::Authenticate, object_class, options)?;
            validate_username(username)?;
            self.connector
                .authenticate(object_class, username, password, options)
                .await
        })
        .await
    }

    pub async fn resolve_username(
        &self,
        object_class: &ObjectClass,
        username: &str,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: ResolveUsernameOp,
    {
        self.dispatch(OperationKind::ResolveUsername, object_class.name(), move |_| async move {
            self.check_request(OperationKind::ResolveUsername, object_class, options)?;
            validate_username(username)?;
            self.connector
                .resolve_username(object_class, username, options)
                .await
        })
        .await
    }

    /// Ask the connector for its schema.
    pub async fn schema(&self) -> ConnectorResult<Schema>
    where
        C: SchemaOp,
    {
        self.dispatch(OperationKind::Schema, "connector", |_| self.connector.schema())
            .await
    }

    /// Fetch the connector's schema and attach it.
    pub async fn with_connector_schema(self) -> ConnectorResult<Self>
    where
        C: SchemaOp,
    {
        let schema = self.schema().await?;
        Ok(self.with_schema(schema))
    }

    pub async fn test(&self) -> ConnectorResult<()>
    where
        C: TestOp,
    {
        self.dispatch(OperationKind::Test, "connector", |_| self.connector.test())
            .await
    }

    /// Log, time-bound and run one operation.
    async fn dispatch<T, F, Fut>(&self, operation: OperationKind, target: &str, run: F) -> ConnectorResult<T>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = ConnectorResult<T>>,
    {
        let request_id = Uuid::new_v4();
        info!(
            "Operation dispatcher processing {} for {} (request: '{}')",
            operation, target, request_id
        );

        let result = match self.config.timeout_for(operation) {
            Some(limit) => tokio::time::timeout(limit, run(request_id))
                .await
                .unwrap_or_else(|_| {
                    Err(ConnectorError::OperationTimeout {
                        operation: operation.to_string(),
                        timeout: limit,
                    })
                }),
            None => run(request_id).await,
        };

        match &result {
            Ok(_) => debug!(
                "Operation {} completed successfully (request: '{}')",
                operation, request_id
            ),
            Err(e) => warn!("Operation {} failed: {} (request: '{}')", operation, e, request_id),
        }
        result
    }

    fn check_request(
        &self,
        operation: OperationKind,
        object_class: &ObjectClass,
        options: &OperationOptions,
    ) -> ConnectorResult<()> {
        self.check_object_class(operation, object_class)?;
        self.check_options(operation, options)
    }

    fn check_object_class(&self, operation: OperationKind, object_class: &ObjectClass) -> ConnectorResult<()> {
        let supported = match &self.schema {
            Some(schema) => schema.supports_object_class(operation, object_class),
            None => !object_class.is_all() || operation == OperationKind::Sync,
        };
        if supported {
            Ok(())
        } else {
            Err(ConnectorError::UnsupportedObjectClass {
                object_class: object_class.to_string(),
                operation: operation.to_string(),
            })
        }
    }

    fn check_options(&self, operation: OperationKind, options: &OperationOptions) -> ConnectorResult<()> {
        let Some(schema) = &self.schema else {
            return Ok(());
        };
        match options
            .option_names()
            .into_iter()
            .find(|name| !schema.supports_option(operation, name))
        {
            Some(option) => Err(ConnectorError::UnsupportedOption {
                option: option.to_string(),
                operation: operation.to_string(),
            }),
            None => Ok(()),
        }
    }

    async fn create_checked(
        &self,
        object_class: &ObjectClass,
        attributes: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: CreateOp,
    {
        self.check_request(OperationKind::Create, object_class, options)?;
        if util::contains_uid(&attributes) {
            return Err(ValidationError::not_allowed(names::UID, "the resource assigns Uids on create").into());
        }
        reject_duplicates(&attributes)?;
        self.connector.create(object_class, attributes, options).await
    }

    async fn update_checked(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        replace_attributes: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: UpdateOp,
    {
        self.check_request(OperationKind::Update, object_class, options)?;
        if replace_attributes.is_empty() {
            return Err(ValidationError::custom("update requires at least one attribute").into());
        }
        if util::contains_uid(&replace_attributes) {
            return Err(ValidationError::not_allowed(names::UID, "Uids cannot be replaced").into());
        }
        reject_duplicates(&replace_attributes)?;
        self.connector
            .update(object_class, uid, replace_attributes, options)
            .await
    }

    async fn merge_checked(
        &self,
        request_id: Uuid,
        object_class: &ObjectClass,
        uid: &Uid,
        values_to_add: Vec<Attribute>,
        values_to_remove: Vec<Attribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid>
    where
        C: SearchOp + UpdateOp,
    {
        if values_to_add.is_empty() && values_to_remove.is_empty() {
            return Err(ValidationError::custom("nothing to add or remove").into());
        }
        if !values_to_add.is_empty() {
            validate_value_updates(&values_to_add)?;
        }
        if !values_to_remove.is_empty() {
            validate_value_updates(&values_to_remove)?;
        }

        let mut touched: Vec<String> = Vec::new();
        for attribute in values_to_add.iter().chain(&values_to_remove) {
            if !touched.iter().any(|name| attribute.is(name)) {
                touched.push(attribute.name().to_string());
            }
        }

        let read_options = options.with_attributes_to_get(touched.clone());
        let current = self
            .find_by_uid(request_id, object_class, uid, &read_options)
            .await?
            .ok_or_else(|| ConnectorError::object_not_found(object_class.name(), uid.value()))?;

        let mut replacements = Vec::with_capacity(touched.len());
        for name in &touched {
            let mut values = current
                .attribute_by_name(name)
                .map(|attr| attr.values_or_empty().to_vec())
                .unwrap_or_default();
            if let Some(added) = util::find(name, &values_to_add) {
                for value in added.values_or_empty() {
                    if !values.contains(value) {
                        values.push(value.clone());
                    }
                }
            }
            if let Some(removed) = util::find(name, &values_to_remove) {
                values.retain(|value| !removed.values_or_empty().contains(value));
            }
            replacements.push(Attribute::new(name.clone(), Some(values))?);
        }

        debug!(
            "Replacing {} merged attributes on {} (request: '{}')",
            replacements.len(),
            uid,
            request_id
        );
        self.update_checked(object_class, uid, replacements, options)
            .await
    }

    async fn find_by_uid(
        &self,
        request_id: Uuid,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> ConnectorResult<Option<ConnectorObject>>
    where
        C: SearchOp,
    {
        let filter = FilterBuilder::equal_to(uid.to_attribute());
        let mut found = None;
        let mut first = |object: ConnectorObject| {
            found = Some(object);
            false
        };
        self.search_checked(request_id, object_class, Some(&filter), &mut first, options)
            .await?;
        Ok(found)
    }

    async fn search_checked(
        &self,
        request_id: Uuid,
        object_class: &ObjectClass,
        filter: Option<&Filter>,
        handler: &mut dyn ResultsHandler,
        options: &OperationOptions,
    ) -> ConnectorResult<SearchResult>
    where
        C: SearchOp,
    {
        self.check_request(OperationKind::Search, object_class, options)?;

        let queries = {
            let translator = self.connector.create_filter_translator(object_class, options);
            translate(&translator, filter)?
        };
        if queries.len() > self.config.query_count_warning_threshold {
            warn!(
                "Filter translated into {} native queries, above the threshold of {} (request: '{}')",
                queries.len(),
                self.config.query_count_warning_threshold,
                request_id
            );
        }
        let runs: Vec<Option<&C::Query>> = if queries.is_empty() {
            vec![None]
        } else {
            queries.iter().map(Some).collect()
        };

        let fallback = filter.filter(|_| self.config.fallback_filtering);
        let requested = options
            .attributes_to_get()
            .filter(|_| self.config.reduce_to_attributes_to_get)
            .map(<[String]>::to_vec);

        // The connector must return whatever the fallback filter inspects,
        // even when the caller did not ask for it.
        let widened;
        let query_options = match (fallback, options.attributes_to_get()) {
            (Some(filter), Some(asked)) => {
                let mut attributes = asked.to_vec();
                for name in filter_attribute_names(filter) {
                    if !attributes.iter().any(|existing| names::names_equal(existing, &name)) {
                        attributes.push(name);
                    }
                }
                widened = options.with_attributes_to_get(attributes);
                &widened
            }
            _ => options,
        };

        let mut reduce = AttributesToGetHandler::new(handler, requested);
        let mut unique =
            DeduplicatingHandler::new(&mut reduce, self.config.deduplicate_results && runs.len() > 1);
        let mut filtered = FilteringHandler::new(&mut unique, fallback);
        let mut tracker = StopTrackingHandler::new(&mut filtered);

        debug!(
            "Searching {} with {} native quer{} (request: '{}')",
            object_class,
            runs.len(),
            if runs.len() == 1 { "y" } else { "ies" },
            request_id
        );

        let mut result: Option<SearchResult> = None;
        for query in runs {
            let next = self
                .connector
                .execute_query(object_class, query, &mut tracker, query_options)
                .await?;
            result = Some(match result {
                Some(previous) => previous.merge(next),
                None => next,
            });
            if tracker.is_stopped() {
                debug!("Results handler stopped the search (request: '{}')", request_id);
                break;
            }
        }

        let handled = tracker.handled();
        trace!(
            "Search received {} objects, {} rejected by the filter (request: '{}')",
            handled,
            filtered.rejected(),
            request_id
        );
        Ok(result.unwrap_or_default())
    }
}

fn reject_duplicates(attributes: &[Attribute]) -> ConnectorResult<()> {
    match util::find_duplicate_name(attributes) {
        Some(name) => Err(ValidationError::DuplicateAttribute {
            attribute: name.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

/// Value-level updates name concrete values and never touch identity.
fn validate_value_updates(attributes: &[Attribute]) -> ConnectorResult<()> {
    if attributes.is_empty() {
        return Err(ValidationError::custom("at least one attribute is required").into());
    }
    for attribute in attributes {
        if attribute.is(names::UID) || attribute.is(names::NAME) {
            return Err(ValidationError::not_allowed(
                attribute.name(),
                "identity attributes cannot be changed value by value",
            )
            .into());
        }
        if attribute.values_or_empty().is_empty() {
            return Err(ValidationError::ExpectedValues {
                attribute: attribute.name().to_string(),
            }
            .into());
        }
    }
    reject_duplicates(attributes)
}

fn validate_username(username: &str) -> ConnectorResult<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::custom("username must not be blank").into());
    }
    Ok(())
}

/// Attribute names referenced by a filter's leaves, first occurrence first.
fn filter_attribute_names(filter: &Filter) -> Vec<String> {
    fn collect(filter: &Filter, names: &mut Vec<String>) {
        match filter {
            Filter::And(left, right) | Filter::Or(left, right) => {
                collect(left, names);
                collect(right, names);
            }
            Filter::Not(inner) => collect(inner, names),
            leaf => {
                if let Some(name) = leaf.attribute_name() {
                    if !names.iter().any(|existing| names::names_equal(existing, name)) {
                        names.push(name.to_string());
                    }
                }
            }
        }
    }
    let mut names = Vec::new();
    collect(filter, &mut names);
    names
}
