//! Listener-chain backend.
//!
//! [`EventBackend`] implements [`ResourceBackend`] by running closures
//! attached to operation names. Listeners run in attachment order and the
//! first one that answers with `Some` wins; the rest are skipped. Listeners
//! may be scoped to a namespace, in which case they only run for
//! controllers configured with that event identifier.
//!
//! When no listener answers, each operation falls back to a neutral
//! result: writes echo the request body, `fetch` finds nothing, `fetch_all`
//! yields an empty list and `delete` reports failure.

use super::backend::{Operation, OperationContext, ResourceBackend};
use super::{Collection, Paginator, ResourceItem};
use crate::error::{BackendError, BackendResult};
use log::{debug, trace};
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Value a listener may answer with.
#[derive(Debug)]
pub enum Payload {
    /// A single item
    Item(ResourceItem),
    /// A collection of items
    Collection(Collection),
    /// A boolean outcome; `false` also means "nothing found" for fetches
    Bool(bool),
}

impl Payload {
    fn describe(&self) -> &'static str {
        match self {
            Self::Item(_) => "an item",
            Self::Collection(_) => "a collection",
            Self::Bool(_) => "a boolean",
        }
    }
}

impl From<ResourceItem> for Payload {
    fn from(item: ResourceItem) -> Self {
        Self::Item(item)
    }
}

impl From<Collection> for Payload {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

impl From<Vec<ResourceItem>> for Payload {
    fn from(items: Vec<ResourceItem>) -> Self {
        Self::Collection(Collection::Plain(items))
    }
}

impl From<Paginator> for Payload {
    fn from(paginator: Paginator) -> Self {
        Self::Collection(Collection::Paginated(paginator))
    }
}

impl From<bool> for Payload {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

/// Result returned by a listener; `Ok(None)` passes to the next listener.
pub type ListenerResult = BackendResult<Option<Payload>>;

type Listener = Box<dyn Fn(&OperationContext) -> ListenerResult + Send + Sync>;

struct Registration {
    operation: Operation,
    namespace: Option<String>,
    listener: Listener,
}

/// Backend built from per-operation listener chains.
#[derive(Default)]
pub struct EventBackend {
    registrations: Vec<Registration>,
}

impl EventBackend {
    /// Create a backend with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener that runs for every controller.
    pub fn on<F>(&mut self, operation: Operation, listener: F) -> &mut Self
    where
        F: Fn(&OperationContext) -> ListenerResult + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            operation,
            namespace: None,
            listener: Box::new(listener),
        });
        self
    }

    /// Attach a listener that only runs for controllers using `namespace`.
    pub fn on_namespace<F>(
        &mut self,
        namespace: impl Into<String>,
        operation: Operation,
        listener: F,
    ) -> &mut Self
    where
        F: Fn(&OperationContext) -> ListenerResult + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            operation,
            namespace: Some(namespace.into()),
            listener: Box::new(listener),
        });
        self
    }

    /// Fluent form of [`on`](Self::on).
    pub fn with_listener<F>(mut self, operation: Operation, listener: F) -> Self
    where
        F: Fn(&OperationContext) -> ListenerResult + Send + Sync + 'static,
    {
        self.on(operation, listener);
        self
    }

    /// Number of listeners attached to an operation, scoped or not.
    pub fn listener_count(&self, operation: Operation) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    /// Run the listener chain for the context's operation.
    pub fn trigger(&self, context: &OperationContext) -> ListenerResult {
        let applicable = self.registrations.iter().filter(|r| {
            r.operation == context.operation
                && match &r.namespace {
                    Some(namespace) => context.namespace.as_deref() == Some(namespace.as_str()),
                    None => true,
                }
        });

        for (position, registration) in applicable.enumerate() {
            if let Some(payload) = (registration.listener)(context)? {
                trace!(
                    "Listener {} answered '{}' with {} (request: '{}')",
                    position,
                    context.operation,
                    payload.describe(),
                    context.request_id
                );
                return Ok(Some(payload));
            }
        }

        debug!(
            "No listener answered '{}' (request: '{}')",
            context.operation, context.request_id
        );
        Ok(None)
    }

    fn item_or_body(&self, context: &OperationContext) -> BackendResult<ResourceItem> {
        match self.trigger(context)? {
            Some(Payload::Item(item)) => Ok(item),
            Some(other) => Err(unexpected(context.operation, &other)),
            None => Ok(ResourceItem::from_value(context.body.clone()).unwrap_or_default()),
        }
    }
}

fn unexpected(operation: Operation, payload: &Payload) -> BackendError {
    BackendError::other(format!(
        "Listener for '{}' answered with {}",
        operation,
        payload.describe()
    ))
}

fn items_from_body(body: &Value) -> Vec<ResourceItem> {
    match body {
        Value::Array(values) => values
            .iter()
            .cloned()
            .filter_map(ResourceItem::from_value)
            .collect(),
        _ => Vec::new(),
    }
}

impl fmt::Debug for EventBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBackend")
            .field("listeners", &self.registrations.len())
            .finish()
    }
}

impl ResourceBackend for EventBackend {
    fn create(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
        let result = self.item_or_body(context);
        async move { result }
    }

    fn fetch(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Option<ResourceItem>>> + Send {
        let result = match self.trigger(context) {
            Ok(Some(Payload::Item(item))) => Ok(Some(item)),
            Ok(Some(Payload::Bool(false))) | Ok(None) => Ok(None),
            Ok(Some(other)) => Err(unexpected(context.operation, &other)),
            Err(e) => Err(e),
        };
        async move { result }
    }

    fn fetch_all(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Option<Collection>>> + Send {
        let result = match self.trigger(context) {
            Ok(Some(Payload::Collection(collection))) => Ok(Some(collection)),
            Ok(Some(Payload::Bool(false))) => Ok(None),
            Ok(None) => Ok(Some(Collection::Plain(Vec::new()))),
            Ok(Some(other)) => Err(unexpected(context.operation, &other)),
            Err(e) => Err(e),
        };
        async move { result }
    }

    fn patch(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
        let result = self.item_or_body(context);
        async move { result }
    }

    fn update(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
        let result = self.item_or_body(context);
        async move { result }
    }

    fn delete(&self, context: &OperationContext) -> impl Future<Output = BackendResult<bool>> + Send {
        let result = match self.trigger(context) {
            Ok(Some(Payload::Bool(deleted))) => Ok(deleted),
            Ok(None) => Ok(false),
            Ok(Some(other)) => Err(unexpected(context.operation, &other)),
            Err(e) => Err(e),
        };
        async move { result }
    }

    fn replace_list(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Collection>> + Send {
        let result = match self.trigger(context) {
            Ok(Some(Payload::Collection(collection))) => Ok(collection),
            Ok(None) => Ok(Collection::Plain(items_from_body(&context.body))),
            Ok(Some(other)) => Err(unexpected(context.operation, &other)),
            Err(e) => Err(e),
        };
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(operation: Operation) -> OperationContext {
        OperationContext::new(operation, "test-request")
    }

    fn item(id: &str) -> ResourceItem {
        ResourceItem::new().with_field("id", id).with_field("bar", "baz")
    }

    #[tokio::test]
    async fn test_first_answer_wins() {
        let mut backend = EventBackend::new();
        backend
            .on(Operation::Fetch, |_| Ok(None))
            .on(Operation::Fetch, |_| Ok(Some(item("first").into())))
            .on(Operation::Fetch, |_| Ok(Some(item("second").into())));

        let found = backend.fetch(&context(Operation::Fetch)).await.unwrap();
        assert_eq!(found.unwrap().identifier("id"), Some("first".to_string()));
        assert_eq!(backend.listener_count(Operation::Fetch), 3);
    }

    #[tokio::test]
    async fn test_errors_stop_the_chain() {
        let backend = EventBackend::new()
            .with_listener(Operation::Create, |_| Err(BackendError::creation("failed")))
            .with_listener(Operation::Create, |_| Ok(Some(item("never").into())));

        let error = backend.create(&context(Operation::Create)).await.unwrap_err();
        assert_eq!(error.to_string(), "failed");
    }

    #[tokio::test]
    async fn test_namespaced_listeners_are_isolated() {
        let mut backend = EventBackend::new();
        backend.on_namespace("users", Operation::Fetch, |_| Ok(Some(item("user").into())));

        let anonymous = backend.fetch(&context(Operation::Fetch)).await.unwrap();
        assert!(anonymous.is_none());

        let scoped = context(Operation::Fetch).with_namespace(Some("users".to_string()));
        assert!(backend.fetch(&scoped).await.unwrap().is_some());

        let other = context(Operation::Fetch).with_namespace(Some("groups".to_string()));
        assert!(backend.fetch(&other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fallbacks_without_listeners() {
        let backend = EventBackend::new();
        let body = json!({"id": "foo", "bar": "baz"});

        let created = backend
            .create(&context(Operation::Create).with_body(body.clone()))
            .await
            .unwrap();
        assert_eq!(created.into_value(), body);

        assert!(backend.fetch(&context(Operation::Fetch)).await.unwrap().is_none());
        assert!(!backend.delete(&context(Operation::Delete)).await.unwrap());

        let all = backend
            .fetch_all(&context(Operation::FetchAll))
            .await
            .unwrap()
            .unwrap();
        assert!(all.is_empty_list());

        let replaced = backend
            .replace_list(&context(Operation::ReplaceList).with_body(json!([{"id": "a"}, 3])))
            .await
            .unwrap();
        match replaced {
            Collection::Plain(items) => assert_eq!(items.len(), 1),
            Collection::Paginated(_) => panic!("expected a plain collection"),
        }
    }

    #[tokio::test]
    async fn test_false_from_fetch_means_not_found() {
        let backend =
            EventBackend::new().with_listener(Operation::Fetch, |_| Ok(Some(false.into())));
        assert!(backend.fetch(&context(Operation::Fetch)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_an_error() {
        let backend =
            EventBackend::new().with_listener(Operation::Delete, |_| Ok(Some(item("x").into())));
        let error = backend.delete(&context(Operation::Delete)).await.unwrap_err();
        assert!(error.to_string().contains("an item"));
    }
}
