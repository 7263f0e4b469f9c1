//! Backend trait for plugging business logic into a resource controller.
//!
//! This module defines the one trait users implement to give a resource its
//! behaviour. The controller calls exactly one hook per dispatch and never
//! retries. The design is async-first so a backend can await a database
//! without blocking, while the controller itself awaits each call to
//! completion.

use super::{Collection, ResourceItem};
use crate::controller::QueryParams;
use crate::error::BackendResult;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The fixed set of operations a resource supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a new item in the collection
    Create,
    /// Fetch a single item
    Fetch,
    /// Fetch the collection
    FetchAll,
    /// Partially update an item
    Patch,
    /// Replace an item
    Update,
    /// Delete an item
    Delete,
    /// Replace the whole collection
    ReplaceList,
}

impl Operation {
    /// Event-style name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Fetch => "fetch",
            Self::FetchAll => "fetchAll",
            Self::Patch => "patch",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ReplaceList => "replaceList",
        }
    }

    /// Whether the operation addresses a single identified item.
    pub fn targets_item(&self) -> bool {
        matches!(self, Self::Fetch | Self::Patch | Self::Update | Self::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input handed to a backend hook.
///
/// Bundles everything the request carried that an operation may need,
/// plus the namespace the controller was configured with so listener-based
/// backends can isolate handlers per controller.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Operation being invoked
    pub operation: Operation,
    /// Item identifier for item operations
    pub identifier: Option<String>,
    /// Request body, `Value::Null` when absent
    pub body: Value,
    /// Query parameters of the request
    pub query: QueryParams,
    /// Namespace of the dispatching controller
    pub namespace: Option<String>,
    /// Request ID for tracing and correlation
    pub request_id: String,
}

impl OperationContext {
    /// Create a context for an operation with no input.
    pub fn new(operation: Operation, request_id: impl Into<String>) -> Self {
        Self {
            operation,
            identifier: None,
            body: Value::Null,
            query: QueryParams::default(),
            namespace: None,
            request_id: request_id.into(),
        }
    }

    /// Set the item identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Set the query parameters.
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Set the controller namespace.
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Identifier, or an empty string for collection operations.
    pub fn identifier_or_empty(&self) -> &str {
        self.identifier.as_deref().unwrap_or_default()
    }
}

/// Business logic behind a resource.
///
/// Each hook returns the value the controller renders, or a
/// [`BackendError`](crate::error::BackendError) which is rendered as a
/// problem document. Returning "nothing" is meaningful: `fetch` returning
/// `None` becomes a 404 and `delete` returning `false` becomes a 422.
///
/// # Example Implementation
///
/// ```rust
/// use hal_resource::resource::{Collection, OperationContext, ResourceBackend, ResourceItem};
/// use hal_resource::error::{BackendError, BackendResult};
/// use std::future::Future;
///
/// struct Greetings;
///
/// impl ResourceBackend for Greetings {
///     fn create(&self, context: &OperationContext) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
///         let body = context.body.clone();
///         async move {
///             ResourceItem::from_value(body)
///                 .ok_or_else(|| BackendError::creation("body must be an object").with_status(400))
///         }
///     }
///
///     fn fetch(&self, context: &OperationContext) -> impl Future<Output = BackendResult<Option<ResourceItem>>> + Send {
///         let id = context.identifier_or_empty().to_string();
///         async move { Ok(Some(ResourceItem::new().with_field("id", id).with_field("text", "hello"))) }
///     }
///
///     fn fetch_all(&self, _context: &OperationContext) -> impl Future<Output = BackendResult<Option<Collection>>> + Send {
///         async { Ok(None) }
///     }
///
///     fn patch(&self, _context: &OperationContext) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
///         async { Err(BackendError::patch("read only")) }
///     }
///
///     fn update(&self, _context: &OperationContext) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
///         async { Err(BackendError::update("read only")) }
///     }
///
///     fn delete(&self, _context: &OperationContext) -> impl Future<Output = BackendResult<bool>> + Send {
///         async { Ok(false) }
///     }
///
///     fn replace_list(&self, _context: &OperationContext) -> impl Future<Output = BackendResult<Collection>> + Send {
///         async { Err(BackendError::update("read only")) }
///     }
/// }
/// ```
pub trait ResourceBackend {
    /// Create an item from `context.body`.
    fn create(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send;

    /// Fetch the item named by `context.identifier`.
    fn fetch(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Option<ResourceItem>>> + Send;

    /// Fetch the collection.
    fn fetch_all(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Option<Collection>>> + Send;

    /// Apply a partial update from `context.body`.
    fn patch(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send;

    /// Replace the item with `context.body`.
    fn update(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send;

    /// Delete the item; `false` means it could not be deleted.
    fn delete(&self, context: &OperationContext) -> impl Future<Output = BackendResult<bool>> + Send;

    /// Replace the whole collection with `context.body`.
    fn replace_list(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Collection>> + Send;
}

impl<B: ResourceBackend + Send + Sync> ResourceBackend for Arc<B> {
    fn create(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
        (**self).create(context)
    }

    fn fetch(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Option<ResourceItem>>> + Send {
        (**self).fetch(context)
    }

    fn fetch_all(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Option<Collection>>> + Send {
        (**self).fetch_all(context)
    }

    fn patch(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
        (**self).patch(context)
    }

    fn update(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<ResourceItem>> + Send {
        (**self).update(context)
    }

    fn delete(&self, context: &OperationContext) -> impl Future<Output = BackendResult<bool>> + Send {
        (**self).delete(context)
    }

    fn replace_list(
        &self,
        context: &OperationContext,
    ) -> impl Future<Output = BackendResult<Collection>> + Send {
        (**self).replace_list(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::FetchAll.name(), "fetchAll");
        assert_eq!(Operation::ReplaceList.to_string(), "replaceList");
        assert!(Operation::Delete.targets_item());
        assert!(!Operation::Create.targets_item());
    }

    #[test]
    fn test_context_builder() {
        let context = OperationContext::new(Operation::Update, "req-1")
            .with_identifier("foo")
            .with_body(json!({"bar": "baz"}))
            .with_namespace(Some("users".to_string()));

        assert_eq!(context.identifier_or_empty(), "foo");
        assert_eq!(context.body["bar"], "baz");
        assert_eq!(context.namespace.as_deref(), Some("users"));
        assert_eq!(context.request_id, "req-1");
    }
}
