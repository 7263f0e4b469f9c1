//! Resource values exchanged between the controller and a backend.
//!
//! A backend answers each operation with one of the values defined here:
//! a single [`ResourceItem`], a [`Collection`] of items (optionally backed by
//! a [`Paginator`]) or, for deletes, a plain `bool`. Rendering only ever wraps
//! these values; it never mutates them.
//!
//! # Key Types
//!
//! - [`ResourceItem`] - JSON object with a designated identifier field
//! - [`Collection`] - Plain list or paginated set of items
//! - [`ResourceBackend`] - Trait implemented by business logic
//! - [`EventBackend`] - Listener chain implementation of the backend trait

pub mod backend;
pub mod events;
pub mod paginator;

pub use backend::{Operation, OperationContext, ResourceBackend};
pub use events::{EventBackend, ListenerResult, Payload};
pub use paginator::{PageAdapter, Paginator};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default name of the identifier field.
pub const DEFAULT_IDENTIFIER_NAME: &str = "id";

/// A single resource as returned by a backend.
///
/// Items are JSON objects. The identifier field is looked up by name at
/// render time so the same item type works for any identifier convention.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceItem(Map<String, Value>);

impl ResourceItem {
    /// Create an empty item.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build an item from a JSON value.
    ///
    /// Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Add a field, replacing any previous value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Identifier of this item under the given field name.
    ///
    /// Strings are used verbatim and numbers are rendered in their JSON
    /// form. Any other value, or an empty string, counts as no identifier.
    pub fn identifier(&self, identifier_name: &str) -> Option<String> {
        match self.0.get(identifier_name)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Borrow the underlying fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the item, returning its JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ResourceItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for ResourceItem {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// A set of items returned by `fetch_all` or `replace_list`.
#[derive(Debug)]
pub enum Collection {
    /// All items, in order, without pagination
    Plain(Vec<ResourceItem>),
    /// Items served page by page
    Paginated(Paginator),
}

impl Collection {
    /// Whether this is a plain collection with no items.
    ///
    /// A paginator is never considered empty: an empty page still has
    /// meaningful navigation links.
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Self::Plain(items) if items.is_empty())
    }

    /// Whether this collection is paginated.
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::Paginated(_))
    }
}

impl From<Vec<ResourceItem>> for Collection {
    fn from(items: Vec<ResourceItem>) -> Self {
        Self::Plain(items)
    }
}

impl From<Paginator> for Collection {
    fn from(paginator: Paginator) -> Self {
        Self::Paginated(paginator)
    }
}
