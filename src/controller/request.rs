//! Request types consumed by the controller.
//!
//! The transport parses the raw HTTP request; this module only describes the
//! result: method, optional identifier, decoded JSON body, ordered query
//! parameters and headers. Builder methods mirror the common verbs.

use crate::links::PAGE_PARAM;
use http::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde_json::Value;
use std::num::IntErrorKind;
use url::form_urlencoded;

/// Whether a request addresses the collection or one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Collection,
    Item,
}

/// Ordered query parameters.
///
/// Order is preserved so generated links reproduce the caller's query
/// string. Lookups return the first value for a key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Parse a raw query string such as `sort=name&page=2`.
    ///
    /// Decoding follows `application/x-www-form-urlencoded`, so `+` is a
    /// space and a key without `=` has an empty value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// First value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Requested page number.
    ///
    /// Missing, malformed or non-positive values all read as page 1. Values
    /// too large for `usize` read as `usize::MAX`; the paginator clamps
    /// anything past the last page.
    pub fn page(&self) -> usize {
        self.get(PAGE_PARAM)
            .and_then(|p| match p.trim().parse::<usize>() {
                Ok(page) => Some(page),
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
                Err(_) => None,
            })
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A parsed request for a resource.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    /// HTTP method
    pub method: Method,
    /// Identifier segment from the URL, if any
    pub identifier: Option<String>,
    /// Decoded request body
    pub body: Option<Value>,
    /// Query parameters
    pub query: QueryParams,
    /// Request headers
    pub headers: HeaderMap,
    /// Request ID for tracing and correlation
    pub request_id: Option<String>,
}

impl ResourceRequest {
    /// Create a request for a method with no identifier, body or query.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            identifier: None,
            body: None,
            query: QueryParams::default(),
            headers: HeaderMap::new(),
            request_id: None,
        }
    }

    /// `GET` on the collection.
    pub fn list() -> Self {
        Self::new(Method::GET)
    }

    /// `GET` on an item.
    pub fn get(identifier: impl Into<String>) -> Self {
        Self::new(Method::GET).with_identifier(identifier)
    }

    /// `POST` on the collection.
    pub fn create(body: Value) -> Self {
        Self::new(Method::POST).with_body(body)
    }

    /// `PATCH` on an item.
    pub fn patch(identifier: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH)
            .with_identifier(identifier)
            .with_body(body)
    }

    /// `PUT` on an item.
    pub fn update(identifier: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT)
            .with_identifier(identifier)
            .with_body(body)
    }

    /// `PUT` on the collection.
    pub fn replace_list(body: Value) -> Self {
        Self::new(Method::PUT).with_body(body)
    }

    /// `DELETE` on an item.
    pub fn delete(identifier: impl Into<String>) -> Self {
        Self::new(Method::DELETE).with_identifier(identifier)
    }

    /// Set the identifier; an empty identifier addresses the collection.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        self.identifier = (!identifier.is_empty()).then_some(identifier);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the `Accept` header.
    pub fn with_accept(self, accept: &'static str) -> Self {
        self.with_header(ACCEPT, HeaderValue::from_static(accept))
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Collection or item, by identifier presence.
    pub fn target(&self) -> Target {
        match self.identifier {
            Some(_) => Target::Item,
            None => Target::Collection,
        }
    }

    /// `Accept` header value, when present and readable.
    pub fn accept(&self) -> Option<&str> {
        self.headers.get(ACCEPT).and_then(|v| v.to_str().ok())
    }
}
