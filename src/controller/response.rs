//! Rendered responses.
//!
//! A [`RenderedResponse`] is what the transport turns into bytes: a status,
//! headers and one of four bodies (nothing, a HAL item, a HAL collection or a
//! problem document). The representation chosen from `Accept` tells the
//! transport whether to serialize the document directly or hand it to a
//! template as view variables.

use crate::links::Links;
use crate::problem::{API_PROBLEM_CONTENT_TYPE, ProblemDocument};
use crate::resource::ResourceItem;
use http::header::{ALLOW, CONTENT_TYPE, HeaderMap, HeaderValue};
use http::StatusCode;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

/// Content type for HAL documents under the JSON representation.
pub const HAL_CONTENT_TYPE: &str = "application/hal+json";

/// How the transport should present the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Serialize the document as JSON
    Json,
    /// Pass the document to a template
    View,
}

impl Representation {
    /// Pick a representation from an `Accept` header value.
    ///
    /// `application/json` and any `+json` media type select JSON.
    pub fn from_accept(accept: Option<&str>) -> Self {
        let wants_json = accept.is_some_and(|accept| {
            accept.split(',').any(|media| {
                let media = media
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase();
                media == "application/json" || media.ends_with("+json")
            })
        });

        if wants_json { Self::Json } else { Self::View }
    }
}

/// HAL document for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct HalItem {
    pub links: Links,
    pub item: ResourceItem,
    pub item_key: String,
}

impl Serialize for HalItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("_links", &self.links)?;
        map.serialize_entry(&self.item_key, &self.item)?;
        map.end()
    }
}

/// HAL document for a collection or collection page.
#[derive(Debug, Clone, PartialEq)]
pub struct HalCollection {
    pub links: Links,
    pub items: Vec<HalItem>,
    pub collection_key: String,
}

impl Serialize for HalCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("_links", &self.links)?;
        map.serialize_entry(&self.collection_key, &self.items)?;
        map.end()
    }
}

/// Body of a rendered response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No content (204, 405, OPTIONS)
    Empty,
    Item(HalItem),
    Collection(HalCollection),
    Problem(ProblemDocument),
}

impl ResponseBody {
    /// The document as JSON; `None` for an empty body.
    pub fn to_json(&self) -> Option<Value> {
        let value = match self {
            Self::Empty => return None,
            Self::Item(item) => serde_json::to_value(item),
            Self::Collection(collection) => serde_json::to_value(collection),
            Self::Problem(problem) => serde_json::to_value(problem),
        };
        // Links, items and problems are plain maps of strings and numbers.
        value.ok()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Variables for template-based rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub variables: Map<String, Value>,
}

/// Document in the form the transport should emit.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Json(Value),
    View(ViewModel),
}

/// Outcome of one dispatch.
#[derive(Debug, Clone)]
pub struct RenderedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
    pub representation: Representation,
    /// Request ID the dispatch ran under
    pub request_id: String,
}

impl RenderedResponse {
    pub(super) fn new(representation: Representation, request_id: String) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
            representation,
            request_id,
        }
    }

    /// Empty response carrying an `Allow` header.
    pub(super) fn allow(
        status: StatusCode,
        allow: &str,
        representation: Representation,
        request_id: String,
    ) -> Self {
        let mut response = Self::new(representation, request_id);
        response.status = status;
        if let Ok(value) = HeaderValue::from_str(allow) {
            response.headers.insert(ALLOW, value);
        }
        response
    }

    /// Set the body and, for the JSON representation, its content type.
    pub(super) fn set_body(&mut self, body: ResponseBody) {
        let content_type = match &body {
            ResponseBody::Empty => None,
            ResponseBody::Problem(_) => Some(API_PROBLEM_CONTENT_TYPE),
            ResponseBody::Item(_) | ResponseBody::Collection(_) => Some(HAL_CONTENT_TYPE),
        };
        if let (Representation::Json, Some(content_type)) = (self.representation, content_type) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        self.body = body;
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Problem document, if this is a failure.
    pub fn problem(&self) -> Option<&ProblemDocument> {
        match &self.body {
            ResponseBody::Problem(problem) => Some(problem),
            _ => None,
        }
    }

    /// `Allow` header value, if set.
    pub fn allow_header(&self) -> Option<&str> {
        self.headers.get(ALLOW).and_then(|v| v.to_str().ok())
    }

    /// Header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as JSON regardless of representation.
    pub fn to_json(&self) -> Option<Value> {
        self.body.to_json()
    }

    /// Body in the form selected by the representation.
    pub fn model(&self) -> Option<Model> {
        let value = self.body.to_json()?;
        Some(match self.representation {
            Representation::Json => Model::Json(value),
            Representation::View => Model::View(ViewModel {
                variables: match value {
                    Value::Object(map) => map,
                    other => Map::from_iter([("payload".to_string(), other)]),
                },
            }),
        })
    }
}
