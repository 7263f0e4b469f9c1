//! Controller configuration.
//!
//! [`ResourceConfig`] holds everything a controller needs besides its
//! backend: the collection route, the permitted methods for collection and
//! item requests, pagination and payload naming. It can be built fluently
//! or deserialized from JSON; missing fields take their defaults.

use super::request::Target;
use crate::error::{ConfigError, ConfigResult};
use crate::resource::DEFAULT_IDENTIFIER_NAME;
use crate::resource::paginator::DEFAULT_PAGE_SIZE;
use http::Method;
use serde::{Deserialize, Serialize};

/// Verbs a permitted-method table may contain.
const KNOWN_METHODS: [&str; 7] = ["DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PUT"];

/// Names of the payload members in rendered documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadKeys {
    /// Member holding an item's fields
    pub item: String,
    /// Member holding a collection's embedded items
    pub collection: String,
}

impl Default for PayloadKeys {
    fn default() -> Self {
        Self {
            item: "item".to_string(),
            collection: "items".to_string(),
        }
    }
}

impl PayloadKeys {
    /// Member names used by older clients.
    pub fn legacy() -> Self {
        Self {
            item: "resource".to_string(),
            collection: "resources".to_string(),
        }
    }
}

/// Configuration for a [`ResourceController`](super::ResourceController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceConfig {
    /// Collection route, e.g. `/resource`; required to dispatch
    pub route: Option<String>,
    /// Methods permitted on the collection
    pub collection_http_methods: Vec<String>,
    /// Methods permitted on an item
    pub item_http_methods: Vec<String>,
    /// Items per page for paginated collections
    pub page_size: usize,
    /// Field holding an item's identifier
    pub identifier_name: String,
    /// Payload member names
    pub payload_keys: PayloadKeys,
    /// Namespace handed to the backend with every operation
    pub event_identifier: Option<String>,
    /// Include error causes and their debug form in problem details
    pub detail_includes_stack_trace: bool,
    /// `scheme://host[:port]` for absolute links
    pub server_url: Option<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            route: None,
            collection_http_methods: vec!["GET".into(), "HEAD".into(), "POST".into()],
            item_http_methods: vec![
                "DELETE".into(),
                "GET".into(),
                "HEAD".into(),
                "PATCH".into(),
                "PUT".into(),
            ],
            page_size: DEFAULT_PAGE_SIZE,
            identifier_name: DEFAULT_IDENTIFIER_NAME.to_string(),
            payload_keys: PayloadKeys::default(),
            event_identifier: None,
            detail_includes_stack_trace: false,
            server_url: None,
        }
    }
}

impl ResourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::invalid(format!("unable to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_collection_http_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.collection_http_methods = normalize(methods);
        self
    }

    pub fn with_item_http_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.item_http_methods = normalize(methods);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_identifier_name(mut self, name: impl Into<String>) -> Self {
        self.identifier_name = name.into();
        self
    }

    pub fn with_payload_keys(mut self, keys: PayloadKeys) -> Self {
        self.payload_keys = keys;
        self
    }

    pub fn with_event_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.event_identifier = Some(identifier.into());
        self
    }

    pub fn with_stack_traces(mut self, flag: bool) -> Self {
        self.detail_includes_stack_trace = flag;
        self
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Permitted-method table for a target.
    pub fn http_methods(&self, target: Target) -> &[String] {
        match target {
            Target::Collection => &self.collection_http_methods,
            Target::Item => &self.item_http_methods,
        }
    }

    /// Whether a method is in the table for a target.
    pub fn permits(&self, target: Target, method: &Method) -> bool {
        self.http_methods(target)
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method.as_str()))
    }

    /// `Allow` header value for a target: sorted, deduplicated, `", "` joined.
    pub fn allow_header(&self, target: Target) -> String {
        let mut methods = normalize(self.http_methods(target));
        methods.sort();
        methods.dedup();
        methods.join(", ")
    }

    /// Validate the configuration.
    ///
    /// A missing route is not an error here; it is reported when a request
    /// is dispatched.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(route) = &self.route {
            if !route.starts_with('/') {
                return Err(ConfigError::invalid(format!(
                    "route '{}' must start with '/'",
                    route
                )));
            }
        }

        if self.page_size == 0 {
            return Err(ConfigError::invalid("page size must be greater than zero"));
        }

        if self.identifier_name.is_empty() {
            return Err(ConfigError::invalid("identifier name cannot be empty"));
        }

        if self.payload_keys.item.is_empty() || self.payload_keys.collection.is_empty() {
            return Err(ConfigError::invalid("payload keys cannot be empty"));
        }

        for (label, methods) in [
            ("collection", &self.collection_http_methods),
            ("item", &self.item_http_methods),
        ] {
            if methods.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "{} method table cannot be empty",
                    label
                )));
            }
            if let Some(unknown) = methods
                .iter()
                .find(|m| !KNOWN_METHODS.contains(&m.to_ascii_uppercase().as_str()))
            {
                return Err(ConfigError::invalid(format!(
                    "unknown {} method '{}'",
                    label, unknown
                )));
            }
        }

        Ok(())
    }
}

fn normalize<I, S>(methods: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    methods
        .into_iter()
        .map(|m| m.as_ref().trim().to_ascii_uppercase())
        .collect()
}
