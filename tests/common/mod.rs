//! Shared fixtures for controller tests.
//!
//! Every fixture controller serves `/resource` with absolute links under
//! `http://localhost.localdomain`, so expected hrefs can be written out in
//! full.

#![allow(dead_code)]

use hal_resource::resource::{EventBackend, ResourceItem};
use hal_resource::{ResourceConfig, ResourceController};
use serde_json::{Value, json};

pub const ROUTE: &str = "/resource";
pub const SERVER_URL: &str = "http://localhost.localdomain";

/// Absolute href for a path under the fixture server.
pub fn href(path: &str) -> String {
    format!("{}{}", SERVER_URL, path)
}

/// Configuration used by the fixture controllers.
pub fn config() -> ResourceConfig {
    ResourceConfig::new()
        .with_route(ROUTE)
        .with_server_url(SERVER_URL)
}

/// Controller over `backend` with the fixture configuration.
pub fn controller(backend: EventBackend) -> ResourceController<EventBackend> {
    controller_with(backend, config())
}

/// Controller over `backend` with a custom configuration.
pub fn controller_with(
    backend: EventBackend,
    config: ResourceConfig,
) -> ResourceController<EventBackend> {
    init_logging();
    ResourceController::new(backend)
        .with_config(config)
        .expect("fixture configuration is valid")
}

/// Route log output through the test harness; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn item(id: &str) -> ResourceItem {
    ResourceItem::new().with_field("id", id).with_field("foo", "bar")
}

pub fn items(ids: &[&str]) -> Vec<ResourceItem> {
    ids.iter().map(|id| item(id)).collect()
}

/// Body of a write request without an identifier field.
pub fn anonymous_body() -> Value {
    json!({"foo": "bar"})
}
