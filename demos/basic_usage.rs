//! Basic Resource Controller Usage Example
//!
//! This example implements an in-memory backend for a `/users` resource and
//! dispatches a few requests through a controller, printing the rendered
//! HAL and problem documents.
//!
//! Run with `RUST_LOG=debug` to see the dispatch log.

use hal_resource::resource::{Collection, OperationContext, Paginator, ResourceItem};
use hal_resource::{
    BackendError, BackendResult, QueryParams, RenderedResponse, ResourceBackend, ResourceConfig,
    ResourceController, ResourceRequest,
};
use http::Method;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Users keyed by identifier.
#[derive(Default)]
struct InMemoryUsers {
    users: RwLock<BTreeMap<String, ResourceItem>>,
    next_id: AtomicU64,
}

impl InMemoryUsers {
    fn body_item(context: &OperationContext) -> BackendResult<ResourceItem> {
        ResourceItem::from_value(context.body.clone())
            .ok_or_else(|| BackendError::other("request body must be a JSON object").with_status(400))
    }
}

impl ResourceBackend for InMemoryUsers {
    async fn create(&self, context: &OperationContext) -> BackendResult<ResourceItem> {
        let id = (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
        let user = Self::body_item(context)?.with_field("id", id.clone());
        self.users.write().await.insert(id, user.clone());
        Ok(user)
    }

    async fn fetch(&self, context: &OperationContext) -> BackendResult<Option<ResourceItem>> {
        Ok(self.users.read().await.get(context.identifier_or_empty()).cloned())
    }

    async fn fetch_all(&self, _context: &OperationContext) -> BackendResult<Option<Collection>> {
        let users: Vec<ResourceItem> = self.users.read().await.values().cloned().collect();
        Ok(Some(Paginator::new(users).into()))
    }

    async fn patch(&self, context: &OperationContext) -> BackendResult<ResourceItem> {
        let changes = Self::body_item(context)?;
        let mut users = self.users.write().await;
        let user = users
            .get_mut(context.identifier_or_empty())
            .ok_or_else(|| BackendError::patch("no such user").with_status(404))?;

        let mut fields = user.fields().clone();
        for (name, value) in changes.fields() {
            fields.insert(name.clone(), value.clone());
        }
        *user = ResourceItem::from(fields);
        Ok(user.clone())
    }

    async fn update(&self, context: &OperationContext) -> BackendResult<ResourceItem> {
        let id = context.identifier_or_empty().to_string();
        let user = Self::body_item(context)?.with_field("id", id.clone());
        self.users.write().await.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, context: &OperationContext) -> BackendResult<bool> {
        Ok(self
            .users
            .write()
            .await
            .remove(context.identifier_or_empty())
            .is_some())
    }

    async fn replace_list(&self, context: &OperationContext) -> BackendResult<Collection> {
        let mut users = self.users.write().await;
        users.clear();
        for value in context.body.as_array().into_iter().flatten() {
            if let Some(user) = ResourceItem::from_value(value.clone()) {
                if let Some(id) = user.identifier("id") {
                    users.insert(id, user);
                }
            }
        }
        Ok(users.values().cloned().collect::<Vec<_>>().into())
    }
}

fn show(label: &str, response: &RenderedResponse) {
    println!("\n{} -> {}", label, response.status);
    if let Some(allow) = response.allow_header() {
        println!("Allow: {}", allow);
    }
    if let Some(location) = response.header("location") {
        println!("Location: {}", location);
    }
    if let Some(document) = response.to_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&document).unwrap_or_default()
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ResourceConfig::new()
        .with_route("/users")
        .with_page_size(2)
        .with_server_url("http://localhost:8080");
    let controller = ResourceController::new(InMemoryUsers::default()).with_config(config)?;

    for name in ["Ada", "Grace", "Barbara"] {
        let request = ResourceRequest::create(json!({"name": name})).with_accept("application/json");
        let response = controller.dispatch(request).await?;
        show(&format!("POST /users ({})", name), &response);
    }

    let page = QueryParams::parse("page=2");
    let response = controller
        .dispatch(ResourceRequest::list().with_query(page))
        .await?;
    show("GET /users?page=2", &response);

    let response = controller
        .dispatch(ResourceRequest::patch("2", json!({"title": "Rear Admiral"})))
        .await?;
    show("PATCH /users/2", &response);

    let response = controller.dispatch(ResourceRequest::delete("1")).await?;
    show("DELETE /users/1", &response);

    let response = controller.dispatch(ResourceRequest::get("1")).await?;
    show("GET /users/1", &response);

    let response = controller
        .dispatch(ResourceRequest::new(Method::DELETE))
        .await?;
    show("DELETE /users", &response);

    let response = controller
        .dispatch(ResourceRequest::new(Method::OPTIONS).with_identifier("2"))
        .await?;
    show("OPTIONS /users/2", &response);

    Ok(())
}
