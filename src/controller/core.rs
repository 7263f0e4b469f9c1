//! Resource controller and dispatch.
//!
//! The controller checks the request method against the configured tables,
//! maps it to one backend operation, invokes the backend once and renders
//! the outcome as a HAL document, a problem document or an empty response.

use super::config::ResourceConfig;
use super::handlers::{self, Failure, FailureDetail, Success};
use super::request::{ResourceRequest, Target};
use super::response::{HalCollection, HalItem, RenderedResponse, Representation, ResponseBody};
use crate::error::{ConfigError, ConfigResult, LinkResult};
use crate::links::{LinkBuilder, ServerUrl};
use crate::problem::{ProblemDetail, ProblemRenderer};
use crate::resource::{Collection, Operation, OperationContext, ResourceBackend};
use http::header::{HeaderValue, LOCATION};
use http::{Method, StatusCode};
use log::{debug, info, trace, warn};
use serde_json::Value;

/// Generic REST endpoint for one resource.
///
/// Holds the backend, the configuration and the collaborators used for
/// rendering. A controller is configured once and then serves any number of
/// requests through [`dispatch`](Self::dispatch).
#[derive(Debug)]
pub struct ResourceController<P> {
    backend: Option<P>,
    config: ResourceConfig,
    links: LinkBuilder,
    problems: ProblemRenderer,
}

impl<P> ResourceController<P> {
    /// Create a controller for a backend with default configuration.
    ///
    /// A route must still be set before requests can be dispatched.
    pub fn new(backend: P) -> Self {
        Self {
            backend: Some(backend),
            config: ResourceConfig::default(),
            links: LinkBuilder::new(),
            problems: ProblemRenderer::new(),
        }
    }

    /// Create a controller with no backend attached.
    ///
    /// Dispatching fails with [`ConfigError::MissingBackend`] until one is
    /// set.
    pub fn unbound() -> Self {
        Self {
            backend: None,
            config: ResourceConfig::default(),
            links: LinkBuilder::new(),
            problems: ProblemRenderer::new(),
        }
    }

    /// Apply a validated configuration.
    ///
    /// A configured server URL makes generated links absolute; the stack
    /// trace flag is handed to the problem renderer.
    pub fn with_config(mut self, config: ResourceConfig) -> ConfigResult<Self> {
        config.validate()?;

        if let Some(url) = &config.server_url {
            let server = ServerUrl::parse(url)
                .map_err(|e| ConfigError::invalid(format!("server URL: {}", e)))?;
            self.links = self.links.with_host_resolver(server);
        }
        self.problems = self
            .problems
            .with_stack_trace(config.detail_includes_stack_trace);
        self.config = config;
        Ok(self)
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.config.route = Some(route.into());
        self
    }

    pub fn with_backend(mut self, backend: P) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn set_backend(&mut self, backend: P) {
        self.backend = Some(backend);
    }

    /// Replace the link builder, e.g. to use a custom route assembler.
    pub fn with_link_builder(mut self, links: LinkBuilder) -> Self {
        self.links = links;
        self
    }

    /// Replace the problem renderer, e.g. to extend the title table.
    pub fn with_problem_renderer(mut self, problems: ProblemRenderer) -> Self {
        self.problems = problems;
        self
    }

    /// Set the page size applied to paginated collections.
    ///
    /// Zero is raised to one.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.config.page_size = page_size.max(1);
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn backend(&self) -> Option<&P> {
        self.backend.as_ref()
    }

    pub fn collection_http_methods(&self) -> &[String] {
        self.config.http_methods(Target::Collection)
    }

    pub fn item_http_methods(&self) -> &[String] {
        self.config.http_methods(Target::Item)
    }
}

impl<P: ResourceBackend + Sync> ResourceController<P> {
    /// Dispatch a request and render its outcome.
    ///
    /// Only configuration problems are returned as errors. Every other
    /// failure, including backend errors, is rendered into the response.
    pub async fn dispatch(&self, request: ResourceRequest) -> ConfigResult<RenderedResponse> {
        let backend = self.backend.as_ref().ok_or(ConfigError::MissingBackend)?;
        let route = self.config.route.as_deref().ok_or(ConfigError::MissingRoute)?;

        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let target = request.target();
        let representation = Representation::from_accept(request.accept());

        info!(
            "Resource controller processing {} {} {:?} (request: '{}')",
            request.method,
            route,
            request.identifier.as_deref().unwrap_or_default(),
            request_id
        );

        if request.method == Method::OPTIONS {
            debug!("Answering OPTIONS for {:?} (request: '{}')", target, request_id);
            return Ok(RenderedResponse::allow(
                StatusCode::NO_CONTENT,
                &self.config.allow_header(target),
                representation,
                request_id,
            ));
        }

        let operation = match operation_for(&request.method, target) {
            Some(operation) if self.config.permits(target, &request.method) => operation,
            _ => {
                warn!(
                    "Method {} not allowed on {:?} of {} (request: '{}')",
                    request.method, target, route, request_id
                );
                return Ok(RenderedResponse::allow(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &self.config.allow_header(target),
                    representation,
                    request_id,
                ));
            }
        };

        let mut context = OperationContext::new(operation, request_id.clone())
            .with_body(request.body.unwrap_or(Value::Null))
            .with_query(request.query)
            .with_namespace(self.config.event_identifier.clone());
        if let Some(identifier) = request.identifier {
            context = context.with_identifier(identifier);
        }

        trace!("Invoking '{}' (request: '{}')", operation, request_id);
        let outcome = handlers::invoke(backend, &context, &self.config.identifier_name).await;

        let mut response = RenderedResponse::new(representation, request_id);
        let rendered = match outcome {
            Ok(success) => self
                .render_success(route, success, &context, &mut response)
                .map_err(Failure::from),
            Err(failure) => Err(failure),
        };

        match rendered {
            Ok(()) => debug!(
                "Operation '{}' completed with {} (request: '{}')",
                operation, response.status, response.request_id
            ),
            Err(failure) => {
                if let FailureDetail::Backend(error) = &failure.detail {
                    debug!(
                        "Backend {} failure in '{}': {} (request: '{}')",
                        error.kind(),
                        operation,
                        error,
                        response.request_id
                    );
                }
                self.render_failure(failure, &mut response);
                warn!(
                    "Operation '{}' failed with {} (request: '{}')",
                    operation, response.status, response.request_id
                );
            }
        }

        Ok(response)
    }

    fn render_success(
        &self,
        route: &str,
        success: Success,
        context: &OperationContext,
        response: &mut RenderedResponse,
    ) -> LinkResult<()> {
        let keys = &self.config.payload_keys;

        match success {
            Success::Item { item, identifier } => {
                let links = self.links.for_item(route, &identifier)?;
                response.set_body(ResponseBody::Item(HalItem {
                    links,
                    item,
                    item_key: keys.item.clone(),
                }));
            }
            Success::Created { item, identifier } => {
                let links = self.links.for_item(route, &identifier)?;
                if let Some(location) = links
                    .get("self")
                    .and_then(|href| HeaderValue::from_str(href).ok())
                {
                    response.headers.insert(LOCATION, location);
                }
                response.status = StatusCode::CREATED;
                response.set_body(ResponseBody::Item(HalItem {
                    links,
                    item,
                    item_key: keys.item.clone(),
                }));
            }
            Success::Collection(mut collection) => {
                if let Collection::Paginated(paginator) = &mut collection {
                    paginator.set_page_size(self.config.page_size);
                    paginator.set_current_page(context.query.page());
                }
                let links = self.links.for_collection(route, &collection, &context.query)?;

                let items = match collection {
                    Collection::Plain(items) => items,
                    Collection::Paginated(paginator) => paginator.current_items(),
                };
                let items = items
                    .into_iter()
                    .map(|item| {
                        Ok(HalItem {
                            links: self.links.for_embedded_item(
                                route,
                                &item,
                                &self.config.identifier_name,
                            )?,
                            item,
                            item_key: keys.item.clone(),
                        })
                    })
                    .collect::<LinkResult<Vec<_>>>()?;

                response.set_body(ResponseBody::Collection(HalCollection {
                    links,
                    items,
                    collection_key: keys.collection.clone(),
                }));
            }
            Success::Deleted => {
                response.status = StatusCode::NO_CONTENT;
            }
        }

        Ok(())
    }

    fn render_failure(&self, failure: Failure, response: &mut RenderedResponse) {
        response.headers.remove(LOCATION);

        let detail = match &failure.detail {
            FailureDetail::Text(text) => ProblemDetail::Text(text.clone()),
            FailureDetail::Backend(error) => ProblemDetail::error(error),
            FailureDetail::Link(error) => ProblemDetail::error(error),
        };
        let problem = self
            .problems
            .render(&mut response.status, failure.status, detail, None, None);
        response.set_body(ResponseBody::Problem(problem));
    }
}

/// Backend operation for a method and target.
///
/// `HEAD` runs the same operation as `GET`; the transport drops the body.
pub(super) fn operation_for(method: &Method, target: Target) -> Option<Operation> {
    let operation = match (method.as_str(), target) {
        ("POST", Target::Collection) => Operation::Create,
        ("GET" | "HEAD", Target::Collection) => Operation::FetchAll,
        ("PUT", Target::Collection) => Operation::ReplaceList,
        ("GET" | "HEAD", Target::Item) => Operation::Fetch,
        ("PATCH", Target::Item) => Operation::Patch,
        ("PUT", Target::Item) => Operation::Update,
        ("DELETE", Target::Item) => Operation::Delete,
        _ => return None,
    };
    Some(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::EventBackend;

    #[test]
    fn test_operation_mapping() {
        assert_eq!(
            operation_for(&Method::POST, Target::Collection),
            Some(Operation::Create)
        );
        assert_eq!(
            operation_for(&Method::HEAD, Target::Item),
            Some(Operation::Fetch)
        );
        assert_eq!(
            operation_for(&Method::PUT, Target::Collection),
            Some(Operation::ReplaceList)
        );
        assert_eq!(operation_for(&Method::POST, Target::Item), None);
        assert_eq!(operation_for(&Method::DELETE, Target::Collection), None);
        assert_eq!(operation_for(&Method::PATCH, Target::Collection), None);
    }

    #[test]
    fn test_page_size_has_floor() {
        let mut controller = ResourceController::new(EventBackend::new());
        controller.set_page_size(0);
        assert_eq!(controller.config().page_size, 1);
    }

    #[test]
    fn test_with_config_rejects_bad_server_url() {
        let config = ResourceConfig::new()
            .with_route("/resource")
            .with_server_url("ftp://example.com");
        assert!(
            ResourceController::new(EventBackend::new())
                .with_config(config)
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_unmapped_permitted_verb_is_not_allowed() {
        let controller = ResourceController::new(EventBackend::new())
            .with_config(
                ResourceConfig::new()
                    .with_route("/resource")
                    .with_collection_http_methods(["GET", "DELETE"]),
            )
            .unwrap();

        let response = controller
            .dispatch(ResourceRequest::new(Method::DELETE))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.allow_header(), Some("DELETE, GET"));
    }

    #[tokio::test]
    async fn test_request_id_is_kept() {
        let controller = ResourceController::new(EventBackend::new()).with_route("/resource");
        let response = controller
            .dispatch(ResourceRequest::list().with_request_id("req-1"))
            .await
            .unwrap();
        assert_eq!(response.request_id, "req-1");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
