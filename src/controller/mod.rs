//! Transport-agnostic resource controller.
//!
//! This module turns a parsed [`ResourceRequest`] into a [`RenderedResponse`]
//! by validating the method against the configured tables, invoking exactly
//! one [`ResourceBackend`](crate::resource::ResourceBackend) operation and
//! rendering its result as HAL or as an API problem document.
//!
//! # Key Types
//!
//! - [`ResourceController`] - Dispatcher bound to one route and backend
//! - [`ResourceConfig`] - Route, method tables, pagination and payload naming
//! - [`ResourceRequest`] - Method, identifier, body, query and headers
//! - [`RenderedResponse`] - Status, headers and the rendered document
//!
//! # Examples
//!
//! ```rust,no_run
//! use hal_resource::controller::{ResourceController, ResourceRequest};
//! use hal_resource::resource::{EventBackend, Operation, ResourceItem};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = EventBackend::new().with_listener(Operation::Fetch, |context| {
//!     Ok(Some(ResourceItem::new().with_field("id", context.identifier_or_empty()).into()))
//! });
//! let controller = ResourceController::new(backend).with_route("/users");
//!
//! let response = controller.dispatch(ResourceRequest::get("42")).await?;
//! assert_eq!(response.status.as_u16(), 200);
//! # Ok(())
//! # }
//! ```

mod config;
mod core;
mod handlers;
mod request;
mod response;

pub use config::{PayloadKeys, ResourceConfig};
pub use core::ResourceController;
pub use request::{QueryParams, ResourceRequest, Target};
pub use response::{
    HAL_CONTENT_TYPE, HalCollection, HalItem, Model, RenderedResponse, Representation,
    ResponseBody, ViewModel,
};
