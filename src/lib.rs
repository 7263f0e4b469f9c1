//! Generic REST resource endpoint for Rust.
//!
//! Maps HTTP verbs on a collection route and its item routes onto a fixed
//! set of backend operations, renders results as HAL documents with
//! pagination links and reports failures as API problem documents.
//!
//! # Core Components
//!
//! - [`ResourceController`] - Dispatches one request to one backend operation
//! - [`ResourceBackend`] - Trait implemented by business logic
//! - [`EventBackend`] - Listener-chain backend for closure-based handlers
//! - [`LinkBuilder`] - HAL `self`/`up` and pagination links
//! - [`ProblemRenderer`] - API problem documents for failures
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hal_resource::{EventBackend, ResourceController, ResourceRequest};
//! use hal_resource::resource::{Operation, ResourceItem};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = EventBackend::new().with_listener(Operation::FetchAll, |_| {
//!     Ok(Some(vec![ResourceItem::new().with_field("id", "foo")].into()))
//! });
//! let controller = ResourceController::new(backend).with_route("/resource");
//!
//! let response = controller.dispatch(ResourceRequest::list()).await?;
//! println!("{}", response.to_json().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod error;
pub mod links;
pub mod problem;
pub mod resource;

// Re-export commonly used types for convenience
pub use controller::{
    QueryParams, RenderedResponse, ResourceConfig, ResourceController, ResourceRequest,
};
pub use error::{BackendError, BackendResult, ConfigError, ConfigResult, LinkError};
pub use links::{LinkBuilder, Links, ServerUrl};
pub use problem::{ProblemDocument, ProblemRenderer};
pub use resource::{
    Collection, EventBackend, Operation, OperationContext, Paginator, ResourceBackend,
    ResourceItem,
};
