//! Operation invocation and outcome policy.
//!
//! Calls the backend hook for one operation and classifies what came back.
//! Besides errors raised by the backend, some results are failures by
//! shape: nothing found, a refused delete, or a created item without an
//! identifier.

use crate::error::{BackendError, LinkError};
use crate::resource::{Collection, Operation, OperationContext, ResourceBackend, ResourceItem};
use http::StatusCode;

/// Successful result ready for link generation.
#[derive(Debug)]
pub(super) enum Success {
    /// Fetched, patched or updated item, linked under the request identifier
    Item { item: ResourceItem, identifier: String },
    /// Newly created item, linked under its own identifier
    Created { item: ResourceItem, identifier: String },
    Collection(Collection),
    Deleted,
}

/// What a failure's detail is built from.
#[derive(Debug)]
pub(super) enum FailureDetail {
    Text(String),
    Backend(BackendError),
    Link(LinkError),
}

/// Failed result ready for problem rendering.
#[derive(Debug)]
pub(super) struct Failure {
    pub status: u16,
    pub detail: FailureDetail,
}

impl Failure {
    fn text(status: StatusCode, detail: &str) -> Self {
        Self {
            status: status.as_u16(),
            detail: FailureDetail::Text(detail.to_string()),
        }
    }
}

impl From<BackendError> for Failure {
    fn from(error: BackendError) -> Self {
        Self {
            status: error.status(),
            detail: FailureDetail::Backend(error),
        }
    }
}

impl From<LinkError> for Failure {
    fn from(error: LinkError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: FailureDetail::Link(error),
        }
    }
}

pub(super) type Outcome = Result<Success, Failure>;

/// Invoke the backend hook for `context.operation` exactly once.
pub(super) async fn invoke<P: ResourceBackend + Sync>(
    backend: &P,
    context: &OperationContext,
    identifier_name: &str,
) -> Outcome {
    let request_identifier = || context.identifier_or_empty().to_string();

    match context.operation {
        Operation::Create => {
            let item = backend.create(context).await?;
            match item.identifier(identifier_name) {
                Some(identifier) => Ok(Success::Created { item, identifier }),
                None => Err(Failure::text(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "No item identifier present following item creation.",
                )),
            }
        }
        Operation::Fetch => match backend.fetch(context).await? {
            Some(item) => Ok(Success::Item {
                item,
                identifier: request_identifier(),
            }),
            None => Err(Failure::text(StatusCode::NOT_FOUND, "Item not found.")),
        },
        Operation::FetchAll => match backend.fetch_all(context).await? {
            Some(collection) if !collection.is_empty_list() => Ok(Success::Collection(collection)),
            _ => Err(Failure::text(StatusCode::NOT_FOUND, "Collection not found.")),
        },
        Operation::Patch => Ok(Success::Item {
            item: backend.patch(context).await?,
            identifier: request_identifier(),
        }),
        Operation::Update => Ok(Success::Item {
            item: backend.update(context).await?,
            identifier: request_identifier(),
        }),
        Operation::Delete => {
            if backend.delete(context).await? {
                Ok(Success::Deleted)
            } else {
                Err(Failure::text(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Unable to delete item.",
                ))
            }
        }
        Operation::ReplaceList => Ok(Success::Collection(backend.replace_list(context).await?)),
    }
}
