//! Error types for resource dispatch.
//!
//! Three concerns are kept apart: configuration mistakes that make a
//! controller unusable, failures signalled by a resource backend, and
//! failures while assembling hypermedia links. Only the first one ever
//! escapes [`ResourceController::dispatch`](crate::ResourceController::dispatch);
//! the others are rendered as problem documents.

use http::StatusCode;

/// Boxed error used for chained causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by a controller whose setup is invalid.
///
/// These are programming errors rather than request conditions and are
/// returned before any backend is consulted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No backend was bound to the controller
    #[error("No resource backend is composed; a ResourceBackend is required to dispatch")]
    MissingBackend,

    /// No route was configured for link generation
    #[error("No route is configured; a collection route is required to dispatch")]
    MissingRoute,

    /// A configuration value failed validation
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Failures signalled by a resource backend.
///
/// Each operation family has its own variant so callers can tell a failed
/// creation from a failed update in logs. All of them render as
/// `500 Internal Server Error` unless a status hint was attached with
/// [`BackendError::with_status`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Creating an item failed
    #[error("{message}")]
    Creation {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Partially updating an item failed
    #[error("{message}")]
    Patch {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Replacing an item or a list failed
    #[error("{message}")]
    Update {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Any other backend failure
    #[error("{message}")]
    Other {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },
}

/// Failures while assembling hrefs.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The route could not be turned into a path
    #[error("Unable to assemble route '{route}': {message}")]
    Route { route: String, message: String },

    /// The configured server URL is unusable
    #[error("Invalid server URL '{url}'")]
    InvalidServerUrl { url: String },
}

impl ConfigError {
    /// Create an invalid configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl BackendError {
    /// Create a creation failure
    pub fn creation(message: impl Into<String>) -> Self {
        Self::Creation {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Create a patch failure
    pub fn patch(message: impl Into<String>) -> Self {
        Self::Patch {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Create an update failure
    pub fn update(message: impl Into<String>) -> Self {
        Self::Update {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Create a generic failure
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Wrap an arbitrary error as a generic failure, keeping it as the source.
    pub fn wrap<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other {
            message: error.to_string(),
            status: None,
            source: Some(Box::new(error)),
        }
    }

    /// Attach a status hint used instead of 500 when rendering.
    pub fn with_status(mut self, code: u16) -> Self {
        match &mut self {
            Self::Creation { status, .. }
            | Self::Patch { status, .. }
            | Self::Update { status, .. }
            | Self::Other { status, .. } => *status = Some(code),
        }
        self
    }

    /// Attach the error that caused this failure.
    pub fn with_source<E>(mut self, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match &mut self {
            Self::Creation { source, .. }
            | Self::Patch { source, .. }
            | Self::Update { source, .. }
            | Self::Other { source, .. } => *source = Some(Box::new(error)),
        }
        self
    }

    /// Status used when this failure is rendered.
    ///
    /// Hints outside the 4xx/5xx range are ignored.
    pub fn status(&self) -> u16 {
        let hint = match self {
            Self::Creation { status, .. }
            | Self::Patch { status, .. }
            | Self::Update { status, .. }
            | Self::Other { status, .. } => *status,
        };
        hint.filter(|code| (400..600).contains(code))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
    }

    /// Short label of the failure category, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Creation { .. } => "creation",
            Self::Patch { .. } => "patch",
            Self::Update { .. } => "update",
            Self::Other { .. } => "other",
        }
    }
}

// Result type aliases for convenience
pub type BackendResult<T> = Result<T, BackendError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type LinkResult<T> = Result<T, LinkError>;
