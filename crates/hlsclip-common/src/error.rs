//! Common error types used throughout hlsclip.
//!
//! Every failure the clipping core can report funnels into [`Error`], which
//! carries enough context for the HTTP layer to derive a status code via
//! [`Error::http_status`].

/// Common error type for hlsclip.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reference playlist could not be turned into a segment template.
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// A requested time range is empty, reversed, or not finite.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A quality variant has no encoder options configured.
    #[error("No encoder options configured for variant '{0}'")]
    MissingVariantOptions(String),

    /// The remote worker reported an execution error.
    #[error("Worker execution error: {0}")]
    WorkerExecution(String),

    /// A call to a remote collaborator failed before it produced a result.
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new MalformedTemplate error.
    pub fn malformed_template<S: Into<String>>(msg: S) -> Self {
        Self::MalformedTemplate(msg.into())
    }

    /// Create a new InvalidRange error.
    pub fn invalid_range<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Create a new MissingVariantOptions error.
    pub fn missing_variant_options<S: Into<String>>(variant: S) -> Self {
        Self::MissingVariantOptions(variant.into())
    }

    /// Create a new WorkerExecution error.
    pub fn worker_execution<S: Into<String>>(msg: S) -> Self {
        Self::WorkerExecution(msg.into())
    }

    /// Create a new Remote error.
    pub fn remote<S: Into<String>>(msg: S) -> Self {
        Self::Remote(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidRange(_) | Error::InvalidInput(_) => 400,
            Error::MalformedTemplate(_) => 422,
            Error::WorkerExecution(_) | Error::Remote(_) => 502,
            Error::MissingVariantOptions(_) | Error::Io(_) | Error::Internal(_) => 500,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
