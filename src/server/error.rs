//! Error-to-HTTP response conversion.
//!
//! Route handlers return `Result<T, AppError>`; clipping errors keep the
//! status their [`hlsclip_common::Error::http_status`] maps to, and a failed
//! dispatch lists every failed output.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::dispatch::AggregateDispatchError;

/// Wrapper so we can implement `IntoResponse` for external types.
#[derive(Debug)]
pub enum AppError {
    Clip(hlsclip_common::Error),
    Dispatch(AggregateDispatchError),
}

impl From<hlsclip_common::Error> for AppError {
    fn from(e: hlsclip_common::Error) -> Self {
        Self::Clip(e)
    }
}

impl From<AggregateDispatchError> for AppError {
    fn from(e: AggregateDispatchError) -> Self {
        Self::Dispatch(e)
    }
}

fn code(error: &hlsclip_common::Error) -> &'static str {
    use hlsclip_common::Error;

    match error {
        Error::MalformedTemplate(_) => "malformed_template",
        Error::InvalidRange(_) => "invalid_range",
        Error::MissingVariantOptions(_) => "missing_variant_options",
        Error::WorkerExecution(_) => "worker_error",
        Error::Remote(_) => "remote_error",
        Error::InvalidInput(_) => "invalid_input",
        Error::Io(_) => "io_error",
        Error::Internal(_) => "internal_error",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Clip(inner) => {
                let status = StatusCode::from_u16(inner.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (
                    status,
                    json!({
                        "error": inner.to_string(),
                        "code": code(inner),
                    }),
                )
            }
            AppError::Dispatch(inner) => {
                let failures: Vec<_> = inner
                    .failures
                    .iter()
                    .map(|failure| {
                        json!({
                            "outputUri": failure.output_uri,
                            "error": failure.error.to_string(),
                        })
                    })
                    .collect();
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": inner.to_string(),
                        "code": "dispatch_failed",
                        "failures": failures,
                        "report": inner.report,
                    }),
                )
            }
        };

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %body["error"],
                "Server error in API handler"
            );
        }

        (status, axum::Json(body)).into_response()
    }
}
