//! Mapping of console and provider failures onto HTTP responses.
//!
//! Every error body is JSON with an `error` string; provider JSON error bodies
//! are relayed verbatim with the provider's status.

use crate::idp::{IdpError, UpstreamBody};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required token cookie is missing.
    #[error("{0}")]
    MissingToken(&'static str),
    /// The end-user grant was rejected; carries the provider's description.
    #[error("{0}")]
    Unauthorized(String),
    /// The service-account grant was rejected; carries the provider's payload.
    #[error("grant rejected by identity provider")]
    GrantRejected(UpstreamBody),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{context}: {source}")]
    Provider {
        context: &'static str,
        #[source]
        source: IdpError,
    },
}

impl ApiError {
    /// Adapter for `map_err` that tags a provider error with what was attempted.
    pub fn provider(context: &'static str) -> impl FnOnce(IdpError) -> Self {
        move |source| Self::Provider { context, source }
    }
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn detailed(status: StatusCode, message: &str, details: &str) -> Response {
    (
        status,
        Json(json!({ "error": message, "details": details })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingToken(msg) => message(StatusCode::UNAUTHORIZED, msg),
            Self::Unauthorized(msg) => message(StatusCode::UNAUTHORIZED, &msg),
            Self::GrantRejected(UpstreamBody::Json(value)) => {
                (StatusCode::UNAUTHORIZED, Json(value)).into_response()
            }
            Self::GrantRejected(UpstreamBody::Text(text)) => {
                detailed(StatusCode::UNAUTHORIZED, "Invalid credentials", &text)
            }
            Self::NotFound(msg) => message(StatusCode::NOT_FOUND, msg),
            Self::Provider { context, source } => match source {
                IdpError::ClientNotFound(_) => message(StatusCode::BAD_REQUEST, "Client not found"),
                IdpError::Upstream {
                    status,
                    body: UpstreamBody::Json(value),
                } => (status, Json::<Value>(value)).into_response(),
                IdpError::Upstream {
                    status,
                    body: UpstreamBody::Text(text),
                } => detailed(status, context, &text),
                IdpError::Transport(err) => {
                    error!("{context}: {err}");
                    detailed(StatusCode::INTERNAL_SERVER_ERROR, context, &err.to_string())
                }
                IdpError::Decode(err) => {
                    error!("{context}: {err}");
                    detailed(StatusCode::INTERNAL_SERVER_ERROR, context, &err.to_string())
                }
            },
        }
    }
}
