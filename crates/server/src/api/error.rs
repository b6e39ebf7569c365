//! Structured API errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use playaxis_core::CatalogError;

/// Failure body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: String,
}

/// An error that knows its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_query", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn not_configured(what: &str) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "not_configured",
            format!("{} is not configured", what),
        )
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        let status = match &e {
            CatalogError::InvalidQuery(_)
            | CatalogError::InvalidPage(_)
            | CatalogError::UnsupportedSortKey { .. } => StatusCode::BAD_REQUEST,
            CatalogError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CatalogError::UpstreamFailure { kind, .. } if kind == "not_configured" => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CatalogError::UpstreamFailure { .. } => StatusCode::BAD_GATEWAY,
            CatalogError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::MalformedRecord(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed ({}): {}", e.kind(), e);
        }
        Self::new(status, e.kind(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                error: self.message,
                kind: self.kind.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CatalogError::InvalidQuery("x".into()), StatusCode::BAD_REQUEST),
            (CatalogError::InvalidPage(0), StatusCode::BAD_REQUEST),
            (
                CatalogError::UpstreamTimeout(Some(Duration::from_secs(10))),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                CatalogError::UpstreamFailure {
                    kind: "server".into(),
                    message: "boom".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (CatalogError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
            (
                CatalogError::MalformedRecord("no name".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            let kind = error.kind();
            let api: ApiError = error.into();
            assert_eq!(api.status, status, "{}", kind);
            assert_eq!(api.kind, kind);
        }
    }
}
