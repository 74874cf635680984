use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use devicehub_domain::DomainError;

/// Wire shape for error responses: `{"error": "..."}`, plus `details` on 500s
/// outside production
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// HTTP-level errors produced by handlers
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal { details: Option<String> },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::BadRequest(error)
            | ApiError::NotFound(error)
            | ApiError::Conflict(error) => ErrorBody {
                error,
                details: None,
            },
            ApiError::Internal { details } => ErrorBody {
                error: "Internal Server Error".to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Convert a domain error to an HTTP error response
///
/// Unexpected failures are logged here, exactly once, at the transport
/// boundary; `expose_details` carries the failure message into the body for
/// non-production environments.
pub fn domain_error_to_api(error: DomainError, expose_details: bool) -> ApiError {
    match error {
        DomainError::ValidationError(msg) => ApiError::BadRequest(msg),

        DomainError::DeviceNotFound(msg) => ApiError::NotFound(msg),

        DomainError::DeviceAlreadyExists(_) => {
            ApiError::Conflict("Device already exists".to_string())
        }

        DomainError::RepositoryError(err) => {
            error!("unhandled error: {:#}", err);
            ApiError::Internal {
                details: expose_details.then(|| err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal { details: None }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let api = domain_error_to_api(
            DomainError::ValidationError("name and brand are required".to_string()),
            true,
        );
        assert!(matches!(
            api,
            ApiError::BadRequest(msg) if msg == "name and brand are required"
        ));
    }

    #[test]
    fn test_conflict_message_is_fixed() {
        let api = domain_error_to_api(
            DomainError::DeviceAlreadyExists("iPhone 15".to_string()),
            true,
        );
        assert!(matches!(
            api,
            ApiError::Conflict(msg) if msg == "Device already exists"
        ));
    }

    #[test]
    fn test_repository_error_details_gating() {
        let api = domain_error_to_api(
            DomainError::RepositoryError(anyhow::anyhow!("connection refused")),
            false,
        );
        assert!(matches!(api, ApiError::Internal { details: None }));

        let api = domain_error_to_api(
            DomainError::RepositoryError(anyhow::anyhow!("connection refused")),
            true,
        );
        assert!(matches!(
            api,
            ApiError::Internal { details: Some(msg) } if msg.contains("connection refused")
        ));
    }
}
