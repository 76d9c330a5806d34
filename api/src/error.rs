use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::repository::{RepositoryError, ATHLETE_CPF_CONSTRAINT};
use crate::validation::RejectionReason;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    code: u16,
    timestamp: String,
    correlation_id: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error, message)
    }

    /// Resource already exists
    pub fn see_other(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::SEE_OTHER, error, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RejectionReason> for ApiError {
    fn from(reason: RejectionReason) -> Self {
        let status = match reason {
            RejectionReason::DuplicateIdentityNumber { .. } => StatusCode::SEE_OTHER,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, reason.code(), reason.to_string())
    }
}

/// Map a storage failure raised while serving `operation`.
///
/// Unique violations on the athlete identity number surface as the
/// duplicate registration rejection for `identity_number`. Everything else is
/// logged and reported without detail.
pub fn repository_error(
    operation: &str,
    err: RepositoryError,
    identity_number: Option<&str>,
) -> ApiError {
    if let (RepositoryError::UniqueViolation { constraint }, Some(digits)) = (&err, identity_number) {
        if constraint == ATHLETE_CPF_CONSTRAINT {
            tracing::warn!(operation = operation, "identity number registered concurrently");
            crate::metrics::record_rejection("DuplicateIdentityNumber");
            return RejectionReason::DuplicateIdentityNumber {
                identity_number: digits.to_string(),
            }
            .into();
        }
    }

    crate::metrics::record_repository_error(operation);
    tracing::error!(operation = operation, error = ?err, "repository operation failed");
    ApiError::internal("An unexpected database error occurred")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let correlation_id = Uuid::new_v4().to_string();
        let payload = ErrorResponse {
            error: self.error,
            message: self.message,
            code: self.status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: correlation_id.clone(),
        };

        let mut response = (self.status, Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response.headers_mut().insert(header::HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_status_codes() {
        let duplicate: ApiError = RejectionReason::DuplicateIdentityNumber {
            identity_number: "12345678909".to_string(),
        }
        .into();
        assert_eq!(duplicate.status(), StatusCode::SEE_OTHER);
        assert_eq!(duplicate.message(), "CPF 12345678909 already in use");

        let missing: ApiError = RejectionReason::GymNotFound {
            name: "Nowhere".to_string(),
        }
        .into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.message(), "Gym Nowhere not found.");
    }

    #[test]
    fn test_cpf_unique_violation_is_duplicate() {
        let err = RepositoryError::UniqueViolation {
            constraint: ATHLETE_CPF_CONSTRAINT.to_string(),
        };
        let api = repository_error("save athlete", err, Some("12345678909"));
        assert_eq!(api.status(), StatusCode::SEE_OTHER);
    }

    #[test]
    fn test_other_repository_errors_are_opaque() {
        let err = RepositoryError::Database("password authentication failed".to_string());
        let api = repository_error("list athletes", err, None);
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message().contains("password"));
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = ApiError::not_found("AthleteNotFound", "Athlete not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-correlation-id"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "AthleteNotFound");
        assert_eq!(json["code"], 404);
        assert!(json["correlation_id"].is_string());
    }
}
