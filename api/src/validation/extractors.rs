//! Custom Axum extractors for validated input
//!
//! `ValidatedJson<T>` is a drop-in replacement for `Json<T>` that sanitizes
//! and schema-checks a payload before the handler sees it. Schema checks
//! collect every failing field; the athlete registration rules proper run
//! later, in the short-circuiting pipeline.

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, Request},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::pipeline::ValidationLimits;

/// A field-level validation error
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation error response body
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub errors: Vec<FieldError>,
    pub code: u16,
    pub timestamp: String,
    pub correlation_id: String,
}

impl ValidationErrorResponse {
    pub fn new(errors: Vec<FieldError>) -> Self {
        let error_summary = if errors.len() == 1 {
            format!("Validation failed for field '{}'", errors[0].field)
        } else {
            format!("Validation failed for {} fields", errors.len())
        };

        Self {
            error: "ValidationError".to_string(),
            message: error_summary,
            errors,
            code: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Validation error that converts to an HTTP response
#[derive(Debug)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

impl axum::response::IntoResponse for ValidationError {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!(fields = self.errors.len(), "request body failed schema validation");
        let response = ValidationErrorResponse::new(self.errors);
        (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response()
    }
}

/// Trait for request bodies that can be sanitized and schema-checked
pub trait Validatable: Sized {
    /// Sanitize the data in-place (trim whitespace, drop control characters)
    fn sanitize(&mut self);

    /// Validate the data and return any field errors
    fn validate(&self, limits: &ValidationLimits) -> Result<(), Vec<FieldError>>;
}

/// JSON extractor that sanitizes and validates its payload.
///
/// 1. Parse JSON from the request body
/// 2. Sanitize free-text fields
/// 3. Validate fields against the schema rules and the configured limits
/// 4. Return a 422 listing every failing field
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validatable + Send,
    S: Send + Sync,
    ValidationLimits: FromRef<S>,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| {
                let message = match err {
                    axum::extract::rejection::JsonRejection::JsonDataError(e) => {
                        format!("Invalid JSON data: {}", e.body_text())
                    }
                    axum::extract::rejection::JsonRejection::JsonSyntaxError(e) => {
                        format!("JSON syntax error: {}", e.body_text())
                    }
                    axum::extract::rejection::JsonRejection::MissingJsonContentType(_) => {
                        "Content-Type must be application/json".to_string()
                    }
                    axum::extract::rejection::JsonRejection::BytesRejection(_) => {
                        "Failed to read request body".to_string()
                    }
                    _ => "Invalid JSON payload".to_string(),
                };
                ValidationError::single("body", message)
            })?;

        data.sanitize();

        let limits = ValidationLimits::from_ref(state);
        data.validate(&limits).map_err(ValidationError::new)?;

        Ok(ValidatedJson(data))
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Builder for accumulating validation errors
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Add an error if the result is Err
    pub fn check<F>(&mut self, field: &str, validator: F) -> &mut Self
    where
        F: FnOnce() -> Result<(), String>,
    {
        if let Err(message) = validator() {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Run `check` only when the optional value is present
    pub fn check_optional<V, F>(&mut self, field: &str, value: Option<V>, validator: F) -> &mut Self
    where
        F: FnOnce(V) -> Result<(), String>,
    {
        if let Some(value) = value {
            if let Err(message) = validator(value) {
                self.errors.push(FieldError::new(field, message));
            }
        }
        self
    }

    /// Finish building and return Result
    pub fn build(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
