//! Input Validation Module
//!
//! Everything that decides whether athlete, gym and category input is
//! admissible.
//!
//! # Overview
//!
//! 1. **Validators** - domain-free predicates (length bounds, set membership)
//!    and the field validators built on them
//! 2. **Identity** - the national identity number (CPF) check-digit algorithm
//! 3. **Pipeline** - the ordered, short-circuiting athlete registration and
//!    update checks
//! 4. **Sanitizers** - cleanup of free-text fields
//! 5. **Extractors** - `ValidatedJson<T>`, which runs sanitizers and
//!    schema-level field checks before a handler is called
//!
//! # Usage
//!
//! ```ignore
//! use crate::validation::{validate_registration, ValidatedJson, ValidationOutcome};
//!
//! pub async fn create_athlete(
//!     State(state): State<AppState>,
//!     ValidatedJson(input): ValidatedJson<AthleteIn>,
//! ) -> ApiResult<impl IntoResponse> {
//!     match validate_registration(input.into(), &state.limits, state.repo.as_ref()).await? {
//!         ValidationOutcome::Accepted(normalized) => { /* persist */ }
//!         ValidationOutcome::Rejected(reason) => return Err(reason.into()),
//!     }
//! }
//! ```
//!
//! # Error Responses
//!
//! Schema failures return 422 with every failing field:
//!
//! ```json
//! {
//!   "error": "ValidationError",
//!   "message": "Validation failed for 2 fields",
//!   "errors": [
//!     {"field": "name", "message": "name is required"},
//!     {"field": "sex", "message": "must be at most 1 characters"}
//!   ],
//!   "code": 422,
//!   "timestamp": "2026-02-20T10:30:00Z",
//!   "correlation_id": "uuid-here"
//! }
//! ```
//!
//! Pipeline rejections return a single reason (400, or 303 for a duplicate
//! identity number).

pub mod extractors;
pub mod identity;
pub mod pipeline;
pub mod requests;
pub mod sanitizers;
pub mod validators;

// Re-export commonly used items
pub use extractors::{FieldError, Validatable, ValidatedJson, ValidationBuilder, ValidationError};
pub use identity::{check_digits, is_valid_identity_number, strip_non_digits, IdentityNumber};
pub use pipeline::{
    validate_registration, validate_update, AthleteRegistrationRequest, NormalizedRequest,
    RejectionReason, ValidationLimits, ValidationOutcome,
};
pub use validators::{
    is_length_acceptable, is_length_at_least, is_length_within_max, is_member_of, HasLength,
};
