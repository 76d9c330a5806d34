//! Validation implementations for API request types
//!
//! These are the schema-level rules of each payload: text lengths, numeric
//! signs and the single-character sex code. Existence, check digits, limits
//! and uniqueness are left to the registration pipeline.

use workout_shared::{AthleteIn, AthleteUpdate, CategoryIn, GymIn};

use super::extractors::{FieldError, Validatable, ValidationBuilder};
use super::pipeline::ValidationLimits;
use super::sanitizers::{sanitize_text, sanitize_text_optional, trim, trim_optional};
use super::validators::{
    validate_length, validate_non_negative, validate_positive, validate_required,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants for validation rules
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum length for a category name
pub const MAX_CATEGORY_NAME_LENGTH: usize = 10;
/// Maximum length for a gym name
pub const MAX_GYM_NAME_LENGTH: usize = 20;
/// Maximum length for a gym address
pub const MAX_GYM_ADDRESS_LENGTH: usize = 60;
/// Maximum length for a gym owner name
pub const MAX_GYM_OWNER_LENGTH: usize = 30;
/// Maximum length for a raw identity number, formatting included
pub const MAX_RAW_CPF_LENGTH: usize = 32;
/// Sex is at most a single-character code; the pipeline checks its value
const MAX_SEX_CODE_LENGTH: usize = 1;

fn validate_name(value: &str, field: &str, max: usize) -> Result<(), String> {
    validate_required(value, field)?;
    validate_length(value, 1, max)
}

// ─────────────────────────────────────────────────────────────────────────────
// CategoryIn / GymIn
// ─────────────────────────────────────────────────────────────────────────────

impl Validatable for CategoryIn {
    fn sanitize(&mut self) {
        self.name = sanitize_text(&self.name);
    }

    fn validate(&self, _limits: &ValidationLimits) -> Result<(), Vec<FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder.check("name", || {
            validate_name(&self.name, "name", MAX_CATEGORY_NAME_LENGTH)
        });
        builder.build()
    }
}

impl Validatable for GymIn {
    fn sanitize(&mut self) {
        self.name = sanitize_text(&self.name);
        self.address = sanitize_text(&self.address);
        self.owner = sanitize_text(&self.owner);
    }

    fn validate(&self, _limits: &ValidationLimits) -> Result<(), Vec<FieldError>> {
        let mut builder = ValidationBuilder::new();
        builder
            .check("name", || validate_name(&self.name, "name", MAX_GYM_NAME_LENGTH))
            .check("address", || {
                validate_name(&self.address, "address", MAX_GYM_ADDRESS_LENGTH)
            })
            .check("owner", || {
                validate_name(&self.owner, "owner", MAX_GYM_OWNER_LENGTH)
            });
        builder.build()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AthleteIn / AthleteUpdate
// ─────────────────────────────────────────────────────────────────────────────

impl Validatable for AthleteIn {
    fn sanitize(&mut self) {
        self.name = sanitize_text(&self.name);
        self.cpf = trim(&self.cpf);
        self.sex = trim(&self.sex);
        self.category.name = sanitize_text(&self.category.name);
        self.gym.name = sanitize_text(&self.gym.name);
    }

    fn validate(&self, limits: &ValidationLimits) -> Result<(), Vec<FieldError>> {
        let mut builder = ValidationBuilder::new();

        builder
            .check("name", || {
                validate_name(&self.name, "name", limits.name_max_length)
            })
            .check("cpf", || {
                validate_required(&self.cpf, "cpf")?;
                validate_length(&self.cpf, 1, MAX_RAW_CPF_LENGTH)
            })
            .check("age", || validate_non_negative(self.age))
            .check("weight", || validate_positive(self.weight))
            .check("height", || validate_positive(self.height))
            .check("sex", || {
                validate_length(&self.sex, 0, MAX_SEX_CODE_LENGTH)
            })
            .check("category.name", || {
                validate_name(&self.category.name, "category.name", MAX_CATEGORY_NAME_LENGTH)
            })
            .check("gym.name", || {
                validate_name(&self.gym.name, "gym.name", MAX_GYM_NAME_LENGTH)
            });

        builder.build()
    }
}

impl Validatable for AthleteUpdate {
    fn sanitize(&mut self) {
        sanitize_text_optional(&mut self.name);
        trim_optional(&mut self.sex);
    }

    fn validate(&self, limits: &ValidationLimits) -> Result<(), Vec<FieldError>> {
        let mut builder = ValidationBuilder::new();

        builder
            .check_optional("name", self.name.as_deref(), |name| {
                validate_name(name, "name", limits.name_max_length)
            })
            .check_optional("age", self.age, validate_non_negative)
            .check_optional("weight", self.weight, validate_positive)
            .check_optional("height", self.height, validate_positive)
            .check_optional("sex", self.sex.as_deref(), |sex| {
                validate_length(sex, 0, MAX_SEX_CODE_LENGTH)
            });

        builder.build()
    }
}
