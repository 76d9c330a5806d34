//! Athlete registration and update validation
//!
//! Registration runs a fixed sequence of checks and stops at the first one
//! that fails:
//!
//! 1. category exists
//! 2. gym exists
//! 3. identity number check digits
//! 4. sex code (case-insensitive `m` / `f`)
//! 5. weight at most `max_weight`
//! 6. height at most `max_height`
//! 7. identity number not already registered
//!
//! The order decides which single reason a client sees when several fields
//! are wrong. Nothing is written here; the caller persists an accepted
//! request.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use workout_shared::{AthleteIn, AthletePatch, AthleteUpdate, Category, Gym, NewAthlete, Sex};

use super::identity::IdentityNumber;
use super::validators::is_member_of;
use crate::repository::{RegistrationLookup, RepositoryError};

/// Accepted sex codes after lowercasing
pub const SEX_OPTIONS: [&str; 2] = ["m", "f"];

pub const DEFAULT_MAX_WEIGHT: f64 = 300.0;
pub const DEFAULT_MAX_HEIGHT: f64 = 2.5;
pub const DEFAULT_NAME_MAX_LENGTH: usize = 50;

/// Upper bounds applied to athlete data, fixed for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationLimits {
    /// Kilograms
    pub max_weight: f64,
    /// Meters
    pub max_height: f64,
    /// Characters
    pub name_max_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_weight: DEFAULT_MAX_WEIGHT,
            max_height: DEFAULT_MAX_HEIGHT,
            name_max_length: DEFAULT_NAME_MAX_LENGTH,
        }
    }
}

/// Candidate data for a new athlete, as decoded from the wire
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteRegistrationRequest {
    pub name: String,
    /// May contain formatting characters
    pub identity_number: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub sex: String,
    pub category_name: String,
    pub gym_name: String,
}

impl From<AthleteIn> for AthleteRegistrationRequest {
    fn from(input: AthleteIn) -> Self {
        Self {
            name: input.name,
            identity_number: input.cpf,
            age: input.age,
            weight: input.weight,
            height: input.height,
            sex: input.sex,
            category_name: input.category.name,
            gym_name: input.gym.name,
        }
    }
}

/// A registration request that passed every check.
///
/// Carries the category and gym records resolved during validation so the
/// caller can persist without looking them up again.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub name: String,
    pub identity_number: IdentityNumber,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub sex: Sex,
    pub category: Category,
    pub gym: Gym,
}

impl NormalizedRequest {
    pub fn into_new_athlete(self, id: Uuid, created_at: DateTime<Utc>) -> NewAthlete {
        NewAthlete {
            id,
            name: self.name,
            cpf: self.identity_number.into_inner(),
            age: self.age,
            weight: self.weight,
            height: self.height,
            sex: self.sex,
            created_at,
            category_id: self.category.id,
            gym_id: self.gym.id,
        }
    }
}

/// Why a request was refused. Messages are client-facing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectionReason {
    #[error("Category {name} not found.")]
    CategoryNotFound { name: String },
    #[error("Gym {name} not found.")]
    GymNotFound { name: String },
    #[error("CPF {value} is not valid")]
    InvalidIdentityNumber { value: String },
    #[error("Sex {value} is not valid")]
    InvalidSex { value: String },
    #[error("Weight {weight} is too high. Max weight is {max}")]
    WeightTooHigh { weight: f64, max: f64 },
    #[error("Height {height} is probably wrong. Max height is {max}. Insert height in meters")]
    HeightOutOfRange { height: f64, max: f64 },
    #[error("CPF {identity_number} already in use")]
    DuplicateIdentityNumber { identity_number: String },
}

impl RejectionReason {
    /// Stable machine-readable tag
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::CategoryNotFound { .. } => "CategoryNotFound",
            RejectionReason::GymNotFound { .. } => "GymNotFound",
            RejectionReason::InvalidIdentityNumber { .. } => "InvalidIdentityNumber",
            RejectionReason::InvalidSex { .. } => "InvalidSex",
            RejectionReason::WeightTooHigh { .. } => "WeightTooHigh",
            RejectionReason::HeightOutOfRange { .. } => "HeightOutOfRange",
            RejectionReason::DuplicateIdentityNumber { .. } => "DuplicateIdentityNumber",
        }
    }
}

/// Result of validating one request. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T = NormalizedRequest> {
    Accepted(T),
    Rejected(RejectionReason),
}

impl<T> ValidationOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn into_result(self) -> Result<T, RejectionReason> {
        match self {
            ValidationOutcome::Accepted(value) => Ok(value),
            ValidationOutcome::Rejected(reason) => Err(reason),
        }
    }
}

fn rejected<T>(reason: RejectionReason) -> ValidationOutcome<T> {
    debug!(reason = reason.code(), "validation rejected: {}", reason);
    ValidationOutcome::Rejected(reason)
}

/// Lowercase a sex code and map it onto [`Sex`]
fn normalize_sex(raw: &str) -> Result<Sex, RejectionReason> {
    let code = raw.to_lowercase();
    let invalid = || RejectionReason::InvalidSex {
        value: raw.to_string(),
    };
    if !is_member_of(&code.as_str(), &SEX_OPTIONS) {
        return Err(invalid());
    }
    Sex::from_code(&code).ok_or_else(invalid)
}

fn check_weight(weight: f64, limits: &ValidationLimits) -> Result<(), RejectionReason> {
    if weight > limits.max_weight {
        return Err(RejectionReason::WeightTooHigh {
            weight,
            max: limits.max_weight,
        });
    }
    Ok(())
}

fn check_height(height: f64, limits: &ValidationLimits) -> Result<(), RejectionReason> {
    if height > limits.max_height {
        return Err(RejectionReason::HeightOutOfRange {
            height,
            max: limits.max_height,
        });
    }
    Ok(())
}

/// Validate a new athlete registration.
///
/// Domain rejections come back as `Ok(ValidationOutcome::Rejected(_))`; a
/// failing lookup is returned as `Err` and never retried.
pub async fn validate_registration<L>(
    request: AthleteRegistrationRequest,
    limits: &ValidationLimits,
    lookup: &L,
) -> Result<ValidationOutcome, RepositoryError>
where
    L: RegistrationLookup + ?Sized,
{
    let Some(category) = lookup.find_category_by_name(&request.category_name).await? else {
        return Ok(rejected(RejectionReason::CategoryNotFound {
            name: request.category_name.clone(),
        }));
    };

    let Some(gym) = lookup.find_gym_by_name(&request.gym_name).await? else {
        return Ok(rejected(RejectionReason::GymNotFound {
            name: request.gym_name.clone(),
        }));
    };

    let Some(identity_number) = IdentityNumber::parse(&request.identity_number) else {
        return Ok(rejected(RejectionReason::InvalidIdentityNumber {
            value: request.identity_number.clone(),
        }));
    };

    let sex = match normalize_sex(&request.sex) {
        Ok(sex) => sex,
        Err(reason) => return Ok(rejected(reason)),
    };

    if let Err(reason) = check_weight(request.weight, limits) {
        return Ok(rejected(reason));
    }

    if let Err(reason) = check_height(request.height, limits) {
        return Ok(rejected(reason));
    }

    if lookup
        .find_athlete_by_identity_number(identity_number.as_str())
        .await?
        .is_some()
    {
        return Ok(rejected(RejectionReason::DuplicateIdentityNumber {
            identity_number: identity_number.into_inner(),
        }));
    }

    Ok(ValidationOutcome::Accepted(NormalizedRequest {
        name: request.name,
        identity_number,
        age: request.age,
        weight: request.weight,
        height: request.height,
        sex,
        category,
        gym,
    }))
}

/// Validate a partial athlete update.
///
/// Only present fields are checked (sex, then weight, then height). The
/// identity number cannot be changed, so neither its check digits nor its
/// uniqueness are revisited.
pub fn validate_update(
    update: &AthleteUpdate,
    limits: &ValidationLimits,
) -> ValidationOutcome<AthletePatch> {
    let sex = match update.sex.as_deref().map(normalize_sex).transpose() {
        Ok(sex) => sex,
        Err(reason) => return rejected(reason),
    };

    if let Some(weight) = update.weight {
        if let Err(reason) = check_weight(weight, limits) {
            return rejected(reason);
        }
    }

    if let Some(height) = update.height {
        if let Err(reason) = check_height(height, limits) {
            return rejected(reason);
        }
    }

    ValidationOutcome::Accepted(AthletePatch {
        name: update.name.clone(),
        age: update.age,
        weight: update.weight,
        height: update.height,
        sex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryRepository;
    use crate::repository::Repository;
    use async_trait::async_trait;
    use workout_shared::AthleteOut;

    const VALID_CPF: &str = "123.456.789-09";

    async fn seeded() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        repo.create_category(&Category {
            id: Uuid::new_v4(),
            name: "Scale".to_string(),
        })
        .await
        .unwrap();
        repo.create_gym(&Gym {
            id: Uuid::new_v4(),
            name: "Casa de Pedra".to_string(),
            address: "Rua Venancio Aires, 600".to_string(),
            owner: "Alexandre Pedra".to_string(),
        })
        .await
        .unwrap();
        repo
    }

    fn request() -> AthleteRegistrationRequest {
        AthleteRegistrationRequest {
            name: "João".to_string(),
            identity_number: VALID_CPF.to_string(),
            age: 25,
            weight: 75.5,
            height: 1.87,
            sex: "F".to_string(),
            category_name: "Scale".to_string(),
            gym_name: "Casa de Pedra".to_string(),
        }
    }

    async fn run(repo: &InMemoryRepository, req: AthleteRegistrationRequest) -> ValidationOutcome {
        validate_registration(req, &ValidationLimits::default(), repo)
            .await
            .unwrap()
    }

    fn reason(outcome: ValidationOutcome) -> RejectionReason {
        match outcome {
            ValidationOutcome::Rejected(reason) => reason,
            ValidationOutcome::Accepted(req) => panic!("expected rejection, got {:?}", req),
        }
    }

    #[tokio::test]
    async fn test_accepts_and_normalizes() {
        let repo = seeded().await;
        let outcome = run(&repo, request()).await;

        let ValidationOutcome::Accepted(normalized) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(normalized.sex, Sex::Female);
        assert_eq!(normalized.sex.as_code(), "f");
        assert_eq!(normalized.identity_number.as_str(), "12345678909");
        assert_eq!(normalized.weight, 75.5);
        assert_eq!(normalized.height, 1.87);
        assert_eq!(normalized.name, "João");
        assert_eq!(normalized.age, 25);
        assert_eq!(normalized.category.name, "Scale");
        assert_eq!(normalized.gym.name, "Casa de Pedra");
    }

    #[tokio::test]
    async fn test_category_checked_before_gym() {
        let repo = seeded().await;
        let mut req = request();
        req.category_name = "Missing".to_string();
        req.gym_name = "Missing".to_string();

        assert!(matches!(
            reason(run(&repo, req).await),
            RejectionReason::CategoryNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_single_reason_when_everything_is_wrong() {
        let repo = seeded().await;
        let req = AthleteRegistrationRequest {
            name: "x".to_string(),
            identity_number: "000".to_string(),
            age: 1,
            weight: 999.0,
            height: 9.0,
            sex: "x".to_string(),
            category_name: "Scale".to_string(),
            gym_name: "Nowhere".to_string(),
        };

        assert_eq!(
            reason(run(&repo, req).await),
            RejectionReason::GymNotFound {
                name: "Nowhere".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_identity_number_checked_before_sex() {
        let repo = seeded().await;
        let mut req = request();
        req.identity_number = "123.456.789-00".to_string();
        req.sex = "x".to_string();

        assert!(matches!(
            reason(run(&repo, req).await),
            RejectionReason::InvalidIdentityNumber { .. }
        ));
    }

    #[tokio::test]
    async fn test_sex_checked_before_weight() {
        let repo = seeded().await;
        let mut req = request();
        req.sex = "X".to_string();
        req.weight = 1_000.0;

        assert_eq!(
            reason(run(&repo, req).await),
            RejectionReason::InvalidSex {
                value: "X".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_weight_checked_before_height() {
        let repo = seeded().await;
        let mut req = request();
        req.weight = 300.5;
        req.height = 3.0;

        assert!(matches!(
            reason(run(&repo, req).await),
            RejectionReason::WeightTooHigh { .. }
        ));
    }

    #[tokio::test]
    async fn test_height_out_of_range() {
        let repo = seeded().await;
        let mut req = request();
        req.height = 187.0;

        assert!(matches!(
            reason(run(&repo, req).await),
            RejectionReason::HeightOutOfRange { .. }
        ));
    }

    #[tokio::test]
    async fn test_limits_are_inclusive() {
        let repo = seeded().await;
        let limits = ValidationLimits {
            max_weight: 75.5,
            max_height: 1.87,
            name_max_length: 50,
        };

        let outcome = validate_registration(request(), &limits, &repo).await.unwrap();
        assert!(outcome.is_accepted());

        let mut heavier = request();
        heavier.weight = 75.51;
        let outcome = validate_registration(heavier, &limits, &repo).await.unwrap();
        assert!(matches!(
            reason(outcome),
            RejectionReason::WeightTooHigh { .. }
        ));

        let mut taller = request();
        taller.height = 1.88;
        let outcome = validate_registration(taller, &limits, &repo).await.unwrap();
        assert!(matches!(
            reason(outcome),
            RejectionReason::HeightOutOfRange { .. }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_after_persist() {
        let repo = seeded().await;

        let first = run(&repo, request()).await.into_result().unwrap();
        repo.save_athlete(&first.into_new_athlete(Uuid::new_v4(), Utc::now()))
            .await
            .unwrap();

        let mut second = request();
        second.identity_number = "12345678909".to_string();
        second.sex = "m".to_string();
        assert_eq!(
            reason(run(&repo, second).await),
            RejectionReason::DuplicateIdentityNumber {
                identity_number: "12345678909".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_checked_last() {
        let repo = seeded().await;
        let first = run(&repo, request()).await.into_result().unwrap();
        repo.save_athlete(&first.into_new_athlete(Uuid::new_v4(), Utc::now()))
            .await
            .unwrap();

        let mut req = request();
        req.weight = 500.0;
        assert!(matches!(
            reason(run(&repo, req).await),
            RejectionReason::WeightTooHigh { .. }
        ));
    }

    struct FailingLookup;

    #[async_trait]
    impl RegistrationLookup for FailingLookup {
        async fn find_category_by_name(
            &self,
            _name: &str,
        ) -> Result<Option<Category>, RepositoryError> {
            Err(RepositoryError::Database("connection refused".to_string()))
        }

        async fn find_gym_by_name(&self, _name: &str) -> Result<Option<Gym>, RepositoryError> {
            Ok(None)
        }

        async fn find_athlete_by_identity_number(
            &self,
            _digits: &str,
        ) -> Result<Option<AthleteOut>, RepositoryError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_a_rejection() {
        let result =
            validate_registration(request(), &ValidationLimits::default(), &FailingLookup).await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let limits = ValidationLimits::default();

        let outcome = validate_update(&AthleteUpdate::default(), &limits);
        assert_eq!(outcome, ValidationOutcome::Accepted(AthletePatch::default()));

        let update = AthleteUpdate {
            name: Some("Maria".to_string()),
            sex: Some("M".to_string()),
            ..Default::default()
        };
        let patch = validate_update(&update, &limits).into_result().unwrap();
        assert_eq!(patch.sex, Some(Sex::Male));
        assert_eq!(patch.name.as_deref(), Some("Maria"));
        assert!(patch.weight.is_none());
    }

    #[test]
    fn test_update_rejection_order() {
        let limits = ValidationLimits::default();
        let update = AthleteUpdate {
            sex: Some("z".to_string()),
            weight: Some(1_000.0),
            height: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            validate_update(&update, &limits),
            ValidationOutcome::Rejected(RejectionReason::InvalidSex { .. })
        ));

        let update = AthleteUpdate {
            weight: Some(limits.max_weight),
            height: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            validate_update(&update, &limits),
            ValidationOutcome::Rejected(RejectionReason::HeightOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejection_messages() {
        let reason = RejectionReason::WeightTooHigh {
            weight: 301.0,
            max: 300.0,
        };
        assert_eq!(reason.to_string(), "Weight 301 is too high. Max weight is 300");
        assert_eq!(reason.code(), "WeightTooHigh");
    }
}
