//! Entity storage for athletes, gyms and categories.
//!
//! # Implementations
//!
//! - `PgRepository`: PostgreSQL storage
//! - `InMemoryRepository`: process-local maps, used by tests and
//!   `STORAGE_BACKEND=memory`

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use workout_shared::{AthleteFilter, AthleteOut, AthletePatch, Category, Gym, NewAthlete};

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

/// Unique constraint on `athletes.cpf`
pub const ATHLETE_CPF_CONSTRAINT: &str = "athletes_cpf_key";
/// Unique constraint on `categories.name`
pub const CATEGORY_NAME_CONSTRAINT: &str = "categories_name_key";
/// Unique constraint on `gyms.name`
pub const GYM_NAME_CONSTRAINT: &str = "gyms_name_key";

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    #[error("Referenced record not found: {0}")]
    MissingReference(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return RepositoryError::UniqueViolation {
                    constraint: db.constraint().unwrap_or_default().to_string(),
                };
            }
            if db.is_foreign_key_violation() {
                return RepositoryError::MissingReference(
                    db.constraint().unwrap_or_default().to_string(),
                );
            }
        }
        RepositoryError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Read-only lookups consulted while validating a registration.
#[async_trait]
pub trait RegistrationLookup: Send + Sync {
    /// Exact-name category lookup
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Exact-name gym lookup
    async fn find_gym_by_name(&self, name: &str) -> Result<Option<Gym>>;

    /// Athlete registered under `digits` (11 digits, no formatting)
    async fn find_athlete_by_identity_number(&self, digits: &str) -> Result<Option<AthleteOut>>;
}

/// Persistent store for athletes, gyms and categories.
///
/// Listing methods take `offset`/`limit` and return the page alongside the
/// total number of matching rows. Name searches are case-sensitive substring
/// matches.
#[async_trait]
pub trait Repository: RegistrationLookup {
    /// Round-trip to storage, for health checks
    async fn ping(&self) -> Result<()>;

    /// Insert a category. Duplicate names fail with `UniqueViolation`.
    async fn create_category(&self, category: &Category) -> Result<()>;

    async fn list_categories(
        &self,
        name_contains: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64)>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;

    /// Insert a gym. Duplicate names fail with `UniqueViolation`.
    async fn create_gym(&self, gym: &Gym) -> Result<()>;

    async fn list_gyms(
        &self,
        name_contains: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Gym>, i64)>;

    async fn get_gym(&self, id: Uuid) -> Result<Option<Gym>>;

    /// Insert an athlete in a single atomic write.
    ///
    /// A second athlete with the same identity number fails with
    /// `UniqueViolation { constraint: ATHLETE_CPF_CONSTRAINT }`.
    async fn save_athlete(&self, athlete: &NewAthlete) -> Result<AthleteOut>;

    async fn list_athletes(
        &self,
        filter: &AthleteFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AthleteOut>, i64)>;

    async fn get_athlete(&self, id: Uuid) -> Result<Option<AthleteOut>>;

    /// Apply the present fields of `patch`. `None` when no such athlete.
    async fn update_athlete(&self, id: Uuid, patch: &AthletePatch) -> Result<Option<AthleteOut>>;

    /// `false` when no such athlete
    async fn delete_athlete(&self, id: Uuid) -> Result<bool>;
}
