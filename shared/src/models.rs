use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════════
// CATEGORIES
// ═══════════════════════════════════════════════════════════════════════════

/// A competition category an athlete is registered under
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// Body for POST /categories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryIn {
    pub name: String,
}

/// Reference to a category by name, as embedded in athlete payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryRef {
    pub name: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// GYMS
// ═══════════════════════════════════════════════════════════════════════════

/// A gym athletes train at
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Gym {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub owner: String,
}

/// Body for POST /gyms
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GymIn {
    pub name: String,
    pub address: String,
    pub owner: String,
}

/// Reference to a gym by name, as embedded in athlete payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GymRef {
    pub name: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// ATHLETES
// ═══════════════════════════════════════════════════════════════════════════

/// Canonical sex code stored for an athlete
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sex {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Sex {
    /// Single-character lowercase code
    pub fn as_code(&self) -> &'static str {
        match self {
            Sex::Male => "m",
            Sex::Female => "f",
        }
    }

    /// Parse an already-normalized code. Case is not folded here.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(Sex::Male),
            "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Body for POST /athletes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AthleteIn {
    pub name: String,
    /// National identity number, formatting characters allowed
    pub cpf: String,
    pub age: i32,
    /// Kilograms
    pub weight: f64,
    /// Meters
    pub height: f64,
    pub sex: String,
    pub category: CategoryRef,
    pub gym: GymRef,
}

/// Body for PATCH /athletes/:id. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AthleteUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub sex: Option<String>,
}

/// Validated changes for an existing athlete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AthletePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub sex: Option<Sex>,
}

impl AthletePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.sex.is_none()
    }
}

/// Athlete record ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewAthlete {
    pub id: Uuid,
    pub name: String,
    /// Digits only, always 11 long
    pub cpf: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
    pub category_id: Uuid,
    pub gym_id: Uuid,
}

/// Canonical athlete representation returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AthleteOut {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
    pub category: CategoryRef,
    pub gym: GymRef,
}

// ═══════════════════════════════════════════════════════════════════════════
// QUERIES AND PAGINATION
// ═══════════════════════════════════════════════════════════════════════════

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?page=&size=` query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.size())
    }
}

/// Paginated listing envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, params: &PageParams) -> Self {
        let size = params.size();
        let pages = if size > 0 {
            (total as f64 / size as f64).ceil() as i64
        } else {
            0
        };
        Self {
            items,
            total,
            page: params.page(),
            size,
            pages,
        }
    }
}

/// Athlete listing filters, one per search endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum AthleteFilter {
    All,
    NameContains(String),
    CpfContains(String),
    Sex(Sex),
    AgeBetween { min: i32, max: i32 },
    WeightBetween { min: f64, max: f64 },
    HeightBetween { min: f64, max: f64 },
}

/// `?min_age=&max_age=` query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgeRangeParams {
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

/// `?min_weight=&max_weight=` query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightRangeParams {
    pub min_weight: Option<f64>,
    pub max_weight: Option<f64>,
}

/// `?min_height=&max_height=` query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeightRangeParams {
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}
