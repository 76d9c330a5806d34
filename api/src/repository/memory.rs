//! In-memory repository.
//!
//! Records live in insertion order behind a single lock, so every write sees
//! a consistent view of all three tables. Unique constraints mirror the
//! PostgreSQL schema and fail with the same constraint names.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use workout_shared::{
    AthleteFilter, AthleteOut, AthletePatch, Category, CategoryRef, Gym, GymRef, NewAthlete,
};

use super::{
    RegistrationLookup, Repository, RepositoryError, Result, ATHLETE_CPF_CONSTRAINT,
    CATEGORY_NAME_CONSTRAINT, GYM_NAME_CONSTRAINT,
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    gyms: Vec<Gym>,
    athletes: Vec<NewAthlete>,
}

impl Tables {
    fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn gym(&self, id: Uuid) -> Option<&Gym> {
        self.gyms.iter().find(|g| g.id == id)
    }

    /// Join an athlete with its category and gym names
    fn athlete_out(&self, athlete: &NewAthlete) -> Result<AthleteOut> {
        let category = self
            .category(athlete.category_id)
            .ok_or_else(|| RepositoryError::MissingReference("athletes_category_id_fkey".into()))?;
        let gym = self
            .gym(athlete.gym_id)
            .ok_or_else(|| RepositoryError::MissingReference("athletes_gym_id_fkey".into()))?;

        Ok(AthleteOut {
            id: athlete.id,
            name: athlete.name.clone(),
            cpf: athlete.cpf.clone(),
            age: athlete.age,
            weight: athlete.weight,
            height: athlete.height,
            sex: athlete.sex,
            created_at: athlete.created_at,
            category: CategoryRef {
                name: category.name.clone(),
            },
            gym: GymRef {
                name: gym.name.clone(),
            },
        })
    }
}

fn unique_violation(constraint: &str) -> RepositoryError {
    RepositoryError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn page<T: Clone>(rows: Vec<T>, offset: i64, limit: i64) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect();
    (items, total)
}

fn filter_matches(filter: &AthleteFilter, athlete: &NewAthlete) -> bool {
    match filter {
        AthleteFilter::All => true,
        AthleteFilter::NameContains(fragment) => athlete.name.contains(fragment.as_str()),
        AthleteFilter::CpfContains(fragment) => athlete.cpf.contains(fragment.as_str()),
        AthleteFilter::Sex(sex) => athlete.sex == *sex,
        AthleteFilter::AgeBetween { min, max } => (*min..=*max).contains(&athlete.age),
        AthleteFilter::WeightBetween { min, max } => (*min..=*max).contains(&athlete.weight),
        AthleteFilter::HeightBetween { min, max } => (*min..=*max).contains(&athlete.height),
    }
}

/// Process-local repository
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationLookup for InMemoryRepository {
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn find_gym_by_name(&self, name: &str) -> Result<Option<Gym>> {
        let tables = self.tables.read().await;
        Ok(tables.gyms.iter().find(|g| g.name == name).cloned())
    }

    async fn find_athlete_by_identity_number(&self, digits: &str) -> Result<Option<AthleteOut>> {
        let tables = self.tables.read().await;
        tables
            .athletes
            .iter()
            .find(|a| a.cpf == digits)
            .map(|a| tables.athlete_out(a))
            .transpose()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn create_category(&self, category: &Category) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.categories.iter().any(|c| c.name == category.name) {
            return Err(unique_violation(CATEGORY_NAME_CONSTRAINT));
        }
        tables.categories.push(category.clone());
        Ok(())
    }

    async fn list_categories(
        &self,
        name_contains: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64)> {
        let tables = self.tables.read().await;
        let rows = tables
            .categories
            .iter()
            .filter(|c| name_contains.map_or(true, |n| c.name.contains(n)))
            .cloned()
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.category(id).cloned())
    }

    async fn create_gym(&self, gym: &Gym) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.gyms.iter().any(|g| g.name == gym.name) {
            return Err(unique_violation(GYM_NAME_CONSTRAINT));
        }
        tables.gyms.push(gym.clone());
        Ok(())
    }

    async fn list_gyms(
        &self,
        name_contains: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Gym>, i64)> {
        let tables = self.tables.read().await;
        let rows = tables
            .gyms
            .iter()
            .filter(|g| name_contains.map_or(true, |n| g.name.contains(n)))
            .cloned()
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn get_gym(&self, id: Uuid) -> Result<Option<Gym>> {
        let tables = self.tables.read().await;
        Ok(tables.gym(id).cloned())
    }

    async fn save_athlete(&self, athlete: &NewAthlete) -> Result<AthleteOut> {
        let mut tables = self.tables.write().await;
        if tables.athletes.iter().any(|a| a.cpf == athlete.cpf) {
            return Err(unique_violation(ATHLETE_CPF_CONSTRAINT));
        }
        let out = tables.athlete_out(athlete)?;
        tables.athletes.push(athlete.clone());
        Ok(out)
    }

    async fn list_athletes(
        &self,
        filter: &AthleteFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AthleteOut>, i64)> {
        let tables = self.tables.read().await;
        let rows = tables
            .athletes
            .iter()
            .filter(|a| filter_matches(filter, a))
            .map(|a| tables.athlete_out(a))
            .collect::<Result<Vec<_>>>()?;
        Ok(page(rows, offset, limit))
    }

    async fn get_athlete(&self, id: Uuid) -> Result<Option<AthleteOut>> {
        let tables = self.tables.read().await;
        tables
            .athletes
            .iter()
            .find(|a| a.id == id)
            .map(|a| tables.athlete_out(a))
            .transpose()
    }

    async fn update_athlete(&self, id: Uuid, patch: &AthletePatch) -> Result<Option<AthleteOut>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.athletes.iter().position(|a| a.id == id) else {
            return Ok(None);
        };

        let athlete = &mut tables.athletes[index];
        if let Some(name) = &patch.name {
            athlete.name = name.clone();
        }
        if let Some(age) = patch.age {
            athlete.age = age;
        }
        if let Some(weight) = patch.weight {
            athlete.weight = weight;
        }
        if let Some(height) = patch.height {
            athlete.height = height;
        }
        if let Some(sex) = patch.sex {
            athlete.sex = sex;
        }

        let updated = tables.athletes[index].clone();
        tables.athlete_out(&updated).map(Some)
    }

    async fn delete_athlete(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.athletes.len();
        tables.athletes.retain(|a| a.id != id);
        Ok(tables.athletes.len() != before)
    }
}
