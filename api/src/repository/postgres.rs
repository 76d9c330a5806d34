use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use workout_shared::{
    AthleteFilter, AthleteOut, AthletePatch, Category, CategoryRef, Gym, GymRef, NewAthlete, Sex,
};

use super::{RegistrationLookup, Repository, RepositoryError, Result};

/// Joined projection shared by every athlete read
const ATHLETE_COLUMNS: &str = "a.id, a.name, a.cpf, a.age, a.weight, a.height, a.sex, \
     a.created_at, c.name AS category_name, g.name AS gym_name";

const ATHLETE_JOINS: &str = "JOIN categories c ON c.id = a.category_id \
     JOIN gyms g ON g.id = a.gym_id";

#[derive(Debug, sqlx::FromRow)]
struct AthleteRow {
    id: Uuid,
    name: String,
    cpf: String,
    age: i32,
    weight: f64,
    height: f64,
    sex: String,
    created_at: DateTime<Utc>,
    category_name: String,
    gym_name: String,
}

impl TryFrom<AthleteRow> for AthleteOut {
    type Error = RepositoryError;

    fn try_from(row: AthleteRow) -> Result<Self> {
        let sex = Sex::from_code(&row.sex).ok_or_else(|| {
            RepositoryError::Database(format!("athlete {} has unknown sex code {:?}", row.id, row.sex))
        })?;
        Ok(AthleteOut {
            id: row.id,
            name: row.name,
            cpf: row.cpf,
            age: row.age,
            weight: row.weight,
            height: row.height,
            sex,
            created_at: row.created_at,
            category: CategoryRef {
                name: row.category_name,
            },
            gym: GymRef { name: row.gym_name },
        })
    }
}

fn into_athletes(rows: Vec<AthleteRow>) -> Result<Vec<AthleteOut>> {
    rows.into_iter().map(AthleteOut::try_from).collect()
}

/// Append the WHERE clause for `filter`. Substring searches are
/// case-sensitive and treat the fragment literally.
fn push_athlete_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &AthleteFilter) {
    match filter {
        AthleteFilter::All => {}
        AthleteFilter::NameContains(fragment) => {
            qb.push(" WHERE strpos(a.name, ");
            qb.push_bind(fragment.clone());
            qb.push(") > 0");
        }
        AthleteFilter::CpfContains(fragment) => {
            qb.push(" WHERE strpos(a.cpf, ");
            qb.push_bind(fragment.clone());
            qb.push(") > 0");
        }
        AthleteFilter::Sex(sex) => {
            qb.push(" WHERE a.sex = ");
            qb.push_bind(sex.as_code());
        }
        AthleteFilter::AgeBetween { min, max } => {
            qb.push(" WHERE a.age BETWEEN ");
            qb.push_bind(*min);
            qb.push(" AND ");
            qb.push_bind(*max);
        }
        AthleteFilter::WeightBetween { min, max } => {
            qb.push(" WHERE a.weight BETWEEN ");
            qb.push_bind(*min);
            qb.push(" AND ");
            qb.push_bind(*max);
        }
        AthleteFilter::HeightBetween { min, max } => {
            qb.push(" WHERE a.height BETWEEN ");
            qb.push_bind(*min);
            qb.push(" AND ");
            qb.push_bind(*max);
        }
    }
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationLookup for PgRepository {
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn find_gym_by_name(&self, name: &str) -> Result<Option<Gym>> {
        let gym = sqlx::query_as::<_, Gym>(
            "SELECT id, name, address, owner FROM gyms WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(gym)
    }

    async fn find_athlete_by_identity_number(&self, digits: &str) -> Result<Option<AthleteOut>> {
        let row = sqlx::query_as::<_, AthleteRow>(&format!(
            "SELECT {} FROM athletes a {} WHERE a.cpf = $1",
            ATHLETE_COLUMNS, ATHLETE_JOINS
        ))
        .bind(digits)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AthleteOut::try_from).transpose()
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_category(&self, category: &Category) -> Result<()> {
        sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
            .bind(category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_categories(
        &self,
        name_contains: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories WHERE $1::TEXT IS NULL OR strpos(name, $1) > 0",
        )
        .bind(name_contains)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories \
             WHERE $1::TEXT IS NULL OR strpos(name, $1) > 0 \
             ORDER BY name LIMIT $2 OFFSET $3",
        )
        .bind(name_contains)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn create_gym(&self, gym: &Gym) -> Result<()> {
        sqlx::query("INSERT INTO gyms (id, name, address, owner) VALUES ($1, $2, $3, $4)")
            .bind(gym.id)
            .bind(&gym.name)
            .bind(&gym.address)
            .bind(&gym.owner)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_gyms(
        &self,
        name_contains: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Gym>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM gyms WHERE $1::TEXT IS NULL OR strpos(name, $1) > 0",
        )
        .bind(name_contains)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Gym>(
            "SELECT id, name, address, owner FROM gyms \
             WHERE $1::TEXT IS NULL OR strpos(name, $1) > 0 \
             ORDER BY name LIMIT $2 OFFSET $3",
        )
        .bind(name_contains)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn get_gym(&self, id: Uuid) -> Result<Option<Gym>> {
        let gym = sqlx::query_as::<_, Gym>(
            "SELECT id, name, address, owner FROM gyms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(gym)
    }

    async fn save_athlete(&self, athlete: &NewAthlete) -> Result<AthleteOut> {
        let row = sqlx::query_as::<_, AthleteRow>(&format!(
            "WITH a AS ( \
                 INSERT INTO athletes \
                     (id, name, cpf, age, weight, height, sex, created_at, category_id, gym_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 RETURNING * \
             ) \
             SELECT {} FROM a {}",
            ATHLETE_COLUMNS, ATHLETE_JOINS
        ))
        .bind(athlete.id)
        .bind(&athlete.name)
        .bind(&athlete.cpf)
        .bind(athlete.age)
        .bind(athlete.weight)
        .bind(athlete.height)
        .bind(athlete.sex.as_code())
        .bind(athlete.created_at)
        .bind(athlete.category_id)
        .bind(athlete.gym_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn list_athletes(
        &self,
        filter: &AthleteFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AthleteOut>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM athletes a");
        push_athlete_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM athletes a {}",
            ATHLETE_COLUMNS, ATHLETE_JOINS
        ));
        push_athlete_filter(&mut qb, filter);
        qb.push(" ORDER BY a.created_at, a.id LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build_query_as::<AthleteRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((into_athletes(rows)?, total))
    }

    async fn get_athlete(&self, id: Uuid) -> Result<Option<AthleteOut>> {
        let row = sqlx::query_as::<_, AthleteRow>(&format!(
            "SELECT {} FROM athletes a {} WHERE a.id = $1",
            ATHLETE_COLUMNS, ATHLETE_JOINS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AthleteOut::try_from).transpose()
    }

    async fn update_athlete(&self, id: Uuid, patch: &AthletePatch) -> Result<Option<AthleteOut>> {
        let row = sqlx::query_as::<_, AthleteRow>(&format!(
            "WITH a AS ( \
                 UPDATE athletes SET \
                     name = COALESCE($2, name), \
                     age = COALESCE($3, age), \
                     weight = COALESCE($4, weight), \
                     height = COALESCE($5, height), \
                     sex = COALESCE($6, sex) \
                 WHERE id = $1 \
                 RETURNING * \
             ) \
             SELECT {} FROM a {}",
            ATHLETE_COLUMNS, ATHLETE_JOINS
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.age)
        .bind(patch.weight)
        .bind(patch.height)
        .bind(patch.sex.map(|sex| sex.as_code()))
        .fetch_optional(&self.pool)
        .await?;
        row.map(AthleteOut::try_from).transpose()
    }

    async fn delete_athlete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM athletes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
