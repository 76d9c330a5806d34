use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use workout_shared::{Gym, GymIn, Page, PageParams};

use crate::{
    error::{repository_error, ApiError, ApiResult},
    handlers::{id_or_400, query_or_400},
    metrics,
    repository::{RegistrationLookup, RepositoryError},
    state::AppState,
    validation::ValidatedJson,
};

fn name_in_use(name: &str) -> ApiError {
    ApiError::see_other("DuplicateName", format!("Gym name: {} already in use", name))
}

pub async fn create_gym(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<GymIn>,
) -> ApiResult<(StatusCode, Json<Gym>)> {
    let existing = state
        .repo
        .find_gym_by_name(&input.name)
        .await
        .map_err(|err| repository_error("find gym", err, None))?;
    if existing.is_some() {
        return Err(name_in_use(&input.name));
    }

    let gym = Gym {
        id: Uuid::new_v4(),
        name: input.name,
        address: input.address,
        owner: input.owner,
    };
    match state.repo.create_gym(&gym).await {
        Ok(()) => {}
        Err(RepositoryError::UniqueViolation { .. }) => return Err(name_in_use(&gym.name)),
        Err(err) => return Err(repository_error("create gym", err, None)),
    }

    metrics::GYMS_CREATED.inc();
    tracing::info!(gym_id = %gym.id, name = %gym.name, "gym created");
    Ok((StatusCode::CREATED, Json(gym)))
}

pub async fn list_gyms(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Gym>>> {
    let params = query_or_400(params)?;
    let (items, total) = state
        .repo
        .list_gyms(None, params.offset(), params.size())
        .await
        .map_err(|err| repository_error("list gyms", err, None))?;
    Ok(Json(Page::new(items, total, &params)))
}

pub async fn search_gyms_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Gym>>> {
    let params = query_or_400(params)?;
    let (items, total) = state
        .repo
        .list_gyms(Some(&name), params.offset(), params.size())
        .await
        .map_err(|err| repository_error("search gyms", err, None))?;

    if total == 0 {
        return Err(ApiError::not_found(
            "GymNotFound",
            format!("Gym not found by name: {}", name),
        ));
    }
    Ok(Json(Page::new(items, total, &params)))
}

pub async fn get_gym(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Gym>> {
    let id = id_or_400(id)?;
    state
        .repo
        .get_gym(id)
        .await
        .map_err(|err| repository_error("get gym", err, None))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("GymNotFound", format!("Gym not found: {}", id)))
}
