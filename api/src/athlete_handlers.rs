use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use workout_shared::{
    AgeRangeParams, AthleteFilter, AthleteIn, AthleteOut, AthleteUpdate, HeightRangeParams, Page,
    PageParams, Sex, WeightRangeParams,
};

use crate::{
    error::{repository_error, ApiError, ApiResult},
    handlers::{id_or_400, query_or_400},
    metrics,
    state::AppState,
    validation::{
        validate_registration, validate_update, RejectionReason, ValidatedJson, ValidationOutcome,
    },
};

const DEFAULT_MIN_AGE: i32 = 0;
const DEFAULT_MAX_AGE: i32 = 200;

fn rejected(operation: &str, reason: RejectionReason) -> ApiError {
    metrics::record_rejection(reason.code());
    tracing::warn!(operation = operation, reason = reason.code(), "{}", reason);
    reason.into()
}

fn athlete_not_found(id: Uuid) -> ApiError {
    ApiError::not_found("AthleteNotFound", format!("Athlete not found: {}", id))
}

/// Run a filtered listing. An empty result is a 404 carrying `describe`.
async fn search(
    state: &AppState,
    filter: AthleteFilter,
    params: &PageParams,
    describe: impl FnOnce() -> String,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let (items, total) = state
        .repo
        .list_athletes(&filter, params.offset(), params.size())
        .await
        .map_err(|err| repository_error("search athletes", err, None))?;

    if total == 0 {
        return Err(ApiError::not_found(
            "AthleteNotFound",
            format!("Athlete not found by {}", describe()),
        ));
    }
    Ok(Json(Page::new(items, total, params)))
}

pub async fn create_athlete(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AthleteIn>,
) -> ApiResult<(StatusCode, Json<AthleteOut>)> {
    let outcome = validate_registration(input.into(), &state.limits, state.repo.as_ref())
        .await
        .map_err(|err| repository_error("validate athlete", err, None))?;

    let normalized = match outcome {
        ValidationOutcome::Accepted(normalized) => normalized,
        ValidationOutcome::Rejected(reason) => return Err(rejected("create athlete", reason)),
    };

    let digits = normalized.identity_number.clone();
    let athlete = normalized.into_new_athlete(Uuid::new_v4(), Utc::now());
    let saved = state
        .repo
        .save_athlete(&athlete)
        .await
        .map_err(|err| repository_error("save athlete", err, Some(digits.as_str())))?;

    metrics::ATHLETES_REGISTERED.inc();
    tracing::info!(
        athlete_id = %saved.id,
        category = %saved.category.name,
        gym = %saved.gym.name,
        "athlete registered"
    );
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_athletes(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let params = query_or_400(params)?;
    let (items, total) = state
        .repo
        .list_athletes(&AthleteFilter::All, params.offset(), params.size())
        .await
        .map_err(|err| repository_error("list athletes", err, None))?;
    Ok(Json(Page::new(items, total, &params)))
}

pub async fn search_athletes_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let params = query_or_400(params)?;
    let filter = AthleteFilter::NameContains(name.clone());
    search(&state, filter, &params, || format!("name: {}", name)).await
}

pub async fn search_athletes_by_cpf(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let params = query_or_400(params)?;
    let filter = AthleteFilter::CpfContains(cpf.clone());
    search(&state, filter, &params, || format!("CPF: {}", cpf)).await
}

pub async fn search_athletes_by_sex(
    State(state): State<AppState>,
    Path(sex): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let params = query_or_400(params)?;
    let Some(code) = Sex::from_code(&sex.to_lowercase()) else {
        return Err(RejectionReason::InvalidSex { value: sex }.into());
    };
    search(&state, AthleteFilter::Sex(code), &params, || format!("sex: {}", code)).await
}

pub async fn search_athletes_by_age(
    State(state): State<AppState>,
    range: Result<Query<AgeRangeParams>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let range = query_or_400(range)?;
    let params = query_or_400(params)?;
    let min = range.min_age.unwrap_or(DEFAULT_MIN_AGE);
    let max = range.max_age.unwrap_or(DEFAULT_MAX_AGE);
    search(&state, AthleteFilter::AgeBetween { min, max }, &params, || {
        format!("age: min {}, max {}", min, max)
    })
    .await
}

pub async fn search_athletes_by_weight(
    State(state): State<AppState>,
    range: Result<Query<WeightRangeParams>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let range = query_or_400(range)?;
    let params = query_or_400(params)?;
    let min = range.min_weight.unwrap_or(0.0);
    let max = range.max_weight.unwrap_or(state.limits.max_weight);
    search(&state, AthleteFilter::WeightBetween { min, max }, &params, || {
        format!("weight: min {}, max {}", min, max)
    })
    .await
}

pub async fn search_athletes_by_height(
    State(state): State<AppState>,
    range: Result<Query<HeightRangeParams>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<AthleteOut>>> {
    let range = query_or_400(range)?;
    let params = query_or_400(params)?;
    let min = range.min_height.unwrap_or(0.0);
    let max = range.max_height.unwrap_or(state.limits.max_height);
    search(&state, AthleteFilter::HeightBetween { min, max }, &params, || {
        format!("height: min {}, max {}", min, max)
    })
    .await
}

pub async fn get_athlete(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<AthleteOut>> {
    let id = id_or_400(id)?;
    state
        .repo
        .get_athlete(id)
        .await
        .map_err(|err| repository_error("get athlete", err, None))?
        .map(Json)
        .ok_or_else(|| athlete_not_found(id))
}

pub async fn update_athlete(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    ValidatedJson(update): ValidatedJson<AthleteUpdate>,
) -> ApiResult<Json<AthleteOut>> {
    let id = id_or_400(id)?;

    let patch = match validate_update(&update, &state.limits) {
        ValidationOutcome::Accepted(patch) => patch,
        ValidationOutcome::Rejected(reason) => return Err(rejected("update athlete", reason)),
    };

    let updated = if patch.is_empty() {
        state.repo.get_athlete(id).await
    } else {
        state.repo.update_athlete(id, &patch).await
    }
    .map_err(|err| repository_error("update athlete", err, None))?
    .ok_or_else(|| athlete_not_found(id))?;

    if !patch.is_empty() {
        metrics::ATHLETES_UPDATED.inc();
        tracing::info!(athlete_id = %id, "athlete updated");
    }
    Ok(Json(updated))
}

pub async fn delete_athlete(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = id_or_400(id)?;
    let deleted = state
        .repo
        .delete_athlete(id)
        .await
        .map_err(|err| repository_error("delete athlete", err, None))?;

    if !deleted {
        return Err(athlete_not_found(id));
    }
    metrics::ATHLETES_DELETED.inc();
    tracing::info!(athlete_id = %id, "athlete deleted");
    Ok(StatusCode::NO_CONTENT)
}
