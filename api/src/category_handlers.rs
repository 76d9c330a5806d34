use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use workout_shared::{Category, CategoryIn, Page, PageParams};

use crate::{
    error::{repository_error, ApiError, ApiResult},
    handlers::{id_or_400, query_or_400},
    metrics,
    repository::{RegistrationLookup, RepositoryError},
    state::AppState,
    validation::ValidatedJson,
};

fn name_in_use(name: &str) -> ApiError {
    ApiError::see_other("DuplicateName", format!("Name {} already in use", name))
}

pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CategoryIn>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let existing = state
        .repo
        .find_category_by_name(&input.name)
        .await
        .map_err(|err| repository_error("find category", err, None))?;
    if existing.is_some() {
        return Err(name_in_use(&input.name));
    }

    let category = Category {
        id: Uuid::new_v4(),
        name: input.name,
    };
    match state.repo.create_category(&category).await {
        Ok(()) => {}
        Err(RepositoryError::UniqueViolation { .. }) => return Err(name_in_use(&category.name)),
        Err(err) => return Err(repository_error("create category", err, None)),
    }

    metrics::CATEGORIES_CREATED.inc();
    tracing::info!(category_id = %category.id, name = %category.name, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Category>>> {
    let params = query_or_400(params)?;
    let (items, total) = state
        .repo
        .list_categories(None, params.offset(), params.size())
        .await
        .map_err(|err| repository_error("list categories", err, None))?;
    Ok(Json(Page::new(items, total, &params)))
}

pub async fn search_categories_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Category>>> {
    let params = query_or_400(params)?;
    let (items, total) = state
        .repo
        .list_categories(Some(&name), params.offset(), params.size())
        .await
        .map_err(|err| repository_error("search categories", err, None))?;

    if total == 0 {
        return Err(ApiError::not_found(
            "CategoryNotFound",
            format!("Category not found: {}", name),
        ));
    }
    Ok(Json(Page::new(items, total, &params)))
}

pub async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Category>> {
    let id = id_or_400(id)?;
    state
        .repo
        .get_category(id)
        .await
        .map_err(|err| repository_error("get category", err, None))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("CategoryNotFound", format!("Category not found: {}", id)))
}
