use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    athlete_handlers, category_handlers, gym_handlers, handlers, metrics_handler,
    state::AppState,
};

pub fn observability_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler::metrics_endpoint))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health_check))
}

pub fn athlete_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/athletes",
            post(athlete_handlers::create_athlete).get(athlete_handlers::list_athletes),
        )
        .route("/athletes/name/:name", get(athlete_handlers::search_athletes_by_name))
        .route("/athletes/cpf/:cpf", get(athlete_handlers::search_athletes_by_cpf))
        .route("/athletes/sex/:sex", get(athlete_handlers::search_athletes_by_sex))
        .route("/athletes/age", get(athlete_handlers::search_athletes_by_age))
        .route("/athletes/weight", get(athlete_handlers::search_athletes_by_weight))
        .route("/athletes/height", get(athlete_handlers::search_athletes_by_height))
        .route(
            "/athletes/:id",
            get(athlete_handlers::get_athlete)
                .patch(athlete_handlers::update_athlete)
                .delete(athlete_handlers::delete_athlete),
        )
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            post(category_handlers::create_category).get(category_handlers::list_categories),
        )
        .route(
            "/categories/name/:name",
            get(category_handlers::search_categories_by_name),
        )
        .route("/categories/:id", get(category_handlers::get_category))
}

pub fn gym_routes() -> Router<AppState> {
    Router::new()
        .route("/gyms", post(gym_handlers::create_gym).get(gym_handlers::list_gyms))
        .route("/gyms/name/:name", get(gym_handlers::search_gyms_by_name))
        .route("/gyms/:id", get(gym_handlers::get_gym))
}
