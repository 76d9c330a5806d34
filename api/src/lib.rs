pub mod athlete_handlers;
pub mod category_handlers;
pub mod config;
pub mod error;
pub mod gym_handlers;
pub mod handlers;
pub mod metrics;
pub mod metrics_handler;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod state;
pub mod validation;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Full application router with its middleware stack
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::athlete_routes())
        .merge(routes::category_routes())
        .merge(routes::gym_routes())
        .merge(routes::health_routes())
        .merge(routes::observability_routes())
        .fallback(handlers::route_not_found)
        .layer(axum::middleware::from_fn(middleware::request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
