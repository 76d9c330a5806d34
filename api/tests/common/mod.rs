#![allow(dead_code)]

// Shared helpers for driving the router in-process

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use workout_api::observability::metrics_registry;
use workout_api::repository::InMemoryRepository;
use workout_api::state::AppState;
use workout_api::validation::ValidationLimits;

pub const VALID_CPF: &str = "123.456.789-09";
pub const OTHER_CPF: &str = "529.982.247-25";

pub fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(InMemoryRepository::new()),
        ValidationLimits::default(),
        metrics_registry("test").unwrap(),
    );
    workout_api::app(state)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Router with the "Scale" category and "Casa de Pedra" gym already created
pub async fn seeded_app() -> Router {
    let app = test_app();
    let (status, _) = post(&app, "/categories", json!({"name": "Scale"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = post(
        &app,
        "/gyms",
        json!({
            "name": "Casa de Pedra",
            "address": "Rua Venancio Aires, 600",
            "owner": "Alexandre Pedra"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

pub fn athlete_body(cpf: &str) -> Value {
    json!({
        "name": "João Silva",
        "cpf": cpf,
        "age": 25,
        "weight": 75.5,
        "height": 1.87,
        "sex": "F",
        "category": {"name": "Scale"},
        "gym": {"name": "Casa de Pedra"}
    })
}
