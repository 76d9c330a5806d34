// tests/athlete_routes_tests.rs
// Athlete registration, search, update and removal through the full router

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{athlete_body, get, post, seeded_app, send, OTHER_CPF, VALID_CPF};

#[tokio::test]
async fn test_register_athlete() {
    let app = seeded_app().await;

    let (status, body) = post(&app, "/athletes", athlete_body(VALID_CPF)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cpf"], "12345678909");
    assert_eq!(body["sex"], "f");
    assert_eq!(body["name"], "João Silva");
    assert_eq!(body["category"]["name"], "Scale");
    assert_eq!(body["gym"]["name"], "Casa de Pedra");
    assert!(body["id"].is_string());
    assert!(body["created_at"].is_string());

    let id = body["id"].as_str().unwrap();
    let (status, fetched) = get(&app, &format!("/athletes/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_duplicate_registration_is_see_other() {
    let app = seeded_app().await;
    let (status, _) = post(&app, "/athletes", athlete_body(VALID_CPF)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/athletes", athlete_body("12345678909")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(body["error"], "DuplicateIdentityNumber");
    assert_eq!(body["message"], "CPF 12345678909 already in use");
}

#[tokio::test]
async fn test_rejections_are_bad_request() {
    let app = seeded_app().await;

    let cases = [
        ("category", json!({"name": "Open"}), "CategoryNotFound", "Category Open not found."),
        ("gym", json!({"name": "Nowhere"}), "GymNotFound", "Gym Nowhere not found."),
        ("cpf", json!("123.456.789-00"), "InvalidIdentityNumber", "CPF 123.456.789-00 is not valid"),
        ("sex", json!("x"), "InvalidSex", "Sex x is not valid"),
        ("weight", json!(300.5), "WeightTooHigh", "Weight 300.5 is too high. Max weight is 300"),
        (
            "height",
            json!(187.0),
            "HeightOutOfRange",
            "Height 187 is probably wrong. Max height is 2.5. Insert height in meters",
        ),
    ];

    for (field, value, error, message) in cases {
        let mut body = athlete_body(VALID_CPF);
        body[field] = value;
        let (status, response) = post(&app, "/athletes", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} should be rejected", field);
        assert_eq!(response["error"], error);
        assert_eq!(response["message"], message);
    }

    let (_, listing) = get(&app, "/athletes").await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn test_first_failing_check_wins() {
    let app = seeded_app().await;
    let mut body = athlete_body("000");
    body["gym"] = json!({"name": "Nowhere"});
    body["weight"] = json!(999.0);

    let (status, response) = post(&app, "/athletes", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "GymNotFound");
}

#[tokio::test]
async fn test_schema_errors_are_unprocessable() {
    let app = seeded_app().await;
    let mut body = athlete_body(VALID_CPF);
    body["age"] = json!(-1);
    body["sex"] = json!("female");

    let (status, response) = post(&app, "/athletes", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["errors"].as_array().unwrap().len(), 2);

    let (status, _) = post(&app, "/athletes", json!({"name": "only a name"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_searches() {
    let app = seeded_app().await;
    post(&app, "/athletes", athlete_body(VALID_CPF)).await;
    let mut other = athlete_body(OTHER_CPF);
    other["name"] = json!("Maria Souza");
    other["sex"] = json!("m");
    other["age"] = json!(40);
    other["weight"] = json!(90.0);
    other["height"] = json!(1.65);
    let (status, _) = post(&app, "/athletes", other).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, page) = get(&app, "/athletes/name/Souza").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "Maria Souza");

    let (_, page) = get(&app, "/athletes/cpf/4567").await;
    assert_eq!(page["items"][0]["cpf"], "12345678909");

    let (_, page) = get(&app, "/athletes/sex/M").await;
    assert_eq!(page["total"], 1);

    let (_, page) = get(&app, "/athletes/age?min_age=30&max_age=50").await;
    assert_eq!(page["items"][0]["age"], 40);

    let (_, page) = get(&app, "/athletes/weight?max_weight=80").await;
    assert_eq!(page["items"][0]["weight"], 75.5);

    let (_, page) = get(&app, "/athletes/height?min_height=1.8").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["height"], 1.87);

    let (status, body) = get(&app, "/athletes/name/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "AthleteNotFound");

    let (status, _) = get(&app, "/athletes/sex/x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination() {
    let app = seeded_app().await;
    for cpf in [VALID_CPF, OTHER_CPF, "111.444.777-35"] {
        let (status, _) = post(&app, "/athletes", athlete_body(cpf)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = get(&app, "/athletes?page=2&size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 2);
    assert_eq!(page["size"], 2);
    assert_eq!(page["pages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);

    let (status, _) = get(&app, "/athletes?page=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = get(&app, "/athletes?page=9223372036854775807").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_empty_sex_code_reaches_pipeline() {
    let app = seeded_app().await;
    let mut body = athlete_body(VALID_CPF);
    body["sex"] = json!("");

    let (status, response) = post(&app, "/athletes", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "InvalidSex");
    assert_eq!(response["message"], "Sex  is not valid");

    let mut body = athlete_body(VALID_CPF);
    body["sex"] = json!("");
    body["category"] = json!({"name": "Open"});
    let (status, response) = post(&app, "/athletes", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "CategoryNotFound");
}

#[tokio::test]
async fn test_spaced_out_identity_number_is_accepted() {
    let app = seeded_app().await;
    let spaced = "1 2 3 . 4 5 6 . 7 8 9 - 0 9";

    let mut body = athlete_body(spaced);
    body["category"] = json!({"name": "Open"});
    let (status, response) = post(&app, "/athletes", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "CategoryNotFound");

    let (status, created) = post(&app, "/athletes", athlete_body(spaced)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["cpf"], "12345678909");
}

#[tokio::test]
async fn test_patch_athlete() {
    let app = seeded_app().await;
    let (_, created) = post(&app, "/athletes", athlete_body(VALID_CPF)).await;
    let uri = format!("/athletes/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({"weight": 80.0, "sex": "M"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["weight"], 80.0);
    assert_eq!(updated["sex"], "m");
    assert_eq!(updated["cpf"], created["cpf"]);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"height": 3.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "HeightOutOfRange");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"cpf": "52998224725"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/athletes/8f1e2c55-1d8a-4c6e-9a0b-2f7c1d3e4b5a",
        Some(json!({"age": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_athlete() {
    let app = seeded_app().await;
    let (_, created) = post(&app, "/athletes", athlete_body(VALID_CPF)).await;
    let uri = format!("/athletes/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/athletes", athlete_body(VALID_CPF)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let app = seeded_app().await;
    let (status, body) = get(&app, "/athletes/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidPath");
}
