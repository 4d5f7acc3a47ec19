//! HTTP-level integration tests for `/api/v1/checkpoints`.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_main_entrance, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_checkpoint_returns_201(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/checkpoints",
        json!({
            "name": "  Warehouse ",
            "latitude": 40.7580,
            "longitude": -73.9855,
            "checklist": [" Roller door shut ", "", "Alarm armed"]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["id"].is_number());
    assert_eq!(json["data"]["name"], "Warehouse");
    assert_eq!(json["data"]["checklist"], json!(["Roller door shut", "Alarm armed"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_checkpoint_rejects_bad_input(pool: PgPool) {
    let cases = [
        json!({ "name": "", "latitude": 0.0, "longitude": 0.0 }),
        json!({ "name": "North Pole+", "latitude": 95.0, "longitude": 0.0 }),
        json!({ "name": "Dateline+", "latitude": 0.0, "longitude": 181.0 }),
        json!({ "name": "Dupes", "latitude": 0.0, "longitude": 0.0, "checklist": ["A", " A"] }),
    ];
    for body in cases {
        let response = post_json(build_test_app(pool.clone()), "/api/v1/checkpoints", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_and_list_checkpoints(pool: PgPool) {
    let id = create_main_entrance(&pool).await;

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/checkpoints/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["latitude"], 40.7128);
    assert_eq!(json["data"]["checklist"][0], "Door locked");

    let response = get(build_test_app(pool), "/api/v1/checkpoints").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_checkpoint_checklist(pool: PgPool) {
    let id = create_main_entrance(&pool).await;

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/checkpoints/{id}"),
        json!({ "checklist": ["Door locked", "Gate chained"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Main Entrance");
    assert_eq!(json["data"]["checklist"], json!(["Door locked", "Gate chained"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_checkpoint_rejects_out_of_range_latitude(pool: PgPool) {
    let id = create_main_entrance(&pool).await;

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/checkpoints/{id}"),
        json!({ "latitude": -91.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_checkpoint(pool: PgPool) {
    let id = create_main_entrance(&pool).await;
    let uri = format!("/api/v1/checkpoints/{id}");

    let response = delete(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
