//! HTTP-level integration tests for the `/resources` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_bytes, body_json, delete, get, post_json, put_json, send};
use serde_json::json;
use sqlx::PgPool;

async fn create(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/resources", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_returns_201_with_assigned_id(pool: PgPool) {
    let json = create(&pool, json!({"name": "Widget", "description": "blue"})).await;

    assert!(json["id"].is_number());
    assert_eq!(json["name"], "Widget");
    assert_eq!(json["description"], "blue");
    assert_eq!(json["createdAt"], json["updatedAt"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_without_description_returns_null(pool: PgPool) {
    let json = create(&pool, json!({"name": "Bare"})).await;
    assert!(json["description"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_trims_name(pool: PgPool) {
    let json = create(&pool, json!({"name": "  Padded  "})).await;
    assert_eq!(json["name"], "Padded");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_missing_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/resources", json!({"description": "no name"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Name is required.");
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_blank_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/resources", json!({"name": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_mistyped_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/resources", json!({"name": 5})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Name is required.");
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_without_json_content_type_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::post("/resources")
        .body(Body::from(r#"{"name":"Widget"}"#))
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Name is required.");
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_by_id(pool: PgPool) {
    let created = create(&pool, json!({"name": "Get Me"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/resources/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, created);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/resources/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Resource with id 999999 not found");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_applies_partial_body(pool: PgPool) {
    let created = create(&pool, json!({"name": "Widget", "description": "blue"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/resources/{id}"), json!({"description": "red"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], created["id"]);
    assert_eq!(json["name"], "Widget");
    assert_eq!(json["description"], "red");
    assert_eq!(json["createdAt"], created["createdAt"]);
    assert_ne!(json["updatedAt"], created["updatedAt"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_empty_body_returns_400(pool: PgPool) {
    let created = create(&pool, json!({"name": "Widget"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/resources/{id}"), json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "No update data provided. Provide name or description."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_null_description_clears_it(pool: PgPool) {
    let created = create(&pool, json!({"name": "Widget", "description": "blue"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/resources/{id}"), json!({"description": null})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Widget");
    assert!(json["description"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_malformed_body_returns_json_400(pool: PgPool) {
    let created = create(&pool, json!({"name": "Widget"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/resources/{id}"), json!({"name": 5})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_nonexistent_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_json(app, "/resources/999999", json!({"name": "Ghost"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_blank_name_returns_400(pool: PgPool) {
    let created = create(&pool, json!({"name": "Widget"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/resources/{id}"), json!({"name": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_returns_204_then_404(pool: PgPool) {
    let created = create(&pool, json!({"name": "Delete Me"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/resources/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/resources/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/resources/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List / filter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_filters_case_insensitively(pool: PgPool) {
    create(&pool, json!({"name": "Widget", "description": "blue"})).await;
    create(&pool, json!({"name": "Gadget", "description": "Blue steel"})).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/resources?name=WID").await).await;
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "Widget");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/resources?description=blue").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/resources?name=sprocket").await).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_empty_params_return_everything(pool: PgPool) {
    create(&pool, json!({"name": "P1"})).await;
    create(&pool, json!({"name": "P2"})).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/resources?name=&description=").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["P2", "P1"]);
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_widget_lifecycle(pool: PgPool) {
    let created = create(&pool, json!({"name": "Widget", "description": "blue"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let listed = body_json(get(app, "/resources?name=wid").await).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"] == created["id"]));

    let app = common::build_test_app(pool.clone());
    let updated = body_json(
        put_json(app, &format!("/resources/{id}"), json!({"description": "red"})).await,
    )
    .await;
    assert_eq!(updated["name"], "Widget");
    assert_eq!(updated["description"], "red");

    let app = common::build_test_app(pool.clone());
    assert_eq!(
        delete(app, &format!("/resources/{id}")).await.status(),
        StatusCode::NO_CONTENT
    );

    let app = common::build_test_app(pool);
    assert_eq!(
        get(app, &format!("/resources/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}
