//! Integration tests for the brand directory endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use zavvi_server::{create_app, store::ZavviStore, AppState};

fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = ZavviStore::open(dir.path().join("zavvi.json")).unwrap();
    let app = create_app(AppState::new(store));
    (dir, app)
}

fn post_brand(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/brands")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn acme_with_policies() -> Value {
    json!({
        "brand": {
            "name": "Acme",
            "slug": "acme",
            "website": "https://acme.example",
            "description": "Test brand",
            "isVerified": true
        },
        "policies": [
            {
                "type": "warranty",
                "title": "2-Year Warranty",
                "description": "Covers defects",
                "duration": 730,
                "exclusions": "Misuse"
            },
            {
                "type": "return",
                "title": "30-Day Returns",
                "description": "Full refund within 30 days",
                "duration": 30
            }
        ]
    })
}

#[tokio::test]
async fn brand_is_created_with_nested_policies() {
    let (_dir, app) = test_app();

    let response = app.oneshot(post_brand(&acme_with_policies())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Brand and policies created successfully");
    assert_eq!(body["data"]["brand"]["name"], "Acme");
    assert_eq!(body["data"]["policies"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["policies"][0]["type"], "warranty");
    assert_eq!(body["data"]["policies"][0]["isActive"], true);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(post_brand(&acme_with_policies()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(post_brand(&acme_with_policies())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Brand slug already exists");
}

#[tokio::test]
async fn missing_brand_name_is_rejected() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(post_brand(&json!({
            "brand": { "name": "", "slug": "x" }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Brand name is required");
}

#[tokio::test]
async fn listing_attaches_active_policies_and_paginates() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(post_brand(&acme_with_policies()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_brand(&json!({
            "brand": { "name": "Beta", "slug": "beta" }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/brands")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response_json(response).await;

    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["limit"], 20);
    // Name ascending: Acme before Beta.
    assert_eq!(body["data"][0]["name"], "Acme");
    assert_eq!(body["data"][0]["policies"].as_array().unwrap().len(), 2);
    // Type ascending, matching the catalog's string ordering.
    assert_eq!(body["data"][0]["policies"][0]["type"], "return");
    assert_eq!(body["data"][0]["policies"][1]["type"], "warranty");
    assert_eq!(body["data"][1]["name"], "Beta");
    assert!(body["data"][1]["policies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn listing_filters_by_search_and_verified() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(post_brand(&acme_with_policies()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_brand(&json!({
            "brand": { "name": "Beta", "slug": "beta", "isVerified": false }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/brands?search=acm")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Acme");

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/brands?verified=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["isVerified"], true);
}
