use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use catalog_commands::{
    CreateBannerCommand, CreateReviewCommand, UpdateBannerCommand, UpdateReviewCommand,
};
use catalog_http::{CatalogServices, lifecycle_routes, parent_routes};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{
    fixtures::{BannerDao, ReviewDao, banner, banner_dao, review, review_dao},
    memory_store,
};
use tower::ServiceExt;

fn banner_app(dao: Arc<BannerDao>) -> Router {
    Router::new()
        .nest(
            "/api/banners",
            lifecycle_routes::<BannerDao, CreateBannerCommand, UpdateBannerCommand>(),
        )
        .with_state(CatalogServices::new(dao, memory_store()))
}

fn review_app(dao: Arc<ReviewDao>) -> Router {
    Router::new()
        .nest(
            "/api/reviews",
            lifecycle_routes::<ReviewDao, CreateReviewCommand, UpdateReviewCommand>()
                .merge(parent_routes::<ReviewDao>()),
        )
        .with_state(CatalogServices::new(dao, memory_store()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map_or_else(Body::empty, |body| Body::from(body.to_string()));
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    }
    else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn new_banner(name: &str) -> Value {
    json!({
        "name": name,
        "start_date": "2024-01-01",
        "end_date": "2024-01-31",
        "start_time": "09:00",
        "end_time": "17:00"
    })
}

#[tokio::test]
async fn test_banner_lifecycle_over_http() {
    let app = banner_app(Arc::new(banner_dao()));

    let (status, created) = send(&app, "POST", "/api/banners", Some(new_banner("Sale"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/api/banners/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Sale");

    let (status, trashed) = send(&app, "POST", &format!("/api/banners/{id}/trash"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!trashed["deleted_at"].is_null());

    let (_, active) = send(&app, "GET", "/api/banners/active", None).await;
    let (_, in_trash) = send(&app, "GET", "/api/banners/trashed", None).await;
    assert_eq!(active["total"], 0);
    assert_eq!(in_trash["total"], 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/banners/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/banners/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "BANNER_NOT_FOUND");
}

#[tokio::test]
async fn test_purging_an_active_banner_conflicts() {
    let dao = Arc::new(banner_dao());
    dao.seed(banner(1, "Sale")).await;
    let app = banner_app(dao.clone());

    let (status, body) = send(&app, "DELETE", "/api/banners/1", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    assert!(dao.get(1).await.is_some());
}

#[tokio::test]
async fn test_invalid_banner_is_rejected() {
    let dao = Arc::new(banner_dao());
    let app = banner_app(dao.clone());
    let mut body = new_banner("Sale");
    body["end_date"] = json!("2023-12-01");

    let (status, error) = send(&app, "POST", "/api/banners", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(dao.writes(), 0);
}

#[tokio::test]
async fn test_update_replaces_attributes() {
    let dao = Arc::new(banner_dao());
    dao.seed(banner(3, "Old")).await;
    let app = banner_app(dao);

    let (status, updated) = send(&app, "PUT", "/api/banners/3", Some(new_banner("New"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "New");
    let (_, fetched) = send(&app, "GET", "/api/banners/3", None).await;
    assert_eq!(fetched["name"], "New");
}

#[tokio::test]
async fn test_list_normalizes_paging() {
    let dao = Arc::new(banner_dao());
    for id in 1..=12 {
        dao.seed(banner(id, &format!("Banner {id}"))).await;
    }
    let app = banner_app(dao);

    let (status, page) = send(&app, "GET", "/api/banners?page=0&page_size=0", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 10);
    assert_eq!(page["total"], 12);
}

#[tokio::test]
async fn test_bulk_restore_reports_count() {
    let dao = Arc::new(banner_dao());
    for id in 1..=3 {
        let mut trashed = banner(id, "gone");
        trashed.deleted_at = Some(Utc::now());
        dao.seed(trashed).await;
    }
    let app = banner_app(dao);

    let (status, result) = send(&app, "POST", "/api/banners/restore-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, json!({"affected": 3}));

    let (_, result) = send(&app, "POST", "/api/banners/purge-all", None).await;
    assert_eq!(result, json!({"affected": 0}));
}

#[tokio::test]
async fn test_reviews_by_product() {
    let dao = Arc::new(review_dao());
    dao.seed(review(1, 10, 5)).await;
    dao.seed(review(2, 10, 3)).await;
    dao.seed(review(3, 11, 4)).await;
    let app = review_app(dao);

    send(&app, "POST", "/api/reviews/2/trash", None).await;
    let (status, page) = send(&app, "GET", "/api/reviews/product/10", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["id"], 1);
}
