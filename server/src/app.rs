use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use catalog_commands::{
    CreateBannerCommand, CreateCategoryCommand, CreateReviewCommand, CreateRoleCommand,
    UpdateBannerCommand, UpdateCategoryCommand, UpdateReviewCommand, UpdateRoleCommand,
};
use catalog_dao::{BannerDao, CategoryDao, ReviewDao, RoleDao};
use catalog_http::{CatalogApiDoc, CatalogServices, lifecycle_routes, parent_routes};
use messaging::Broker;
use redis_connection::CacheStore;
use serde_json::json;
use sql_connection::SqlConnect;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Per-entity services sharing one database handle and one cache.
#[derive(Clone)]
pub struct Services {
    pub banners: CatalogServices<BannerDao>,
    pub categories: CatalogServices<CategoryDao>,
    pub roles: CatalogServices<RoleDao>,
    pub reviews: CatalogServices<ReviewDao>,
}

impl Services {
    pub fn new(db: SqlConnect, store: CacheStore) -> Self {
        Self {
            banners: CatalogServices::new(Arc::new(BannerDao::new(db.clone())), store.clone()),
            categories: CatalogServices::new(
                Arc::new(CategoryDao::new(db.clone())),
                store.clone(),
            ),
            roles: CatalogServices::new(Arc::new(RoleDao::new(db.clone())), store.clone()),
            reviews: CatalogServices::new(Arc::new(ReviewDao::new(db)), store),
        }
    }
}

#[derive(Clone)]
pub struct HealthState {
    pub db: SqlConnect,
    pub store: CacheStore,
    pub broker: Arc<dyn Broker>,
}

pub fn router(services: Services, health: HealthState) -> Router {
    let api = Router::new()
        .nest(
            "/api/banners",
            lifecycle_routes::<BannerDao, CreateBannerCommand, UpdateBannerCommand>()
                .with_state(services.banners),
        )
        .nest(
            "/api/categories",
            lifecycle_routes::<CategoryDao, CreateCategoryCommand, UpdateCategoryCommand>()
                .with_state(services.categories),
        )
        .nest(
            "/api/roles",
            lifecycle_routes::<RoleDao, CreateRoleCommand, UpdateRoleCommand>()
                .with_state(services.roles),
        )
        .nest(
            "/api/reviews",
            lifecycle_routes::<ReviewDao, CreateReviewCommand, UpdateReviewCommand>()
                .merge(parent_routes::<ReviewDao>())
                .with_state(services.reviews),
        );

    Router::new()
        .route("/health", get(health_check))
        .with_state(health)
        .merge(api)
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(CatalogApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check(State(health): State<HealthState>) -> impl IntoResponse {
    let (available, size) = health.db.get_pool_status();

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "database": { "available": available, "size": size },
            "cache": health.store.backend_name(),
            "broker": health.broker.name(),
        })),
    )
}
