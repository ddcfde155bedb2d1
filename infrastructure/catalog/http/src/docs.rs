use catalog_commands::{
    CreateBannerCommand, CreateCategoryCommand, CreateReviewCommand, CreateRoleCommand,
    UpdateBannerCommand, UpdateCategoryCommand, UpdateReviewCommand, UpdateRoleCommand,
};
use catalog_models::{Banner, Category, Review, Role};
use common_errors::{ApiErrorInfo, ApiErrorResponse};
use utoipa::OpenApi;

use crate::BulkResult;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            Banner,
            Category,
            Role,
            Review,
            CreateBannerCommand,
            UpdateBannerCommand,
            CreateCategoryCommand,
            UpdateCategoryCommand,
            CreateRoleCommand,
            UpdateRoleCommand,
            CreateReviewCommand,
            UpdateReviewCommand,
            BulkResult,
            ApiErrorResponse,
            ApiErrorInfo,
        )
    ),
    tags(
        (name = "banners", description = "Banner management endpoints"),
        (name = "categories", description = "Category management endpoints"),
        (name = "roles", description = "Role management endpoints"),
        (name = "reviews", description = "Product review endpoints")
    ),
    info(
        title = "Catalog API",
        description = "Catalog services with cache-aside reads and soft delete",
        version = "1.0.0"
    )
)]
pub struct CatalogApiDoc;
