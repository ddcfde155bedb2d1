use std::{fmt::Debug, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use catalog_command_handlers::LifecycleCommandHandler;
use catalog_commands::Validate;
use catalog_models::{CatalogEntity, PagedResult, ParentScoped};
use catalog_query_handlers::EntityQueryHandler;
use common_errors::AppError;
use dao_utils::DaoError;
use database_traits::{LifecycleDao, PageRequest, ParentScopedDao};
use redis_connection::CacheStore;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;
use utoipa::ToSchema;

/// Command and query side of one entity, shared by its routes.
pub struct CatalogServices<D: LifecycleDao> {
    pub commands: LifecycleCommandHandler<D>,
    pub queries: EntityQueryHandler<D>,
}

impl<D: LifecycleDao> Clone for CatalogServices<D> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            queries: self.queries.clone(),
        }
    }
}

impl<D> CatalogServices<D>
where
    D: LifecycleDao<Error = DaoError>,
    D::Model: CatalogEntity,
{
    pub fn new(dao: Arc<D>, store: CacheStore) -> Self {
        Self {
            commands: LifecycleCommandHandler::new(dao.clone(), store.clone()),
            queries: EntityQueryHandler::new(dao, store),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkResult {
    pub affected: u64,
}

/// Routes of one entity, relative to its mount point.
///
/// | Method | Path | Operation |
/// |---|---|---|
/// | GET | `/` | all rows |
/// | GET | `/active`, `/trashed` | one lifecycle state |
/// | GET | `/{id}` | one row in either state |
/// | POST | `/` | create |
/// | PUT | `/{id}` | update |
/// | POST | `/{id}/trash`, `/{id}/restore` | transition |
/// | DELETE | `/{id}` | purge a trashed row |
/// | POST | `/restore-all`, `/purge-all` | bulk transition |
pub fn lifecycle_routes<D, C, U>() -> Router<CatalogServices<D>>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
    C: Validate<Valid = D::CreateRequest> + DeserializeOwned + Debug + Send + 'static,
    U: Validate<Valid = D::UpdateRequest> + DeserializeOwned + Debug + Send + 'static,
{
    Router::new()
        .route("/", get(find_all::<D>).post(create::<D, C>))
        .route("/active", get(find_active::<D>))
        .route("/trashed", get(find_trashed::<D>))
        .route("/restore-all", post(restore_all::<D>))
        .route("/purge-all", post(purge_all::<D>))
        .route(
            "/{id}",
            get(find_by_id::<D>)
                .put(update::<D, U>)
                .delete(purge::<D>),
        )
        .route("/{id}/trash", post(trash::<D>))
        .route("/{id}/restore", post(restore::<D>))
}

/// `GET /{parent}/{parent_id}`: active rows of one parent, e.g.
/// `/product/7` for reviews.
pub fn parent_routes<D>() -> Router<CatalogServices<D>>
where
    D: ParentScopedDao<Error = DaoError> + 'static,
    D::Model: ParentScoped,
{
    let path = format!("/{}/{{parent_id}}", <D::Model as ParentScoped>::PARENT);
    Router::new().route(&path, get(find_by_parent::<D>))
}

type ListResponse<D> = Result<Json<PagedResult<<D as LifecycleDao>::Model>>, AppError>;
type ItemResponse<D> = Result<Json<<D as LifecycleDao>::Model>, AppError>;

async fn find_all<D>(
    State(services): State<CatalogServices<D>>, Query(page): Query<PageRequest>,
) -> ListResponse<D>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    Ok(Json(services.queries.find_all(page).await?))
}

async fn find_active<D>(
    State(services): State<CatalogServices<D>>, Query(page): Query<PageRequest>,
) -> ListResponse<D>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    Ok(Json(services.queries.find_active(page).await?))
}

async fn find_trashed<D>(
    State(services): State<CatalogServices<D>>, Query(page): Query<PageRequest>,
) -> ListResponse<D>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    Ok(Json(services.queries.find_trashed(page).await?))
}

async fn find_by_id<D>(
    State(services): State<CatalogServices<D>>, Path(id): Path<i64>,
) -> ItemResponse<D>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    Ok(Json(services.queries.find_by_id(id).await?))
}

async fn find_by_parent<D>(
    State(services): State<CatalogServices<D>>, Path(parent_id): Path<i64>,
    Query(page): Query<PageRequest>,
) -> ListResponse<D>
where
    D: ParentScopedDao<Error = DaoError> + 'static,
    D::Model: ParentScoped,
{
    Ok(Json(services.queries.find_by_parent(parent_id, page).await?))
}

#[instrument(skip_all)]
async fn create<D, C>(
    State(services): State<CatalogServices<D>>, Json(command): Json<C>,
) -> Result<(StatusCode, Json<D::Model>), AppError>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
    C: Validate<Valid = D::CreateRequest> + Debug + Send,
{
    let created = services.commands.create(command).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(services, command))]
async fn update<D, U>(
    State(services): State<CatalogServices<D>>, Path(id): Path<i64>, Json(command): Json<U>,
) -> ItemResponse<D>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
    U: Validate<Valid = D::UpdateRequest> + Debug + Send,
{
    Ok(Json(services.commands.update(id, command).await?))
}

async fn trash<D>(
    State(services): State<CatalogServices<D>>, Path(id): Path<i64>,
) -> ItemResponse<D>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    Ok(Json(services.commands.trash(id).await?))
}

async fn restore<D>(
    State(services): State<CatalogServices<D>>, Path(id): Path<i64>,
) -> ItemResponse<D>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    Ok(Json(services.commands.restore(id).await?))
}

async fn purge<D>(
    State(services): State<CatalogServices<D>>, Path(id): Path<i64>,
) -> Result<StatusCode, AppError>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    services.commands.purge(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn restore_all<D>(
    State(services): State<CatalogServices<D>>,
) -> Result<Json<BulkResult>, AppError>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    let affected = services.commands.restore_all().await?;
    Ok(Json(BulkResult { affected }))
}

async fn purge_all<D>(
    State(services): State<CatalogServices<D>>,
) -> Result<Json<BulkResult>, AppError>
where
    D: LifecycleDao<Error = DaoError> + 'static,
    D::Model: CatalogEntity,
{
    let affected = services.commands.purge_all().await?;
    Ok(Json(BulkResult { affected }))
}
