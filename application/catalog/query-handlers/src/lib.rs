use std::sync::Arc;

use catalog_cache_keys::EntityCache;
use catalog_errors::{CatalogError, CatalogResult};
use catalog_models::{CatalogEntity, PagedResult, ParentScoped};
use dao_utils::DaoError;
use database_traits::{Counted, LifecycleDao, ListView, PageRequest, ParentScopedDao, total_of};
use redis_connection::CacheStore;
use tracing::{debug, instrument};

/// Read path of one entity: cache first, store on a miss, then repopulate.
pub struct EntityQueryHandler<D: LifecycleDao> {
    dao: Arc<D>,
    cache: EntityCache<D::Model>,
}

impl<D: LifecycleDao> Clone for EntityQueryHandler<D> {
    fn clone(&self) -> Self {
        Self {
            dao: self.dao.clone(),
            cache: self.cache.clone(),
        }
    }
}

fn into_page<M>(rows: Vec<Counted<M>>) -> (Vec<M>, i64) {
    let total = total_of(&rows);
    (rows.into_iter().map(|row| row.item).collect(), total)
}

impl<D> EntityQueryHandler<D>
where
    D: LifecycleDao<Error = DaoError>,
    D::Model: CatalogEntity,
{
    const ENTITY: &'static str = <D::Model as CatalogEntity>::NAME;

    pub fn new(dao: Arc<D>, store: CacheStore) -> Self {
        Self {
            dao,
            cache: EntityCache::new(store),
        }
    }

    pub async fn find_all(&self, page: PageRequest) -> CatalogResult<PagedResult<D::Model>> {
        self.find_list(ListView::All, page).await
    }

    pub async fn find_active(
        &self, page: PageRequest,
    ) -> CatalogResult<PagedResult<D::Model>> {
        self.find_list(ListView::Active, page).await
    }

    pub async fn find_trashed(
        &self, page: PageRequest,
    ) -> CatalogResult<PagedResult<D::Model>> {
        self.find_list(ListView::Trashed, page).await
    }

    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    async fn find_list(
        &self, view: ListView, page: PageRequest,
    ) -> CatalogResult<PagedResult<D::Model>> {
        let page = page.normalized();

        if let Some(cached) = self.cache.get_list(view, &page).await {
            debug!("Cache hit for {} {} list", Self::ENTITY, view.as_str());
            return Ok(cached);
        }

        debug!(
            "Cache miss for {} {} list, fetching from DB",
            Self::ENTITY,
            view.as_str()
        );

        let rows = match view {
            ListView::All => self.dao.find_all(&page).await,
            ListView::Active => self.dao.find_active(&page).await,
            ListView::Trashed => self.dao.find_trashed(&page).await,
        }
        .map_err(|e| CatalogError::from_dao(Self::ENTITY, "list", None, e))?;

        let (data, total) = into_page(rows);
        self.cache
            .set_list(view, &page, Some(data.clone()), Some(total))
            .await;

        Ok(PagedResult::new(Some(data), Some(total)))
    }

    /// Finds a record whether it is active or trashed.
    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn find_by_id(&self, id: i64) -> CatalogResult<D::Model> {
        if let Some(cached) = self.cache.get_by_id(id).await {
            debug!("Cache hit for {} {}", Self::ENTITY, id);
            return Ok(cached);
        }

        debug!("Cache miss for {} {}, fetching from DB", Self::ENTITY, id);

        let record = self
            .dao
            .find_by_id(id)
            .await
            .map_err(|e| CatalogError::from_dao(Self::ENTITY, "find", Some(id), e))?;

        self.cache.set_by_id(Some(&record)).await;
        Ok(record)
    }
}

impl<D> EntityQueryHandler<D>
where
    D: ParentScopedDao<Error = DaoError>,
    D::Model: ParentScoped,
{
    /// Active records of one parent.
    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn find_by_parent(
        &self, parent_id: i64, page: PageRequest,
    ) -> CatalogResult<PagedResult<D::Model>> {
        let page = page.normalized();

        if let Some(cached) = self.cache.get_by_parent(parent_id, &page).await {
            debug!("Cache hit for {} of parent {}", Self::ENTITY, parent_id);
            return Ok(cached);
        }

        let rows = self
            .dao
            .find_by_parent(parent_id, &page)
            .await
            .map_err(|e| CatalogError::from_dao(Self::ENTITY, "list by parent", None, e))?;

        let (data, total) = into_page(rows);
        self.cache
            .set_by_parent(parent_id, &page, Some(data.clone()), Some(total))
            .await;

        Ok(PagedResult::new(Some(data), Some(total)))
    }
}
