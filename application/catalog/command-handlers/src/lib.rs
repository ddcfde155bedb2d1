use std::{fmt::Debug, sync::Arc, time::Duration};

use catalog_cache_keys::EntityCache;
use catalog_commands::Validate;
use catalog_errors::{CatalogError, CatalogResult};
use catalog_models::{CatalogEntity, Lifecycle};
use dao_utils::DaoError;
use database_traits::LifecycleDao;
use redis_connection::{CacheStore, DEFAULT_TTL};
use tracing::{info, instrument};

/// The only writer of catalog state.
///
/// Every store write that succeeds drops the record's point cache entry;
/// a failed write leaves the cache untouched. List entries are never
/// invalidated here and expire on their TTL.
pub struct LifecycleCommandHandler<D: LifecycleDao> {
    dao: Arc<D>,
    cache: EntityCache<D::Model>,
}

impl<D: LifecycleDao> Clone for LifecycleCommandHandler<D> {
    fn clone(&self) -> Self {
        Self {
            dao: self.dao.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<D> LifecycleCommandHandler<D>
where
    D: LifecycleDao<Error = DaoError>,
    D::Model: CatalogEntity,
{
    /// Longest a cached list or record may lag behind
    /// [`restore_all`](Self::restore_all) or [`purge_all`](Self::purge_all)
    /// under the default TTL. Bulk operations invalidate nothing.
    pub const BULK_STALENESS_BOUND: Duration = DEFAULT_TTL;
    const ENTITY: &'static str = <D::Model as CatalogEntity>::NAME;

    pub fn new(dao: Arc<D>, store: CacheStore) -> Self {
        Self {
            dao,
            cache: EntityCache::new(store),
        }
    }

    /// Staleness bound of bulk operations under the configured TTL.
    pub fn bulk_staleness_bound(&self) -> Duration { self.cache.ttl() }

    fn dao_error(operation: &'static str, id: Option<i64>, err: DaoError) -> CatalogError {
        CatalogError::from_dao(Self::ENTITY, operation, id, err)
    }

    fn require(
        record: &D::Model, state: Lifecycle, operation: &'static str,
    ) -> CatalogResult<()> {
        let current = record.lifecycle();
        if current != state {
            return Err(CatalogError::InvalidTransition {
                entity: Self::ENTITY,
                id: record.id(),
                state: current,
                operation,
            });
        }
        Ok(())
    }

    async fn load(&self, id: i64, operation: &'static str) -> CatalogResult<D::Model> {
        self.dao
            .find_by_id(id)
            .await
            .map_err(|e| Self::dao_error(operation, Some(id), e))
    }

    /// Error of a guarded transition. A row that still exists but no longer
    /// matched the guard was moved by a concurrent transition.
    async fn transition_error(
        &self, id: i64, operation: &'static str, err: DaoError,
    ) -> CatalogError {
        if !matches!(err, DaoError::NotFound) {
            return Self::dao_error(operation, Some(id), err);
        }
        match self.dao.find_by_id(id).await {
            Ok(current) => CatalogError::InvalidTransition {
                entity: Self::ENTITY,
                id,
                state: current.lifecycle(),
                operation,
            },
            Err(err) => Self::dao_error(operation, Some(id), err),
        }
    }

    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn create<C>(&self, command: C) -> CatalogResult<D::Model>
    where
        C: Validate<Valid = D::CreateRequest> + Debug,
    {
        let input = command.validate()?;
        let created = self
            .dao
            .create(input)
            .await
            .map_err(|e| Self::dao_error("create", None, e))?;

        info!(id = created.id(), "{} created", Self::ENTITY);
        Ok(created)
    }

    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn update<C>(&self, id: i64, command: C) -> CatalogResult<D::Model>
    where
        C: Validate<Valid = D::UpdateRequest> + Debug,
    {
        let input = command.validate()?;
        let updated = self
            .dao
            .update(id, input)
            .await
            .map_err(|e| Self::dao_error("update", Some(id), e))?;

        self.cache.delete_by_id(id).await;
        info!(id, "{} updated", Self::ENTITY);
        Ok(updated)
    }

    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn trash(&self, id: i64) -> CatalogResult<D::Model> {
        let current = self.load(id, "trash").await?;
        Self::require(&current, Lifecycle::Active, "trash")?;

        let trashed = match self.dao.trash(id).await {
            Ok(record) => record,
            Err(err) => return Err(self.transition_error(id, "trash", err).await),
        };

        self.cache.delete_by_id(id).await;
        info!(id, "{} trashed", Self::ENTITY);
        Ok(trashed)
    }

    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn restore(&self, id: i64) -> CatalogResult<D::Model> {
        let current = self.load(id, "restore").await?;
        Self::require(&current, Lifecycle::Trashed, "restore")?;

        let restored = match self.dao.restore(id).await {
            Ok(record) => record,
            Err(err) => return Err(self.transition_error(id, "restore", err).await),
        };

        self.cache.delete_by_id(id).await;
        info!(id, "{} restored", Self::ENTITY);
        Ok(restored)
    }

    /// Permanently removes a record. Only trashed records can be purged.
    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn purge(&self, id: i64) -> CatalogResult<()> {
        let current = self.load(id, "purge").await?;
        Self::require(&current, Lifecycle::Trashed, "purge")?;

        if let Err(err) = self.dao.purge(id).await {
            return Err(self.transition_error(id, "purge", err).await);
        }

        self.cache.delete_by_id(id).await;
        info!(id, "{} purged", Self::ENTITY);
        Ok(())
    }

    /// Restores every trashed record. Caches may stay stale for up to
    /// [`BULK_STALENESS_BOUND`](Self::BULK_STALENESS_BOUND).
    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn restore_all(&self) -> CatalogResult<u64> {
        let restored = self
            .dao
            .restore_all()
            .await
            .map_err(|e| Self::dao_error("restore all", None, e))?;

        info!(restored, "all trashed {} records restored", Self::ENTITY);
        Ok(restored)
    }

    /// Purges every trashed record. Caches may stay stale for up to
    /// [`BULK_STALENESS_BOUND`](Self::BULK_STALENESS_BOUND).
    #[instrument(skip(self), fields(entity = Self::ENTITY))]
    pub async fn purge_all(&self) -> CatalogResult<u64> {
        let purged = self
            .dao
            .purge_all()
            .await
            .map_err(|e| Self::dao_error("purge all", None, e))?;

        info!(purged, "all trashed {} records purged", Self::ENTITY);
        Ok(purged)
    }
}
