use std::{marker::PhantomData, time::Duration};

use catalog_models::{CatalogEntity, PagedResult, ParentScoped};
use database_traits::{ListView, PageRequest};
use redis_connection::{
    CacheStore,
    core::{CacheKey, CacheTypeBind},
};

use crate::keys::{IdCacheKey, ListCacheKey, ParentListCacheKey};

/// Cache façade of one entity type.
///
/// Lists are stored as a `{data, total}` envelope and single records as the
/// bare record. An envelope is always stored complete, so an empty result
/// is a hit and never looks like "not cached".
pub struct EntityCache<E> {
    store: CacheStore,
    ttl: Duration,
    __phantom: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityCache<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            ttl: self.ttl,
            __phantom: PhantomData,
        }
    }
}

impl<E: CatalogEntity> EntityCache<E> {
    pub fn new(store: CacheStore) -> Self {
        let ttl = store.default_ttl();
        Self {
            store,
            ttl,
            __phantom: PhantomData,
        }
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    pub fn list_key(&self, view: ListView, page: &PageRequest) -> String {
        let page = page.clone().normalized();
        ListCacheKey::<E>::new(view)
            .get_key_with_args((&page,))
            .into_owned()
    }

    pub fn id_key(&self, id: i64) -> String {
        IdCacheKey::<E>::new().get_key_with_args((&id,)).into_owned()
    }

    pub async fn get_list(
        &self, view: ListView, page: &PageRequest,
    ) -> Option<PagedResult<E>> {
        let page = page.clone().normalized();
        ListCacheKey::<E>::new(view)
            .bind_with_args(&self.store, (&page,))
            .try_get()
            .await
    }

    pub async fn set_list(
        &self, view: ListView, page: &PageRequest, data: Option<Vec<E>>,
        total: Option<i64>,
    ) {
        let page = page.clone().normalized();
        ListCacheKey::<E>::new(view)
            .bind_with_args(&self.store, (&page,))
            .set_with_expire(&PagedResult::new(data, total), self.ttl)
            .await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<E> {
        IdCacheKey::<E>::new().bind_with(&self.store, &id).try_get().await
    }

    /// `None` is never cached.
    pub async fn set_by_id(&self, entity: Option<&E>) {
        let Some(entity) = entity
        else {
            return;
        };
        IdCacheKey::<E>::new()
            .bind_with(&self.store, &entity.id())
            .set_with_expire(entity, self.ttl)
            .await
    }

    pub async fn delete_by_id(&self, id: i64) {
        IdCacheKey::<E>::new().bind_with(&self.store, &id).remove().await
    }
}

impl<E: ParentScoped> EntityCache<E> {
    pub fn parent_key(&self, parent_id: i64, page: &PageRequest) -> String {
        let page = page.clone().normalized();
        ParentListCacheKey::<E>::new()
            .get_key_with_args((&parent_id, &page))
            .into_owned()
    }

    pub async fn get_by_parent(
        &self, parent_id: i64, page: &PageRequest,
    ) -> Option<PagedResult<E>> {
        let page = page.clone().normalized();
        ParentListCacheKey::<E>::new()
            .bind_with_args(&self.store, (&parent_id, &page))
            .try_get()
            .await
    }

    pub async fn set_by_parent(
        &self, parent_id: i64, page: &PageRequest, data: Option<Vec<E>>,
        total: Option<i64>,
    ) {
        let page = page.clone().normalized();
        ParentListCacheKey::<E>::new()
            .bind_with_args(&self.store, (&parent_id, &page))
            .set_with_expire(&PagedResult::new(data, total), self.ttl)
            .await
    }
}
