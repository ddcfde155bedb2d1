use std::{borrow::Cow, marker::PhantomData};

use catalog_models::{CatalogEntity, PagedResult, ParentScoped};
use database_traits::{ListView, PageRequest};
use redis_connection::core::{CacheKey, CacheTypeBind};

/// `<entity>:<view>:page:<page>:pageSize:<size>:search:<term>`
pub struct ListCacheKey<E> {
    view: ListView,
    __phantom: PhantomData<fn() -> E>,
}

impl<E> ListCacheKey<E> {
    pub fn new(view: ListView) -> Self {
        Self {
            view,
            __phantom: PhantomData,
        }
    }
}

impl<E: CatalogEntity> CacheKey for ListCacheKey<E> {
    type Args<'r> = (&'r PageRequest,);

    fn get_key_with_args(&self, (page,): Self::Args<'_>) -> Cow<'static, str> {
        format!(
            "{}:{}:page:{}:pageSize:{}:search:{}",
            E::NAME,
            self.view.as_str(),
            page.page,
            page.page_size,
            page.search
        )
        .into()
    }
}

impl<E: CatalogEntity> CacheTypeBind for ListCacheKey<E> {
    type Value = PagedResult<E>;
}

/// `<entity>:id:<id>`
pub struct IdCacheKey<E>(PhantomData<fn() -> E>);

impl<E> IdCacheKey<E> {
    pub fn new() -> Self { Self(PhantomData) }
}

impl<E> Default for IdCacheKey<E> {
    fn default() -> Self { Self::new() }
}

impl<E: CatalogEntity> CacheKey for IdCacheKey<E> {
    type Args<'r> = (&'r i64,);

    fn get_key_with_args(&self, (id,): Self::Args<'_>) -> Cow<'static, str> {
        format!("{}:id:{}", E::NAME, id).into()
    }
}

impl<E: CatalogEntity> CacheTypeBind for IdCacheKey<E> {
    type Value = E;
}

/// `<entity>:<parent>:<parent id>:page:<page>:pageSize:<size>:search:<term>`
pub struct ParentListCacheKey<E>(PhantomData<fn() -> E>);

impl<E> ParentListCacheKey<E> {
    pub fn new() -> Self { Self(PhantomData) }
}

impl<E> Default for ParentListCacheKey<E> {
    fn default() -> Self { Self::new() }
}

impl<E: ParentScoped> CacheKey for ParentListCacheKey<E> {
    type Args<'r> = (&'r i64, &'r PageRequest);

    fn get_key_with_args(
        &self, (parent_id, page): Self::Args<'_>,
    ) -> Cow<'static, str> {
        format!(
            "{}:{}:{}:page:{}:pageSize:{}:search:{}",
            E::NAME,
            E::PARENT,
            parent_id,
            page.page,
            page.page_size,
            page.search
        )
        .into()
    }
}

impl<E: ParentScoped> CacheTypeBind for ParentListCacheKey<E> {
    type Value = PagedResult<E>;
}
