use std::{borrow::Cow, marker::PhantomData, time::Duration};

use serde::{Serialize, de::DeserializeOwned};

use super::key::{CacheKey, CacheKeyArg1, CacheKeyAutoConstruct};
use crate::store::CacheStore;

/// A cache entry handle: one resolved key bound to one value type.
pub struct Cached<'store, T> {
    store: &'store CacheStore,
    key: Cow<'static, str>,
    __phantom: PhantomData<T>,
}

impl<'store, T> Cached<'store, T> {
    pub fn new(store: &'store CacheStore, key: Cow<'static, str>) -> Self {
        Self {
            store,
            key,
            __phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &str { &self.key }
}

impl<T> Cached<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn try_get(&self) -> Option<T> { self.store.get(&self.key).await }

    pub async fn set_with_expire(&self, value: &T, duration: Duration) {
        self.store.set(&self.key, value, duration).await
    }

    pub async fn set(&self, value: &T) {
        self.store.set_default(&self.key, value).await
    }

    pub async fn remove(&self) { self.store.delete(&self.key).await }
}

/// Binds a [`CacheKey`] to the type of value stored under it.
pub trait CacheTypeBind: CacheKey {
    type Value: Serialize + DeserializeOwned + Send + Sync;

    fn bind_with_args<'store>(
        &self, store: &'store CacheStore, args: <Self as CacheKey>::Args<'_>,
    ) -> Cached<'store, Self::Value> {
        let key = CacheKey::get_key_with_args(self, args);
        Cached::new(store, key)
    }

    fn bind_with<'store>(
        &self, store: &'store CacheStore,
        arg: <<Self as CacheKey>::Args<'_> as CacheKeyArg1>::Arg0,
    ) -> Cached<'store, Self::Value>
    where
        for<'r> <Self as CacheKey>::Args<'r>: CacheKeyArg1,
    {
        CacheTypeBind::bind_with_args(
            self,
            store,
            <<Self as CacheKey>::Args<'_> as CacheKeyArg1>::construct(arg),
        )
    }

    fn bind<'store>(
        &self, store: &'store CacheStore,
    ) -> Cached<'store, Self::Value>
    where
        for<'r> <Self as CacheKey>::Args<'r>: CacheKeyAutoConstruct,
    {
        CacheTypeBind::bind_with_args(
            self,
            store,
            CacheKeyAutoConstruct::construct(),
        )
    }
}
