/// Declares a typed cache key with a fixed format.
///
/// ```ignore
/// cache_key!(UserRoleNamesCacheKey::<Vec<String>> => "role:user:{}"[user_id: i64]);
/// cache_key!(RoleCountCacheKey::<i64> => "role:count");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($name:ident::<$t:ty> => $format_key:literal[$($arg:ident:$ty:ty),*]) => {
        #[doc=concat!(concat!("Cache key binding\n ## Key \n", $format_key), concat!("\n ## Value Type \n ", stringify!($t)))]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ($(&'r $ty,)*);

            fn get_key_with_args(&self, args: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                let ($($arg,)*) = args;

                (format!($format_key, $($arg),*)).into()
            }
        }

        impl $crate::core::type_bind::CacheTypeBind for $name {
            type Value = $t;
        }
    };
    ($name:ident::<$t:ty> => $key:literal) => {
        #[doc=concat!(concat!("Cache key binding\n ## Key \n", $key), concat!("\n ## Value Type \n ", stringify!($t)))]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ();

            fn get_key_with_args(&self, _: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                ($key).into()
            }
        }

        impl $crate::core::type_bind::CacheTypeBind for $name {
            type Value = $t;
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{
        config::MemoryConfig,
        core::{CacheKey, CacheTypeBind},
        store::CacheStore,
    };

    cache_key!(SampleCacheKey::<Vec<String>> => "sample:{}:{}"[owner: i64, kind: String]);
    cache_key!(SampleCountCacheKey::<i64> => "sample:count");

    #[test]
    fn test_formatted_key() {
        let key = SampleCacheKey.get_key_with_args((&3, &"x".to_string()));
        assert_eq!(key, "sample:3:x");
    }

    #[test]
    fn test_fixed_key() {
        assert_eq!(SampleCountCacheKey.get_key(), "sample:count");
    }

    #[tokio::test]
    async fn test_bound_entry_roundtrip() {
        let store = CacheStore::memory(MemoryConfig::default());
        let cache = SampleCountCacheKey.bind(&store);

        assert_eq!(cache.try_get().await, None);
        cache.set(&42).await;
        assert_eq!(cache.try_get().await, Some(42));
        cache.remove().await;
        assert_eq!(cache.try_get().await, None);
    }
}
