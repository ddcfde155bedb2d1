mod facade;
mod keys;

pub use facade::EntityCache;
pub use keys::{IdCacheKey, ListCacheKey, ParentListCacheKey};
