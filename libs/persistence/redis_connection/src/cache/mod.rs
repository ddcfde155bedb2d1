pub mod memory;
pub mod redis_cache;
pub mod r#trait;

pub use memory::MemoryCache;
pub use r#trait::{CacheBackend, CacheError, CacheResult};
pub use redis_cache::RedisCache;
