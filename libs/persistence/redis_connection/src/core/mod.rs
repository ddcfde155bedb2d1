pub mod key;
pub mod type_bind;
pub mod value;

pub use key::{CacheKey, CacheKeyArg1, CacheKeyAutoConstruct};
pub use type_bind::{CacheTypeBind, Cached};
pub use value::Json;
