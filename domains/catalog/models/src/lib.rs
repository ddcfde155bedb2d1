mod banner;
mod category;
mod paged;
mod review;
mod role;

use std::fmt;

pub use banner::Banner;
pub use category::Category;
use chrono::{DateTime, Utc};
pub use paged::PagedResult;
pub use review::Review;
pub use role::Role;
use serde::{Serialize, de::DeserializeOwned};

/// Lifecycle state of a stored record. Purged records no longer exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Trashed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Active => f.write_str("active"),
            Lifecycle::Trashed => f.write_str("trashed"),
        }
    }
}

/// A soft-deletable catalog record.
///
/// `NAME` is the entity segment of every cache key built for the type, so
/// it must be unique across entities.
pub trait CatalogEntity:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    const NAME: &'static str;

    fn id(&self) -> i64;

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>);

    /// Text a listing's search term is matched against.
    fn search_text(&self) -> &str;

    fn lifecycle(&self) -> Lifecycle {
        match self.deleted_at() {
            None => Lifecycle::Active,
            Some(_) => Lifecycle::Trashed,
        }
    }
}

/// A record listed per owning parent, e.g. reviews per product.
pub trait ParentScoped: CatalogEntity {
    /// Parent segment of the cache key, e.g. `product`.
    const PARENT: &'static str;

    fn parent_id(&self) -> i64;
}
