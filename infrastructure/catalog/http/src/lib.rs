//! HTTP surface of the catalog services.

mod docs;
mod lifecycle;

pub use docs::CatalogApiDoc;
pub use lifecycle::{BulkResult, CatalogServices, lifecycle_routes, parent_routes};
