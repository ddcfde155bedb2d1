pub mod error_handling;
pub mod pagination;
pub mod query_helpers;

pub use error_handling::{DaoError, DaoResultExt};
