//! PostgreSQL repositories for the catalog entities.

mod banner;
mod category;
mod entity;
mod lifecycle;
mod review;
mod role;

use catalog_models::{Banner, Category, Review, Role};
use sql_connection::Migration;

pub use entity::SqlEntity;
pub use lifecycle::PgLifecycleDao;

pub type BannerDao = PgLifecycleDao<Banner>;
pub type CategoryDao = PgLifecycleDao<Category>;
pub type RoleDao = PgLifecycleDao<Role>;
pub type ReviewDao = PgLifecycleDao<Review>;

pub const MIGRATIONS: &[Migration] = &[Migration {
    name: "0001_catalog",
    sql: include_str!("../migrations/0001_catalog.sql"),
}];
