use catalog_commands::CategoryInput;
use catalog_models::Category;
use dao_utils::query_helpers::PgParam;
use tokio_postgres::Row;

use crate::entity::SqlEntity;

impl SqlEntity for Category {
    type Create = CategoryInput;
    type Update = CategoryInput;

    const COLUMNS: &'static str =
        "id, name, description, slug, created_at, updated_at, deleted_at";
    const INSERT: &'static str = "INSERT INTO categories (name, description, slug) VALUES ($1, \
                                  $2, $3) RETURNING id, name, description, slug, created_at, \
                                  updated_at, deleted_at";
    const SEARCH_COLUMN: &'static str = "name";
    const TABLE: &'static str = "categories";
    const UPDATE: &'static str = "UPDATE categories SET name = $2, description = $3, slug = $4, \
                                  updated_at = NOW() WHERE id = $1 RETURNING id, name, \
                                  description, slug, created_at, updated_at, deleted_at";

    fn from_row(row: &Row) -> Self {
        Category {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            slug: row.get("slug"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }

    fn create_params(req: &CategoryInput) -> Vec<&PgParam> {
        vec![&req.name as &PgParam, &req.description, &req.slug]
    }

    fn update_params(req: &CategoryInput) -> Vec<&PgParam> { Self::create_params(req) }
}
