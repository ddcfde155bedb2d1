use async_trait::async_trait;
use catalog_commands::{ReviewChanges, ReviewInput};
use catalog_models::Review;
use dao_utils::{
    DaoError,
    pagination::page_params,
    query_helpers::{PgParam, counted_rows},
};
use database_traits::{Counted, ListView, PageRequest, ParentScopedDao};
use tokio_postgres::Row;
use tracing::instrument;

use crate::{entity::SqlEntity, lifecycle::PgLifecycleDao};

impl SqlEntity for Review {
    type Create = ReviewInput;
    type Update = ReviewChanges;

    const COLUMNS: &'static str = "id, product_id, user_id, name, comment, rating, created_at, \
                                   updated_at, deleted_at";
    const INSERT: &'static str = "INSERT INTO reviews (product_id, user_id, name, comment, \
                                  rating) VALUES ($1, $2, $3, $4, $5) RETURNING id, \
                                  product_id, user_id, name, comment, rating, created_at, \
                                  updated_at, deleted_at";
    const ORDER_BY: &'static str = "created_at DESC, id DESC";
    const SEARCH_COLUMN: &'static str = "comment";
    const TABLE: &'static str = "reviews";
    const UPDATE: &'static str = "UPDATE reviews SET name = $2, comment = $3, rating = $4, \
                                  updated_at = NOW() WHERE id = $1 RETURNING id, product_id, \
                                  user_id, name, comment, rating, created_at, updated_at, \
                                  deleted_at";

    fn from_row(row: &Row) -> Self {
        Review {
            id: row.get("id"),
            product_id: row.get("product_id"),
            user_id: row.get("user_id"),
            name: row.get("name"),
            comment: row.get("comment"),
            rating: row.get("rating"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }

    fn create_params(req: &ReviewInput) -> Vec<&PgParam> {
        vec![
            &req.product_id as &PgParam,
            &req.user_id,
            &req.name,
            &req.comment,
            &req.rating,
        ]
    }

    fn update_params(req: &ReviewChanges) -> Vec<&PgParam> {
        vec![&req.name as &PgParam, &req.comment, &req.rating]
    }
}

#[async_trait]
impl ParentScopedDao for PgLifecycleDao<Review> {
    #[instrument(skip(self))]
    async fn find_by_parent(
        &self, product_id: i64, page: &PageRequest,
    ) -> Result<Vec<Counted<Review>>, DaoError> {
        let client = self.db().get_client().await?;
        let sql = Review::list_query().build_for_parent(ListView::Active, "product_id");
        let stmt = client.prepare_cached(&sql).await?;
        let (search, limit, offset) = page_params(page);

        let rows = client
            .query(&stmt, &[&search, &limit, &offset, &product_id])
            .await?;

        Ok(counted_rows(&rows, Review::from_row))
    }
}
