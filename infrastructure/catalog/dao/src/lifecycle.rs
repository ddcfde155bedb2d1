use std::marker::PhantomData;

use async_trait::async_trait;
use dao_utils::{
    DaoError, DaoResultExt,
    pagination::page_params,
    query_helpers::{PgParam, counted_rows},
};
use database_traits::{Counted, LifecycleDao, ListView, PageRequest};
use sql_connection::SqlConnect;
use tracing::{debug, instrument};

use crate::entity::SqlEntity;

/// Lifecycle repository over one entity table.
///
/// Every transition is a single statement guarded by the `deleted_at`
/// predicate, so of two concurrent `trash` calls on one row only one
/// matches it, and `purge` never removes an active row.
pub struct PgLifecycleDao<M> {
    db: SqlConnect,
    __phantom: PhantomData<fn() -> M>,
}

impl<M> Clone for PgLifecycleDao<M> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            __phantom: PhantomData,
        }
    }
}

impl<M: SqlEntity> PgLifecycleDao<M> {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            db,
            __phantom: PhantomData,
        }
    }

    pub fn db(&self) -> &SqlConnect { &self.db }

    pub(crate) async fn list(
        &self, view: ListView, page: &PageRequest,
    ) -> Result<Vec<Counted<M>>, DaoError> {
        let client = self.db.get_client().await?;
        let stmt = client.prepare_cached(&M::list_query().build(view)).await?;
        let (search, limit, offset) = page_params(page);

        let rows = client.query(&stmt, &[&search, &limit, &offset]).await?;
        debug!(table = M::TABLE, rows = rows.len(), "page loaded");

        Ok(counted_rows(&rows, M::from_row))
    }

    /// Runs a statement expected to return at most one entity row.
    pub(crate) async fn returning_one(
        &self, sql: &str, params: &[&PgParam],
    ) -> Result<M, DaoError> {
        let client = self.db.get_client().await?;
        let stmt = client.prepare_cached(sql).await?;
        let row = client.query_opt(&stmt, params).await?;

        Ok(row.map(|row| M::from_row(&row))).or_not_found()
    }

    async fn execute(&self, sql: &str, params: &[&PgParam]) -> Result<u64, DaoError> {
        let client = self.db.get_client().await?;
        let stmt = client.prepare_cached(sql).await?;
        Ok(client.execute(&stmt, params).await?)
    }
}

#[async_trait]
impl<M: SqlEntity> LifecycleDao for PgLifecycleDao<M> {
    type CreateRequest = M::Create;
    type Error = DaoError;
    type Model = M;
    type UpdateRequest = M::Update;

    async fn find_all(&self, page: &PageRequest) -> Result<Vec<Counted<M>>, DaoError> {
        self.list(ListView::All, page).await
    }

    async fn find_active(&self, page: &PageRequest) -> Result<Vec<Counted<M>>, DaoError> {
        self.list(ListView::Active, page).await
    }

    async fn find_trashed(&self, page: &PageRequest) -> Result<Vec<Counted<M>>, DaoError> {
        self.list(ListView::Trashed, page).await
    }

    #[instrument(skip(self), fields(table = M::TABLE))]
    async fn find_by_id(&self, id: i64) -> Result<M, DaoError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", M::COLUMNS, M::TABLE);
        self.returning_one(&sql, &[&id]).await
    }

    #[instrument(skip_all, fields(table = M::TABLE))]
    async fn create(&self, req: M::Create) -> Result<M, DaoError> {
        self.returning_one(M::INSERT, &M::create_params(&req)).await
    }

    #[instrument(skip(self, req), fields(table = M::TABLE))]
    async fn update(&self, id: i64, req: M::Update) -> Result<M, DaoError> {
        let mut params: Vec<&PgParam> = vec![&id as &PgParam];
        params.extend(M::update_params(&req));

        self.returning_one(M::UPDATE, &params).await
    }

    #[instrument(skip(self), fields(table = M::TABLE))]
    async fn trash(&self, id: i64) -> Result<M, DaoError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND \
             deleted_at IS NULL RETURNING {}",
            M::TABLE,
            M::COLUMNS
        );
        self.returning_one(&sql, &[&id]).await
    }

    #[instrument(skip(self), fields(table = M::TABLE))]
    async fn restore(&self, id: i64) -> Result<M, DaoError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = NULL, updated_at = NOW() WHERE id = $1 AND \
             deleted_at IS NOT NULL RETURNING {}",
            M::TABLE,
            M::COLUMNS
        );
        self.returning_one(&sql, &[&id]).await
    }

    #[instrument(skip(self), fields(table = M::TABLE))]
    async fn purge(&self, id: i64) -> Result<(), DaoError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND deleted_at IS NOT NULL",
            M::TABLE
        );

        match self.execute(&sql, &[&id]).await? {
            0 => Err(DaoError::NotFound),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self), fields(table = M::TABLE))]
    async fn restore_all(&self) -> Result<u64, DaoError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = NULL, updated_at = NOW() WHERE deleted_at IS NOT NULL",
            M::TABLE
        );
        self.execute(&sql, &[]).await
    }

    #[instrument(skip(self), fields(table = M::TABLE))]
    async fn purge_all(&self) -> Result<u64, DaoError> {
        let sql = format!("DELETE FROM {} WHERE deleted_at IS NOT NULL", M::TABLE);
        self.execute(&sql, &[]).await
    }
}
