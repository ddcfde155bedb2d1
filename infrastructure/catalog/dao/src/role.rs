use async_trait::async_trait;
use catalog_commands::RoleInput;
use catalog_models::Role;
use dao_utils::{DaoError, query_helpers::PgParam};
use database_traits::UserRoleSource;
use tokio_postgres::Row;
use tracing::instrument;

use crate::{entity::SqlEntity, lifecycle::PgLifecycleDao};

impl SqlEntity for Role {
    type Create = RoleInput;
    type Update = RoleInput;

    const COLUMNS: &'static str = "id, role_name, created_at, updated_at, deleted_at";
    const INSERT: &'static str = "INSERT INTO roles (role_name) VALUES ($1) RETURNING id, \
                                  role_name, created_at, updated_at, deleted_at";
    const SEARCH_COLUMN: &'static str = "role_name";
    const TABLE: &'static str = "roles";
    const UPDATE: &'static str = "UPDATE roles SET role_name = $2, updated_at = NOW() WHERE id = \
                                  $1 RETURNING id, role_name, created_at, updated_at, deleted_at";

    fn from_row(row: &Row) -> Self {
        Role {
            id: row.get("id"),
            role_name: row.get("role_name"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }

    fn create_params(req: &RoleInput) -> Vec<&PgParam> { vec![&req.role_name as &PgParam] }

    fn update_params(req: &RoleInput) -> Vec<&PgParam> { Self::create_params(req) }
}

impl PgLifecycleDao<Role> {
    /// Grants a role to a user. Granting it twice is a no-op.
    #[instrument(skip(self))]
    pub async fn assign_to_user(&self, user_id: i64, role_id: i64) -> Result<(), DaoError> {
        let client = self.db().get_client().await?;
        let stmt = client
            .prepare_cached(
                "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .await?;
        client.execute(&stmt, &[&user_id, &role_id]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn revoke_from_user(&self, user_id: i64, role_id: i64) -> Result<(), DaoError> {
        let client = self.db().get_client().await?;
        let stmt = client
            .prepare_cached("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .await?;
        client.execute(&stmt, &[&user_id, &role_id]).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRoleSource for PgLifecycleDao<Role> {
    type Error = DaoError;

    /// Trashed roles are not reported.
    #[instrument(skip(self))]
    async fn role_names_for_user(&self, user_id: i64) -> Result<Vec<String>, DaoError> {
        let client = self.db().get_client().await?;
        let stmt = client
            .prepare_cached(
                "SELECT r.role_name FROM roles r JOIN user_roles ur ON ur.role_id = r.id WHERE \
                 ur.user_id = $1 AND r.deleted_at IS NULL ORDER BY r.role_name",
            )
            .await?;
        let rows = client.query(&stmt, &[&user_id]).await?;

        Ok(rows.iter().map(|row| row.get("role_name")).collect())
    }
}
