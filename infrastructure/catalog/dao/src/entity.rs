use catalog_models::CatalogEntity;
use dao_utils::{pagination::ListQuery, query_helpers::PgParam};
use tokio_postgres::Row;

/// Table mapping of a catalog entity.
///
/// `INSERT` binds [`SqlEntity::create_params`] from `$1`; `UPDATE` binds the
/// id as `$1` and [`SqlEntity::update_params`] from `$2`. Both end in
/// `RETURNING` the entity's `COLUMNS`.
pub trait SqlEntity: CatalogEntity {
    type Create: Send + Sync + 'static;
    type Update: Send + Sync + 'static;

    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const SEARCH_COLUMN: &'static str;
    const ORDER_BY: &'static str = "id ASC";
    const INSERT: &'static str;
    const UPDATE: &'static str;

    fn from_row(row: &Row) -> Self;

    fn create_params(req: &Self::Create) -> Vec<&PgParam>;

    fn update_params(req: &Self::Update) -> Vec<&PgParam>;

    fn list_query() -> ListQuery<'static> {
        ListQuery::new(Self::TABLE, Self::COLUMNS, Self::SEARCH_COLUMN).order_by(Self::ORDER_BY)
    }
}
