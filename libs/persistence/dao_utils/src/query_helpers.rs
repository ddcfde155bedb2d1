use database_traits::Counted;
use tokio_postgres::Row;

// Type aliases for PostgreSQL parameter types
pub type PgParam = dyn tokio_postgres::types::ToSql + Sync;

pub const TOTAL_COUNT_COLUMN: &str = "total_count";

/// Maps listed rows, keeping the window count carried by each one.
pub fn counted_rows<T, F>(rows: &[Row], mapper: F) -> Vec<Counted<T>>
where
    F: Fn(&Row) -> T,
{
    rows.iter()
        .map(|row| Counted::new(mapper(row), row.get(TOTAL_COUNT_COLUMN)))
        .collect()
}
