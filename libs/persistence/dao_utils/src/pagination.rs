use database_traits::{ListView, PageRequest};

pub fn lifecycle_predicate(view: ListView) -> &'static str {
    match view {
        ListView::All => "TRUE",
        ListView::Active => "deleted_at IS NULL",
        ListView::Trashed => "deleted_at IS NOT NULL",
    }
}

/// Builds the single-statement page query used by every listing.
///
/// Bound parameters: `$1` search term (empty matches everything), `$2`
/// limit, `$3` offset and, when a parent column is given, `$4` parent id.
/// Each row carries `total_count`, the window count of all matching rows.
#[derive(Debug, Clone, Copy)]
pub struct ListQuery<'a> {
    pub table: &'a str,
    pub columns: &'a str,
    pub search_column: &'a str,
    pub order_by: &'a str,
}

impl<'a> ListQuery<'a> {
    pub fn new(table: &'a str, columns: &'a str, search_column: &'a str) -> Self {
        Self {
            table,
            columns,
            search_column,
            order_by: "id ASC",
        }
    }

    pub fn order_by(mut self, order_by: &'a str) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn build(&self, view: ListView) -> String {
        self.build_inner(view, None)
    }

    pub fn build_for_parent(&self, view: ListView, parent_column: &str) -> String {
        self.build_inner(view, Some(parent_column))
    }

    fn build_inner(&self, view: ListView, parent_column: Option<&str>) -> String {
        let parent_filter = parent_column
            .map(|column| format!(" AND {column} = $4"))
            .unwrap_or_default();

        format!(
            "SELECT {columns}, COUNT(*) OVER() AS total_count FROM {table} \
             WHERE {lifecycle} AND ($1::text = '' OR {search} ILIKE '%' || $1 || \
             '%'){parent_filter} ORDER BY {order_by} LIMIT $2 OFFSET $3",
            columns = self.columns,
            table = self.table,
            lifecycle = lifecycle_predicate(view),
            search = self.search_column,
            order_by = self.order_by,
        )
    }
}

/// Values bound to `$1..$3` of a [`ListQuery`].
pub fn page_params(page: &PageRequest) -> (String, i64, i64) {
    (page.search.clone(), page.limit(), page.offset())
}
