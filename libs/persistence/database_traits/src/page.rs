use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Page selection shared by every paginated listing.
///
/// Always pass a request through [`PageRequest::normalized`] before using it
/// for a query or a cache key, so that equivalent requests resolve to the
/// same rows and the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i32,
    #[serde(default = "default_page_size")]
    pub page_size: i32,
    #[serde(default)]
    pub search: String,
}

impl PageRequest {
    pub fn new(page: i32, page_size: i32, search: impl Into<String>) -> Self {
        Self {
            page,
            page_size,
            search: search.into(),
        }
    }

    pub fn normalized(mut self) -> Self {
        if self.page < 1 {
            self.page = DEFAULT_PAGE;
        }
        if self.page_size < 1 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page.max(1)) - 1) * i64::from(self.page_size.max(1))
    }

    pub fn limit(&self) -> i64 { i64::from(self.page_size.max(1)) }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE, "")
    }
}

fn default_page() -> i32 { DEFAULT_PAGE }
fn default_page_size() -> i32 { DEFAULT_PAGE_SIZE }

/// Lifecycle slice a listing is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListView {
    All,
    Active,
    Trashed,
}

impl ListView {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListView::All => "all",
            ListView::Active => "active",
            ListView::Trashed => "trashed",
        }
    }
}

/// A listed row together with the total number of rows matching the query.
///
/// Repositories attach the count to each row so a page and its total come
/// back from a single statement; readers take it from the first row.
#[derive(Debug, Clone, PartialEq)]
pub struct Counted<T> {
    pub item: T,
    pub total_count: i64,
}

impl<T> Counted<T> {
    pub fn new(item: T, total_count: i64) -> Self { Self { item, total_count } }
}

/// Total carried by the first row, `0` for an empty page.
pub fn total_of<T>(rows: &[Counted<T>]) -> i64 {
    rows.first().map(|row| row.total_count).unwrap_or(0)
}
