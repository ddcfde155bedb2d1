use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::CatalogEntity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for Category {
    const NAME: &'static str = "category";

    fn id(&self) -> i64 { self.id }

    fn deleted_at(&self) -> Option<DateTime<Utc>> { self.deleted_at }

    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>) {
        self.deleted_at = deleted_at;
    }

    fn search_text(&self) -> &str { &self.name }
}
