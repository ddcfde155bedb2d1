use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{CatalogEntity, ParentScoped};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub name: String,
    pub comment: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for Review {
    const NAME: &'static str = "review";

    fn id(&self) -> i64 { self.id }

    fn deleted_at(&self) -> Option<DateTime<Utc>> { self.deleted_at }

    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>) {
        self.deleted_at = deleted_at;
    }

    fn search_text(&self) -> &str { &self.comment }
}

impl ParentScoped for Review {
    const PARENT: &'static str = "product";

    fn parent_id(&self) -> i64 { self.product_id }
}
