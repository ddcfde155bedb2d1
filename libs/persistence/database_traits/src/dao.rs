use async_trait::async_trait;

use crate::page::{Counted, PageRequest};

/// Repository over one soft-deletable entity table.
///
/// Implementations own the authoritative state. Lifecycle writes are
/// single-row statements; `trash` only matches active rows while `restore`
/// and `purge` only match trashed rows, so concurrent transitions cannot
/// both win.
#[async_trait]
pub trait LifecycleDao: Send + Sync {
    type Model: Send + Sync + 'static;
    type CreateRequest: Send + Sync + 'static;
    type UpdateRequest: Send + Sync + 'static;
    type Error: Send + 'static;

    async fn find_all(
        &self, page: &PageRequest,
    ) -> Result<Vec<Counted<Self::Model>>, Self::Error>;

    async fn find_active(
        &self, page: &PageRequest,
    ) -> Result<Vec<Counted<Self::Model>>, Self::Error>;

    async fn find_trashed(
        &self, page: &PageRequest,
    ) -> Result<Vec<Counted<Self::Model>>, Self::Error>;

    /// Finds a row in either lifecycle state.
    async fn find_by_id(&self, id: i64) -> Result<Self::Model, Self::Error>;

    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Model, Self::Error>;

    /// Replaces attributes, leaving the lifecycle marker untouched.
    async fn update(
        &self, id: i64, req: Self::UpdateRequest,
    ) -> Result<Self::Model, Self::Error>;

    async fn trash(&self, id: i64) -> Result<Self::Model, Self::Error>;

    async fn restore(&self, id: i64) -> Result<Self::Model, Self::Error>;

    /// Physically removes the row. Only matches a trashed row.
    async fn purge(&self, id: i64) -> Result<(), Self::Error>;

    /// Returns the number of rows restored.
    async fn restore_all(&self) -> Result<u64, Self::Error>;

    /// Removes every trashed row, returning how many were removed.
    async fn purge_all(&self) -> Result<u64, Self::Error>;
}

/// Repository whose rows belong to a parent (reviews of a product, ...).
#[async_trait]
pub trait ParentScopedDao: LifecycleDao {
    /// Active rows of one parent.
    async fn find_by_parent(
        &self, parent_id: i64, page: &PageRequest,
    ) -> Result<Vec<Counted<Self::Model>>, Self::Error>;
}

/// Read side of the user/role assignment.
#[async_trait]
pub trait UserRoleSource: Send + Sync {
    type Error: Send + 'static;

    /// Names of the active roles assigned to `user_id`, in a stable order.
    /// A user without roles yields an empty list, not an error.
    async fn role_names_for_user(
        &self, user_id: i64,
    ) -> Result<Vec<String>, Self::Error>;
}
