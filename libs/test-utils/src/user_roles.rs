use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use dao_utils::DaoError;
use database_traits::UserRoleSource;
use tokio::sync::RwLock;

/// User/role assignments kept in memory.
#[derive(Default)]
pub struct InMemoryUserRoles {
    assignments: RwLock<HashMap<i64, Vec<String>>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryUserRoles {
    pub fn new() -> Self { Self::default() }

    pub async fn assign(&self, user_id: i64, role_names: &[&str]) {
        self.assignments
            .write()
            .await
            .entry(user_id)
            .or_default()
            .extend(role_names.iter().map(|name| name.to_string()));
    }

    pub async fn revoke(&self, user_id: i64, role_name: &str) {
        if let Some(names) = self.assignments.write().await.get_mut(&user_id) {
            names.retain(|name| name != role_name);
        }
    }

    pub fn lookups(&self) -> usize { self.lookups.load(Ordering::SeqCst) }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRoleSource for InMemoryUserRoles {
    type Error = DaoError;

    async fn role_names_for_user(&self, user_id: i64) -> Result<Vec<String>, DaoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DaoError::Unavailable("in-memory store switched off".into()));
        }

        let mut names = self
            .assignments
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }
}
