//! Role lookup over the correlation protocol: the responder side answers
//! "which roles does this user hold" from the role store, the client side
//! lets another service ask without calling the role service directly.

mod cache_keys;
mod client;
mod handler;

use serde::{Deserialize, Serialize};

pub use cache_keys::UserRoleNamesCacheKey;
pub use client::RoleLookupClient;
pub use handler::RoleLookupHandler;

pub const DEFAULT_TOPIC: &str = "role.lookup.request";
pub const DEFAULT_GROUP: &str = "role-service";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLookupRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLookupReply {
    #[serde(default)]
    pub role_names: Vec<String>,
}
