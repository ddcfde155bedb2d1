use std::{fmt::Display, sync::Arc, time::Duration};

use async_trait::async_trait;
use database_traits::UserRoleSource;
use messaging::CorrelationHandler;
use redis_connection::{CacheStore, DEFAULT_TTL, core::CacheTypeBind};
use tracing::{debug, instrument};

use crate::{RoleLookupReply, RoleLookupRequest, UserRoleNamesCacheKey};

/// Answers role lookups from the role store, cache-aside.
///
/// Only non-empty answers are cached, so a role granted to a user who had
/// none becomes visible on the next lookup. Role writes never drop
/// `role:user:<id>` entries: a trashed, purged or revoked role keeps being
/// reported until the entry expires.
pub struct RoleLookupHandler<S> {
    source: Arc<S>,
    cache: CacheStore,
}

impl<S> RoleLookupHandler<S> {
    /// Longest a cached role list may lag behind a role write under the
    /// default TTL.
    pub const ROLE_STALENESS_BOUND: Duration = DEFAULT_TTL;

    pub fn new(source: Arc<S>, cache: CacheStore) -> Self { Self { source, cache } }

    /// Staleness bound of cached role lists under the configured TTL.
    pub fn staleness_bound(&self) -> Duration { self.cache.default_ttl() }
}

#[async_trait]
impl<S> CorrelationHandler for RoleLookupHandler<S>
where
    S: UserRoleSource + 'static,
    S::Error: Display,
{
    type Error = S::Error;
    type Reply = RoleLookupReply;
    type Request = RoleLookupRequest;

    #[instrument(skip(self))]
    async fn handle(&self, request: RoleLookupRequest) -> Result<RoleLookupReply, S::Error> {
        let cached = UserRoleNamesCacheKey.bind_with(&self.cache, &request.user_id);

        if let Some(role_names) = cached.try_get().await {
            debug!("Cache hit for roles of user {}", request.user_id);
            return Ok(RoleLookupReply { role_names });
        }

        let role_names = self.source.role_names_for_user(request.user_id).await?;
        if !role_names.is_empty() {
            cached.set(&role_names).await;
        }

        Ok(RoleLookupReply { role_names })
    }

    fn is_valid(&self, reply: &RoleLookupReply) -> bool { !reply.role_names.is_empty() }
}
