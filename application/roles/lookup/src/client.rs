use std::sync::Arc;

use messaging::{Broker, BrokerError, ClientConfig, CorrelationClient, CorrelationError};
use tracing::instrument;

use crate::{RoleLookupReply, RoleLookupRequest};

/// Asks the role service for a user's roles.
pub struct RoleLookupClient {
    inner: CorrelationClient<RoleLookupRequest, RoleLookupReply>,
}

impl RoleLookupClient {
    pub async fn start(
        broker: Arc<dyn Broker>, config: ClientConfig,
    ) -> Result<Self, BrokerError> {
        Ok(Self {
            inner: CorrelationClient::start(broker, config).await?,
        })
    }

    /// Role names of `user_id`. A negative answer, whether the user has no
    /// roles or the lookup failed on the responder, is an empty list.
    #[instrument(skip(self))]
    pub async fn user_roles(&self, user_id: i64) -> Result<Vec<String>, CorrelationError> {
        let response = self.inner.request(RoleLookupRequest { user_id }).await?;

        if !response.valid {
            return Ok(Vec::new());
        }
        Ok(response.payload.role_names)
    }

    /// Releases the client's reply group on the broker.
    pub async fn close(self) { self.inner.close().await }

    pub async fn has_role(&self, user_id: i64, role_name: &str) -> Result<bool, CorrelationError> {
        let roles = self.user_roles(user_id).await?;
        Ok(roles.iter().any(|role| role == role_name))
    }
}
