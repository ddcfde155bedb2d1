use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BrokerError;

/// One message handed to a consumer group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub topic: String,
    pub key: String,
    pub payload: Bytes,
    /// Broker-assigned id, used to acknowledge the message.
    pub id: String,
}

/// Topic based publish/subscribe with consumer groups.
///
/// Every group subscribed to a topic receives each message once; members of
/// the same group share the group's messages between them.
#[async_trait]
pub trait Broker: Send + Sync {
    async fn publish(
        &self, topic: &str, key: &str, payload: Bytes,
    ) -> Result<(), BrokerError>;

    /// Joins `consumer` to `group` on `topic`, creating the group if needed.
    /// Only messages published after the group exists are delivered.
    async fn subscribe(
        &self, topic: &str, group: &str, consumer: &str,
    ) -> Result<Box<dyn Subscription>, BrokerError>;

    /// Removes `group` from `topic`. Its members' subscriptions end and
    /// later messages are no longer queued for it.
    async fn unsubscribe(&self, topic: &str, group: &str) -> Result<(), BrokerError>;

    /// Drops `topic` with every group on it and all retained messages.
    async fn delete_topic(&self, topic: &str) -> Result<(), BrokerError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait Subscription: Send {
    /// Waits for the next message. `Ok(None)` means the subscription ended.
    async fn next(&mut self) -> Result<Option<Delivery>, BrokerError>;

    async fn ack(&mut self, delivery: &Delivery) -> Result<(), BrokerError>;
}
