use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use flume::{Receiver, Sender};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{
    broker::{Broker, Delivery, Subscription},
    error::BrokerError,
};

/// Queue shared by all members of one consumer group.
type GroupQueue = (Sender<Delivery>, Receiver<Delivery>);

/// Topic -> group -> queue.
type TopicRegistry = Arc<RwLock<HashMap<String, HashMap<String, GroupQueue>>>>;

#[derive(Debug, Default)]
pub struct BrokerMetrics {
    pub published: AtomicU64,
    pub dropped: AtomicU64,
}

/// In-process broker over flume channels.
///
/// Each consumer group owns one unbounded queue per topic; its members pull
/// from the same receiver, so a message reaches exactly one member of every
/// group. Messages published to a topic without groups are dropped.
/// Removing a group drops its queue, which ends its members' subscriptions.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    topics: TopicRegistry,
    sequence: Arc<AtomicU64>,
    metrics: Arc<BrokerMetrics>,
}

impl MemoryBroker {
    pub fn new() -> Self { Self::default() }

    pub fn metrics(&self) -> &BrokerMetrics { &self.metrics }

    /// Number of consumer groups registered on `topic`.
    pub async fn group_count(&self, topic: &str) -> usize {
        self.topics.read().await.get(topic).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    #[instrument(skip(self, payload))]
    async fn publish(
        &self, topic: &str, key: &str, payload: Bytes,
    ) -> Result<(), BrokerError> {
        let topics = self.topics.read().await;

        let Some(groups) = topics.get(topic).filter(|groups| !groups.is_empty())
        else {
            debug!("No consumer group on topic {}, message dropped", topic);
            self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        };

        let id = self.sequence.fetch_add(1, Ordering::Relaxed).to_string();
        for (tx, _) in groups.values() {
            tx.send(Delivery {
                topic: topic.to_string(),
                key: key.to_string(),
                payload: payload.clone(),
                id: id.clone(),
            })
            .map_err(|_| BrokerError::Closed)?;
        }

        self.metrics.published.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn subscribe(
        &self, topic: &str, group: &str, consumer: &str,
    ) -> Result<Box<dyn Subscription>, BrokerError> {
        let mut topics = self.topics.write().await;
        let (_, rx) = topics
            .entry(topic.to_string())
            .or_default()
            .entry(group.to_string())
            .or_insert_with(flume::unbounded);

        debug!(topic, group, consumer, "memory subscription registered");
        Ok(Box::new(MemorySubscription { rx: rx.clone() }))
    }

    async fn unsubscribe(&self, topic: &str, group: &str) -> Result<(), BrokerError> {
        let mut topics = self.topics.write().await;
        if let Some(groups) = topics.get_mut(topic) {
            groups.remove(group);
            if groups.is_empty() {
                topics.remove(topic);
            }
        }
        debug!(topic, group, "memory consumer group removed");
        Ok(())
    }

    async fn delete_topic(&self, topic: &str) -> Result<(), BrokerError> {
        self.topics.write().await.remove(topic);
        debug!(topic, "memory topic removed");
        Ok(())
    }

    fn name(&self) -> &'static str { "memory" }
}

struct MemorySubscription {
    rx: Receiver<Delivery>,
}

#[async_trait]
impl Subscription for MemorySubscription {
    async fn next(&mut self) -> Result<Option<Delivery>, BrokerError> {
        Ok(self.rx.recv_async().await.ok())
    }

    async fn ack(&mut self, _delivery: &Delivery) -> Result<(), BrokerError> { Ok(()) }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_every_group_gets_a_copy() {
        let broker = MemoryBroker::new();
        let mut audit = broker.subscribe("orders", "audit", "a-1").await.unwrap();
        let mut billing = broker.subscribe("orders", "billing", "b-1").await.unwrap();

        broker
            .publish("orders", "k", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        let a = audit.next().await.unwrap().unwrap();
        let b = billing.next().await.unwrap().unwrap();
        assert_eq!(a.payload, Bytes::from_static(b"hello"));
        assert_eq!(a, b);
        assert_eq!(a.key, "k");
    }

    #[tokio::test]
    async fn test_group_members_share_messages() {
        let broker = MemoryBroker::new();
        let mut first = broker.subscribe("jobs", "workers", "w-1").await.unwrap();
        let mut second = broker.subscribe("jobs", "workers", "w-2").await.unwrap();

        broker.publish("jobs", "1", Bytes::from_static(b"1")).await.unwrap();
        broker.publish("jobs", "2", Bytes::from_static(b"2")).await.unwrap();

        let one = first.next().await.unwrap().unwrap();
        let two = second.next().await.unwrap().unwrap();
        assert_ne!(one.id, two.id);

        let nothing_left = timeout(Duration::from_millis(50), first.next()).await;
        assert!(nothing_left.is_err());
    }

    #[tokio::test]
    async fn test_publish_without_groups_is_dropped() {
        let broker = MemoryBroker::new();

        broker.publish("nobody", "k", Bytes::new()).await.unwrap();
        let mut late = broker.subscribe("nobody", "late", "l-1").await.unwrap();

        assert!(timeout(Duration::from_millis(50), late.next()).await.is_err());
        assert_eq!(broker.metrics().dropped.load(Ordering::Relaxed), 1);
        assert_eq!(broker.metrics().published.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_ends_group_and_stops_queueing() {
        let broker = MemoryBroker::new();
        let mut gone = broker.subscribe("replies", "requester-1", "r-1").await.unwrap();
        let mut kept = broker.subscribe("replies", "requester-2", "r-2").await.unwrap();

        broker.unsubscribe("replies", "requester-1").await.unwrap();
        assert_eq!(gone.next().await.unwrap(), None);
        assert_eq!(broker.group_count("replies").await, 1);

        broker.publish("replies", "k", Bytes::from_static(b"late")).await.unwrap();
        assert_eq!(kept.next().await.unwrap().unwrap().payload, Bytes::from_static(b"late"));

        broker.unsubscribe("replies", "requester-2").await.unwrap();
        assert_eq!(broker.group_count("replies").await, 0);
        broker.publish("replies", "k", Bytes::new()).await.unwrap();
        assert_eq!(broker.metrics().dropped.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_delete_topic_ends_every_group() {
        let broker = MemoryBroker::new();
        let mut first = broker.subscribe("replies", "a", "a-1").await.unwrap();
        let mut second = broker.subscribe("replies", "b", "b-1").await.unwrap();

        broker.delete_topic("replies").await.unwrap();

        assert_eq!(first.next().await.unwrap(), None);
        assert_eq!(second.next().await.unwrap(), None);
        assert_eq!(broker.group_count("replies").await, 0);
    }
}
