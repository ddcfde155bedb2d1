use std::{collections::VecDeque, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use deadpool_redis::{
    Pool,
    redis::{
        AsyncCommands, RedisError,
        streams::{StreamId, StreamMaxlen, StreamReadOptions, StreamReadReply},
    },
};
use tracing::{debug, instrument, warn};

use crate::{
    broker::{Broker, Delivery, Subscription},
    error::BrokerError,
};

const KEY_FIELD: &str = "key";
const PAYLOAD_FIELD: &str = "payload";
const READ_COUNT: usize = 10;
/// Approximate number of entries a stream keeps; older ones are trimmed.
pub const DEFAULT_MAX_LEN: usize = 10_000;

impl From<RedisError> for BrokerError {
    fn from(err: RedisError) -> Self { BrokerError::Command(err.to_string()) }
}

impl From<deadpool_redis::PoolError> for BrokerError {
    fn from(err: deadpool_redis::PoolError) -> Self { BrokerError::Connection(err.to_string()) }
}

/// Broker over Redis streams: one stream per topic, consumer groups map to
/// stream consumer groups. Every `XADD` trims the stream to roughly
/// `max_len` entries.
#[derive(Clone)]
pub struct RedisStreamBroker {
    pool: Pool,
    block: Duration,
    max_len: usize,
}

impl RedisStreamBroker {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            block: Duration::from_millis(1000),
            max_len: DEFAULT_MAX_LEN,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// How long one `XREADGROUP` call blocks waiting for entries.
    pub fn with_block(mut self, block: Duration) -> Self {
        self.block = block;
        self
    }
}

#[async_trait]
impl Broker for RedisStreamBroker {
    #[instrument(skip(self, payload))]
    async fn publish(
        &self, topic: &str, key: &str, payload: Bytes,
    ) -> Result<(), BrokerError> {
        let mut conn = self.pool.get().await?;
        let _: String = conn
            .xadd_maxlen(
                topic,
                StreamMaxlen::Approx(self.max_len),
                "*",
                &[(KEY_FIELD, key.as_bytes()), (PAYLOAD_FIELD, &payload[..])],
            )
            .await?;
        Ok(())
    }

    async fn subscribe(
        &self, topic: &str, group: &str, consumer: &str,
    ) -> Result<Box<dyn Subscription>, BrokerError> {
        let mut conn = self.pool.get().await?;
        let created: Result<(), RedisError> =
            conn.xgroup_create_mkstream(topic, group, "$").await;

        match created {
            Ok(()) => debug!(topic, group, "stream consumer group created"),
            Err(e) if e.code() == Some("BUSYGROUP") => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Box::new(RedisStreamSubscription {
            pool: self.pool.clone(),
            topic: topic.to_string(),
            group: group.to_string(),
            consumer: consumer.to_string(),
            block: self.block,
            buffer: VecDeque::new(),
        }))
    }

    #[instrument(skip(self))]
    async fn unsubscribe(&self, topic: &str, group: &str) -> Result<(), BrokerError> {
        let mut conn = self.pool.get().await?;
        let destroyed: bool = conn.xgroup_destroy(topic, group).await?;
        debug!(topic, group, destroyed, "stream consumer group destroyed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_topic(&self, topic: &str) -> Result<(), BrokerError> {
        let mut conn = self.pool.get().await?;
        let _: i64 = conn.del(topic).await?;
        Ok(())
    }

    fn name(&self) -> &'static str { "redis-stream" }
}

struct RedisStreamSubscription {
    pool: Pool,
    topic: String,
    group: String,
    consumer: String,
    block: Duration,
    buffer: VecDeque<Delivery>,
}

impl RedisStreamSubscription {
    fn to_delivery(&self, entry: &StreamId) -> Delivery {
        let key: Option<Vec<u8>> = entry.get(KEY_FIELD);
        let payload: Option<Vec<u8>> = entry.get(PAYLOAD_FIELD);

        if payload.is_none() {
            warn!(stream.id = %entry.id, "stream entry without payload");
        }

        Delivery {
            topic: self.topic.clone(),
            key: key
                .map(|key| String::from_utf8_lossy(&key).into_owned())
                .unwrap_or_default(),
            payload: payload.map(Bytes::from).unwrap_or_default(),
            id: entry.id.clone(),
        }
    }

    async fn fill(&mut self) -> Result<(), BrokerError> {
        let mut conn = self.pool.get().await?;
        let opts = StreamReadOptions::default()
            .count(READ_COUNT)
            .block(self.block.as_millis() as usize)
            .group(&self.group, &self.consumer);

        let reply: Option<StreamReadReply> =
            conn.xread_options(&[&self.topic], &[">"], &opts).await?;

        for stream in reply.map(|reply| reply.keys).unwrap_or_default() {
            for entry in &stream.ids {
                let delivery = self.to_delivery(entry);
                self.buffer.push_back(delivery);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Subscription for RedisStreamSubscription {
    async fn next(&mut self) -> Result<Option<Delivery>, BrokerError> {
        loop {
            if let Some(delivery) = self.buffer.pop_front() {
                return Ok(Some(delivery));
            }
            self.fill().await?;
        }
    }

    async fn ack(&mut self, delivery: &Delivery) -> Result<(), BrokerError> {
        let mut conn = self.pool.get().await?;
        let _: i64 = conn.xack(&self.topic, &self.group, &[&delivery.id]).await?;
        Ok(())
    }
}
