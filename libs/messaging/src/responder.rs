use std::{fmt::Display, sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, instrument, warn};

use crate::{
    broker::{Broker, Subscription},
    envelope::{CorrelationRequest, CorrelationResponse},
    error::BrokerError,
};

/// Answers one kind of correlation request.
#[async_trait]
pub trait CorrelationHandler: Send + Sync + 'static {
    type Request: DeserializeOwned + Send;
    type Reply: Serialize + Default + Send;
    type Error: Display + Send;

    async fn handle(&self, request: Self::Request) -> Result<Self::Reply, Self::Error>;

    /// Whether a successful reply counts as a positive answer.
    fn is_valid(&self, _reply: &Self::Reply) -> bool { true }
}

/// What became of one request message. The message is acknowledged in
/// every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Undecodable, or missing its correlation id or reply topic.
    Discarded,
    Replied { valid: bool },
    ReplyFailed,
}

/// Responder side of the correlation protocol.
pub struct CorrelationResponder<H> {
    broker: Arc<dyn Broker>,
    handler: Arc<H>,
    topic: String,
    group: String,
}

impl<H: CorrelationHandler> CorrelationResponder<H> {
    pub fn new(
        broker: Arc<dyn Broker>, handler: Arc<H>, topic: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            handler,
            topic: topic.into(),
            group: group.into(),
        }
    }

    pub fn topic(&self) -> &str { &self.topic }

    /// Answers one raw request message.
    #[instrument(skip_all, fields(topic = %self.topic))]
    pub async fn respond(&self, payload: &[u8]) -> Outcome {
        let request: CorrelationRequest<H::Request> = match serde_json::from_slice(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "discarding malformed correlation request");
                return Outcome::Discarded;
            }
        };

        if !request.is_routable() {
            warn!(
                correlation_id = %request.correlation_id,
                reply_topic = %request.reply_topic,
                "discarding correlation request without routing fields"
            );
            return Outcome::Discarded;
        }

        let CorrelationRequest {
            correlation_id,
            reply_topic,
            payload,
        } = request;

        let (valid, reply) = match self.handler.handle(payload).await {
            Ok(reply) => (self.handler.is_valid(&reply), reply),
            Err(e) => {
                warn!(correlation_id, error = %e, "correlation handler failed");
                (false, H::Reply::default())
            }
        };

        let response = CorrelationResponse {
            correlation_id: correlation_id.clone(),
            valid,
            payload: reply,
        };
        let bytes = match serde_json::to_vec(&response) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!(correlation_id, error = %e, "failed to encode reply");
                return Outcome::ReplyFailed;
            }
        };

        match self.broker.publish(&reply_topic, &correlation_id, bytes).await {
            Ok(()) => {
                debug!(correlation_id, valid, "reply published");
                Outcome::Replied { valid }
            }
            Err(e) => {
                warn!(correlation_id, error = %e, "failed to publish reply");
                Outcome::ReplyFailed
            }
        }
    }

    /// Processes one subscription until it ends or `shutdown` flips.
    async fn run(
        self: Arc<Self>, mut subscription: Box<dyn Subscription>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            let next = tokio::select! {
                _ = shutdown.changed() => break,
                next = subscription.next() => next,
            };

            let delivery = match next {
                Ok(Some(delivery)) => delivery,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "request subscription failed, retrying");
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    continue;
                }
            };

            self.respond(&delivery.payload).await;

            if let Err(e) = subscription.ack(&delivery).await {
                warn!(error = %e, "failed to ack request");
            }
        }
    }

    /// Joins `count` members to the consumer group, then runs each on its
    /// own task. Every member handles its deliveries one at a time.
    pub async fn spawn_workers(
        self: &Arc<Self>, count: usize, shutdown: watch::Receiver<bool>,
    ) -> Result<Vec<JoinHandle<()>>, BrokerError> {
        let mut workers = Vec::with_capacity(count);

        for i in 0..count.max(1) {
            let consumer = format!("{}-{}", self.group, i);
            let subscription = self
                .broker
                .subscribe(&self.topic, &self.group, &consumer)
                .await?;
            workers.push(tokio::spawn(
                self.clone().run(subscription, shutdown.clone()),
            ));
        }

        info!(
            topic = %self.topic,
            group = %self.group,
            workers = workers.len(),
            "correlation responder started"
        );
        Ok(workers)
    }
}
