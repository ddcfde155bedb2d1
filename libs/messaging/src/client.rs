use std::{
    collections::HashMap,
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use tokio::{runtime::Handle, sync::oneshot, task::JoinHandle};
use tracing::{debug, instrument, warn};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::{
    broker::{Broker, Subscription},
    envelope::{CorrelationRequest, CorrelationResponse},
    error::{BrokerError, CorrelationError},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Callers waiting for a reply, keyed by correlation id. Once the listener
/// stops the map is drained and closed, so no caller waits on a reply that
/// cannot arrive.
struct Waiters<R> {
    senders: HashMap<String, oneshot::Sender<CorrelationResponse<R>>>,
    closed: bool,
}

impl<R> Default for Waiters<R> {
    fn default() -> Self {
        Self {
            senders: HashMap::new(),
            closed: false,
        }
    }
}

type Pending<R> = Arc<Mutex<Waiters<R>>>;

fn waiters<R>(pending: &Pending<R>) -> MutexGuard<'_, Waiters<R>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct ClientConfig {
    #[builder(setter(into))]
    pub request_topic: String,
    /// Defaults to a topic private to this client instance.
    #[builder(default, setter(strip_option, into))]
    pub reply_topic: Option<String>,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

/// Requester side of the correlation protocol.
///
/// Owns one reply topic and a listener task that routes each reply to the
/// waiting caller by correlation id. Replies nobody waits for, because they
/// are unknown, duplicated or arrived after a timeout, are dropped.
///
/// The client's consumer group is removed from the broker on
/// [`close`](Self::close), and on drop when a runtime is still around. A
/// private reply topic is deleted along with it.
pub struct CorrelationClient<P, R> {
    broker: Arc<dyn Broker>,
    request_topic: String,
    reply_topic: String,
    timeout: Duration,
    pending: Pending<R>,
    listener: JoinHandle<()>,
    lease: Option<ReplyLease>,
    __phantom: PhantomData<fn(P)>,
}

/// The broker resources a client holds for its replies.
struct ReplyLease {
    broker: Arc<dyn Broker>,
    topic: String,
    group: String,
    private: bool,
}

impl ReplyLease {
    async fn release(self) {
        let released = if self.private {
            self.broker.delete_topic(&self.topic).await
        } else {
            self.broker.unsubscribe(&self.topic, &self.group).await
        };

        match released {
            Ok(()) => debug!(topic = %self.topic, group = %self.group, "reply group released"),
            Err(e) => warn!(topic = %self.topic, error = %e, "failed to release reply group"),
        }
    }
}

/// Removes the pending entry when the request finishes, however it ends.
struct PendingGuard<'a, R> {
    pending: &'a Pending<R>,
    correlation_id: &'a str,
}

impl<R> Drop for PendingGuard<'_, R> {
    fn drop(&mut self) { waiters(self.pending).senders.remove(self.correlation_id); }
}

impl<P, R> CorrelationClient<P, R>
where
    P: Serialize + Send,
    R: DeserializeOwned + Send + 'static,
{
    /// Subscribes to the reply topic before returning, so no reply to a
    /// request sent through this client can be missed.
    pub async fn start(
        broker: Arc<dyn Broker>, config: ClientConfig,
    ) -> Result<Self, BrokerError> {
        let instance = Uuid::now_v7().simple().to_string();
        let private = config.reply_topic.is_none();
        let reply_topic = config
            .reply_topic
            .unwrap_or_else(|| format!("{}.reply.{}", config.request_topic, instance));
        let group = format!("requester-{instance}");

        let subscription = broker.subscribe(&reply_topic, &group, &instance).await?;

        let pending: Pending<R> = Arc::default();
        let listener = tokio::spawn(listen(subscription, pending.clone()));

        Ok(Self {
            lease: Some(ReplyLease {
                broker: broker.clone(),
                topic: reply_topic.clone(),
                group,
                private,
            }),
            broker,
            request_topic: config.request_topic,
            reply_topic,
            timeout: config.timeout,
            pending,
            listener,
            __phantom: PhantomData,
        })
    }

    /// Stops the listener and removes this client's reply group, or its
    /// whole reply topic when the topic is private to the client.
    pub async fn close(mut self) {
        self.listener.abort();
        if let Some(lease) = self.lease.take() {
            lease.release().await;
        }
    }

    pub fn reply_topic(&self) -> &str { &self.reply_topic }

    pub fn timeout(&self) -> Duration { self.timeout }

    /// Number of requests still waiting for a reply.
    pub fn in_flight(&self) -> usize { waiters(&self.pending).senders.len() }

    #[instrument(skip_all, fields(topic = %self.request_topic))]
    pub async fn request(
        &self, payload: P,
    ) -> Result<CorrelationResponse<R>, CorrelationError> {
        let correlation_id = Uuid::now_v7().to_string();
        let (tx, rx) = oneshot::channel();

        {
            let mut waiters = waiters(&self.pending);
            if waiters.closed {
                return Err(CorrelationError::Closed);
            }
            waiters.senders.insert(correlation_id.clone(), tx);
        }
        let _guard = PendingGuard {
            pending: &self.pending,
            correlation_id: &correlation_id,
        };

        let request = CorrelationRequest {
            correlation_id: correlation_id.clone(),
            reply_topic: self.reply_topic.clone(),
            payload,
        };
        let bytes = Bytes::from(serde_json::to_vec(&request)?);

        self.broker
            .publish(&self.request_topic, &correlation_id, bytes)
            .await?;

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(CorrelationError::Closed),
            Err(_) => {
                warn!(correlation_id, "correlation request timed out");
                Err(CorrelationError::TimedOut {
                    correlation_id: correlation_id.clone(),
                    timeout: self.timeout,
                })
            }
        }
    }
}

impl<P, R> Drop for CorrelationClient<P, R> {
    fn drop(&mut self) {
        self.listener.abort();
        if let Some(lease) = self.lease.take() {
            match Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(lease.release());
                }
                Err(_) => warn!(topic = %lease.topic, "no runtime to release reply group"),
            }
        }
    }
}

async fn listen<R>(subscription: Box<dyn Subscription>, pending: Pending<R>)
where
    R: DeserializeOwned,
{
    route_replies(subscription, &pending).await;

    let mut waiters = waiters(&pending);
    waiters.closed = true;
    let abandoned = waiters.senders.len();
    waiters.senders.clear();
    debug!(abandoned, "reply subscription ended");
}

async fn route_replies<R>(mut subscription: Box<dyn Subscription>, pending: &Pending<R>)
where
    R: DeserializeOwned,
{
    loop {
        let delivery = match subscription.next().await {
            Ok(Some(delivery)) => delivery,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "reply subscription failed, retrying");
                tokio::time::sleep(Duration::from_millis(500)).await;
                continue;
            }
        };

        match serde_json::from_slice::<CorrelationResponse<R>>(&delivery.payload) {
            Ok(response) => {
                let waiter = waiters(pending).senders.remove(&response.correlation_id);
                match waiter {
                    Some(tx) => {
                        let _ = tx.send(response);
                    }
                    None => {
                        debug!(
                            correlation_id = %response.correlation_id,
                            "dropping reply with no waiting request"
                        );
                    }
                }
            }
            Err(e) => debug!(error = %e, "dropping undecodable reply"),
        }

        if let Err(e) = subscription.ack(&delivery).await {
            warn!(error = %e, "failed to ack reply");
        }
    }
}
