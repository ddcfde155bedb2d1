use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use messaging::{
    Broker, ClientConfig, CorrelationClient, CorrelationError, CorrelationHandler,
    CorrelationResponder, CorrelationResponse, MemoryBroker, Outcome,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

const TOPIC: &str = "math.double.request";

#[derive(Debug, Serialize, Deserialize)]
struct Double {
    n: i64,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Doubled {
    #[serde(default)]
    result: i64,
}

struct Doubler;

#[async_trait]
impl CorrelationHandler for Doubler {
    type Error = String;
    type Reply = Doubled;
    type Request = Double;

    async fn handle(&self, request: Double) -> Result<Doubled, String> {
        if request.n < 0 {
            return Err("negative input".to_string());
        }
        Ok(Doubled { result: request.n * 2 })
    }

    fn is_valid(&self, reply: &Doubled) -> bool { reply.result != 0 }
}

async fn start_responder(
    broker: &MemoryBroker, workers: usize,
) -> (Arc<CorrelationResponder<Doubler>>, watch::Sender<bool>) {
    let responder = Arc::new(CorrelationResponder::new(
        Arc::new(broker.clone()),
        Arc::new(Doubler),
        TOPIC,
        "math-service",
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    responder.spawn_workers(workers, shutdown_rx).await.unwrap();
    (responder, shutdown_tx)
}

async fn client(
    broker: &MemoryBroker, timeout: Duration,
) -> CorrelationClient<Double, Doubled> {
    CorrelationClient::start(
        Arc::new(broker.clone()),
        ClientConfig::builder()
            .request_topic(TOPIC)
            .timeout(timeout)
            .build(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_request_reply_roundtrip() {
    let broker = MemoryBroker::new();
    let (_responder, _shutdown) = start_responder(&broker, 1).await;
    let client = client(&broker, Duration::from_secs(2)).await;

    let response = client.request(Double { n: 21 }).await.unwrap();

    assert!(response.valid);
    assert_eq!(response.payload, Doubled { result: 42 });
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn test_empty_and_failed_answers_are_invalid() {
    let broker = MemoryBroker::new();
    let (_responder, _shutdown) = start_responder(&broker, 1).await;
    let client = client(&broker, Duration::from_secs(2)).await;

    let zero = client.request(Double { n: 0 }).await.unwrap();
    assert!(!zero.valid);

    let failed = client.request(Double { n: -1 }).await.unwrap();
    assert!(!failed.valid);
    assert_eq!(failed.payload, Doubled::default());
}

#[tokio::test]
async fn test_times_out_without_responder() {
    let broker = MemoryBroker::new();
    let client = client(&broker, Duration::from_millis(100)).await;

    let err = client.request(Double { n: 1 }).await.unwrap_err();

    assert!(matches!(err, CorrelationError::TimedOut { .. }));
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn test_only_matching_reply_resolves_request() {
    let broker = MemoryBroker::new();
    let client = Arc::new(client(&broker, Duration::from_secs(2)).await);
    let mut requests = broker.subscribe(TOPIC, "impostor", "i-1").await.unwrap();

    let waiting = tokio::spawn({
        let client = client.clone();
        async move { client.request(Double { n: 5 }).await }
    });

    let delivery = requests.next().await.unwrap().unwrap();
    let request: serde_json::Value = serde_json::from_slice(&delivery.payload).unwrap();
    let correlation_id = request["correlation_id"].as_str().unwrap().to_string();
    let reply_topic = request["reply_topic"].as_str().unwrap().to_string();

    let reply = |id: &str, result: i64| {
        Bytes::from(
            serde_json::to_vec(&CorrelationResponse {
                correlation_id: id.to_string(),
                valid: true,
                payload: Doubled { result },
            })
            .unwrap(),
        )
    };

    broker
        .publish(&reply_topic, "other", reply("someone-else", 999))
        .await
        .unwrap();
    broker
        .publish(&reply_topic, &correlation_id, reply(&correlation_id, 10))
        .await
        .unwrap();
    broker
        .publish(&reply_topic, &correlation_id, reply(&correlation_id, 11))
        .await
        .unwrap();

    let response = waiting.await.unwrap().unwrap();
    assert_eq!(response.correlation_id, correlation_id);
    assert_eq!(response.payload.result, 10);
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn test_late_reply_after_timeout_is_ignored() {
    let broker = MemoryBroker::new();
    let client = client(&broker, Duration::from_millis(50)).await;
    let mut requests = broker.subscribe(TOPIC, "slow", "s-1").await.unwrap();

    let err = client.request(Double { n: 1 }).await.unwrap_err();
    let correlation_id = match err {
        CorrelationError::TimedOut { correlation_id, .. } => correlation_id,
        other => panic!("expected a timeout, got {other:?}"),
    };

    let delivery = requests.next().await.unwrap().unwrap();
    assert_eq!(delivery.key, correlation_id);

    let late = CorrelationResponse {
        correlation_id: correlation_id.clone(),
        valid: true,
        payload: Doubled { result: 2 },
    };
    broker
        .publish(
            client.reply_topic(),
            &correlation_id,
            Bytes::from(serde_json::to_vec(&late).unwrap()),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn test_malformed_requests_are_discarded() {
    let broker = MemoryBroker::new();
    let responder = CorrelationResponder::new(
        Arc::new(broker.clone()),
        Arc::new(Doubler),
        TOPIC,
        "math-service",
    );
    let mut replies = broker.subscribe("reply.abc", "watch", "w-1").await.unwrap();

    assert_eq!(responder.respond(b"not json").await, Outcome::Discarded);
    assert_eq!(
        responder
            .respond(br#"{"correlation_id":"abc","reply_topic":"","n":1}"#)
            .await,
        Outcome::Discarded
    );
    assert_eq!(
        responder.respond(br#"{"reply_topic":"reply.abc","n":1}"#).await,
        Outcome::Discarded
    );
    assert_eq!(
        responder
            .respond(br#"{"correlation_id":"abc","reply_topic":"reply.abc"}"#)
            .await,
        Outcome::Discarded
    );

    assert_eq!(
        responder
            .respond(br#"{"correlation_id":"abc","reply_topic":"reply.abc","n":4}"#)
            .await,
        Outcome::Replied { valid: true }
    );
    let reply = replies.next().await.unwrap().unwrap();
    let reply: CorrelationResponse<Doubled> = serde_json::from_slice(&reply.payload).unwrap();
    assert_eq!(reply.correlation_id, "abc");
    assert_eq!(reply.payload.result, 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_on_several_workers() {
    let broker = MemoryBroker::new();
    let (_responder, _shutdown) = start_responder(&broker, 3).await;
    let client = Arc::new(client(&broker, Duration::from_secs(5)).await);

    let calls: Vec<_> = (1..=30)
        .map(|n| {
            let client = client.clone();
            tokio::spawn(async move { (n, client.request(Double { n }).await) })
        })
        .collect();

    for call in calls {
        let (n, response) = call.await.unwrap();
        assert_eq!(response.unwrap().payload.result, n * 2);
    }
}

#[tokio::test]
async fn test_workers_stop_on_shutdown() {
    let broker = MemoryBroker::new();
    let responder = Arc::new(CorrelationResponder::new(
        Arc::new(broker.clone()),
        Arc::new(Doubler),
        TOPIC,
        "math-service",
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let workers = responder.spawn_workers(2, shutdown_rx).await.unwrap();

    shutdown_tx.send(true).unwrap();
    for worker in workers {
        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn test_waiting_request_fails_fast_when_replies_stop() {
    let broker = MemoryBroker::new();
    let client = Arc::new(client(&broker, Duration::from_secs(30)).await);

    let waiting = tokio::spawn({
        let client = client.clone();
        async move { client.request(Double { n: 1 }).await }
    });
    while client.in_flight() == 0 {
        tokio::task::yield_now().await;
    }

    broker.delete_topic(client.reply_topic()).await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(1), waiting)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(result, Err(CorrelationError::Closed)));
    assert_eq!(client.in_flight(), 0);
    assert!(matches!(
        client.request(Double { n: 2 }).await,
        Err(CorrelationError::Closed)
    ));
}

#[tokio::test]
async fn test_close_deletes_private_reply_topic() {
    let broker = MemoryBroker::new();
    let client = client(&broker, Duration::from_secs(1)).await;
    let reply_topic = client.reply_topic().to_string();
    assert_eq!(broker.group_count(&reply_topic).await, 1);

    client.close().await;

    assert_eq!(broker.group_count(&reply_topic).await, 0);
}

#[tokio::test]
async fn test_shared_reply_topic_keeps_other_clients() {
    let broker = MemoryBroker::new();
    let (_responder, _shutdown) = start_responder(&broker, 1).await;
    let config = ClientConfig::builder()
        .request_topic(TOPIC)
        .reply_topic("math.double.reply")
        .timeout(Duration::from_secs(2))
        .build();
    let leaving: CorrelationClient<Double, Doubled> =
        CorrelationClient::start(Arc::new(broker.clone()), config.clone())
            .await
            .unwrap();
    let staying: CorrelationClient<Double, Doubled> =
        CorrelationClient::start(Arc::new(broker.clone()), config)
            .await
            .unwrap();
    assert_eq!(broker.group_count("math.double.reply").await, 2);

    leaving.close().await;

    assert_eq!(broker.group_count("math.double.reply").await, 1);
    let response = staying.request(Double { n: 4 }).await.unwrap();
    assert_eq!(response.payload.result, 8);
}

#[tokio::test]
async fn test_dropped_client_releases_its_group() {
    let broker = MemoryBroker::new();
    let client = client(&broker, Duration::from_secs(1)).await;
    let reply_topic = client.reply_topic().to_string();

    drop(client);

    tokio::time::timeout(Duration::from_secs(1), async {
        while broker.group_count(&reply_topic).await > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
}
