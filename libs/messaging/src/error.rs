use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Broker connection error: {0}")]
    Connection(String),
    #[error("Broker command failed: {0}")]
    Command(String),
    #[error("Subscription closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum CorrelationError {
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error("Failed to encode request: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("No reply for {correlation_id} within {timeout:?}")]
    TimedOut {
        correlation_id: String,
        timeout: Duration,
    },
    #[error("Reply listener stopped")]
    Closed,
}
