//! Publish/subscribe plumbing and the correlation-ID request/reply protocol
//! layered on top of it.

pub mod broker;
pub mod client;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod redis_stream;
pub mod responder;

pub use broker::{Broker, Delivery, Subscription};
pub use client::{ClientConfig, CorrelationClient, DEFAULT_TIMEOUT};
pub use envelope::{CorrelationRequest, CorrelationResponse};
pub use error::{BrokerError, CorrelationError};
pub use memory::MemoryBroker;
pub use redis_stream::RedisStreamBroker;
pub use responder::{CorrelationHandler, CorrelationResponder, Outcome};
