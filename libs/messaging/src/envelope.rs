use serde::{Deserialize, Serialize};

/// Request envelope. Payload fields sit next to the routing fields:
/// `{"correlation_id": .., "reply_topic": .., "user_id": 42}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationRequest<P> {
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default)]
    pub reply_topic: String,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> CorrelationRequest<P> {
    /// A request can only be answered when both routing fields are set.
    pub fn is_routable(&self) -> bool {
        !self.correlation_id.is_empty() && !self.reply_topic.is_empty()
    }
}

/// Reply envelope: `{"correlation_id": .., "valid": true, "role_names": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationResponse<R> {
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default)]
    pub valid: bool,
    #[serde(flatten)]
    pub payload: R,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Lookup {
        user_id: i64,
    }

    #[test]
    fn test_request_wire_shape() {
        let request = CorrelationRequest {
            correlation_id: "abc".into(),
            reply_topic: "reply.abc".into(),
            payload: Lookup { user_id: 42 },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"correlation_id": "abc", "reply_topic": "reply.abc", "user_id": 42})
        );
    }

    #[test]
    fn test_missing_routing_fields() {
        let request: CorrelationRequest<Lookup> =
            serde_json::from_value(json!({"user_id": 1, "correlation_id": "x"})).unwrap();

        assert_eq!(request.reply_topic, "");
        assert!(!request.is_routable());
    }
}
