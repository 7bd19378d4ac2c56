//! Spawned request lifecycle.
//!
//! The event loop must keep rendering while a turn is in flight, so the
//! network call runs on its own tokio task and reports back over an
//! unbounded channel. Outcomes carry the turn id they were spawned with so
//! the loop can correlate them against the submission that produced them.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::client::{execute_turn, Transport};
use crate::auth::Credentials;
use crate::core::dispatch::RequestDescriptor;
use crate::core::message::Message;

#[derive(Debug)]
pub enum TurnOutcome {
    Completed(Message),
    Failed(String),
}

pub struct TurnParams {
    pub transport: Arc<dyn Transport>,
    pub credentials: Credentials,
    pub descriptor: RequestDescriptor,
    pub turn_id: u64,
}

#[derive(Clone)]
pub struct TurnService {
    tx: mpsc::UnboundedSender<(TurnOutcome, u64)>,
}

impl TurnService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(TurnOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_turn(&self, params: TurnParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let TurnParams {
                transport,
                credentials,
                descriptor,
                turn_id,
            } = params;

            debug!(turn_id, "turn request started");
            let outcome = match execute_turn(transport.as_ref(), &credentials, descriptor).await {
                Ok(entry) => TurnOutcome::Completed(entry),
                Err(err) => TurnOutcome::Failed(err.to_string()),
            };
            debug!(turn_id, "turn request finished");

            // The receiver only drops on session teardown.
            let _ = tx.send((outcome, turn_id));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::{route, Mode, RoutingConfig, TurnError};
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticTransport(serde_json::Value);

    #[async_trait]
    impl Transport for StaticTransport {
        async fn execute(
            &self,
            _descriptor: &RequestDescriptor,
            _credentials: &Credentials,
        ) -> Result<serde_json::Value, TurnError> {
            Ok(self.0.clone())
        }
    }

    fn descriptor() -> RequestDescriptor {
        route(
            Mode::Text,
            &RoutingConfig {
                base_url: "https://api.example.test/v1".to_string(),
                chat_model: "gpt-4".to_string(),
                image_model: "dall-e-3".to_string(),
            },
            &[],
            "hello",
        )
    }

    #[tokio::test]
    async fn spawned_turn_delivers_its_outcome_with_the_turn_id() {
        let (service, mut rx) = TurnService::new();
        service.spawn_turn(TurnParams {
            transport: Arc::new(StaticTransport(json!({
                "choices": [{"message": {"content": "hi"}}]
            }))),
            credentials: Credentials::new("test-key"),
            descriptor: descriptor(),
            turn_id: 7,
        });

        let (outcome, turn_id) = rx.recv().await.expect("outcome delivered");
        assert_eq!(turn_id, 7);
        match outcome {
            TurnOutcome::Completed(entry) => assert_eq!(entry.content, "hi"),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_delivered_as_failure() {
        let (service, mut rx) = TurnService::new();
        service.spawn_turn(TurnParams {
            transport: Arc::new(StaticTransport(json!({"choices": []}))),
            credentials: Credentials::new("test-key"),
            descriptor: descriptor(),
            turn_id: 1,
        });

        let (outcome, _) = rx.recv().await.expect("outcome delivered");
        assert!(matches!(outcome, TurnOutcome::Failed(_)));
    }
}
