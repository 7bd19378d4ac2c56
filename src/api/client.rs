//! Transport boundary for routed requests.
//!
//! A [`Transport`] executes a [`RequestDescriptor`] and yields the raw JSON
//! body of a successful response. Everything transport-level (connection
//! failures, non-success statuses, unparseable bodies) is folded into the
//! [`TurnError`] taxonomy here; normalization of the body into a transcript
//! entry stays with the descriptor that produced the request.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::core::dispatch::{RequestDescriptor, TurnError};
use crate::core::message::Message;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<serde_json::Value, TurnError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<serde_json::Value, TurnError> {
        debug!(url = descriptor.url(), "dispatching turn request");

        let request = match descriptor {
            RequestDescriptor::Chat { url, body } => self.client.post(url).json(body),
            RequestDescriptor::Image { url, body } => self.client.post(url).json(body),
        };

        let response = request
            .header("Content-Type", "application/json")
            .header(
                "Authorization",
                format!("Bearer {}", credentials.api_key()),
            )
            .send()
            .await
            .map_err(|e| {
                warn!("turn request failed to send: {e}");
                TurnError::Transport(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "turn request returned non-success status");
            return Err(TurnError::Transport(format!(
                "request failed with status {status}"
            )));
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            TurnError::MalformedResponse(format!("response body was not valid JSON: {e}"))
        })
    }
}

/// Drive one routed request end-to-end: execute the transport call, then
/// hand the raw body to the descriptor's normalizer. This is the single
/// suspension point of a turn.
pub async fn execute_turn(
    transport: &dyn Transport,
    credentials: &Credentials,
    descriptor: RequestDescriptor,
) -> Result<Message, TurnError> {
    let raw = transport.execute(&descriptor, credentials).await?;
    descriptor.normalize(raw)
}
