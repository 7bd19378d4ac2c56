//! Capability routing and response normalization.
//!
//! [`route`] is a pure function from the current mode and transcript to a
//! fully-specified request: endpoint URL, request body, and (because the
//! descriptor is a tagged variant) the parser for the response shape that
//! endpoint produces. Call sites never branch on mode again after routing.

use std::error::Error;
use std::fmt;

use crate::api::{ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImagesResponse};
use crate::core::message::Message;
use crate::utils::url::endpoint_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    Image,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Text => Mode::Image,
            Mode::Image => Mode::Text,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::Image => "image",
        }
    }
}

/// Session-fixed routing inputs: where requests go and which models they
/// name. Resolved once at startup from config, CLI flags, and environment.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
}

/// Why a turn failed. Both variants are caught at the turn controller
/// boundary and surfaced as the failure message; neither crashes the
/// session.
#[derive(Debug)]
pub enum TurnError {
    /// Network failure or non-success transport status.
    Transport(String),
    /// An expected field path was absent from an otherwise-successful
    /// response.
    MalformedResponse(String),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::Transport(msg) => write!(f, "{msg}"),
            TurnError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl Error for TurnError {}

/// A routed request: endpoint, body, and response parser in one tagged
/// value.
#[derive(Debug)]
pub enum RequestDescriptor {
    Chat { url: String, body: ChatRequest },
    Image { url: String, body: ImageRequest },
}

/// Map the current mode to a request descriptor. Pure; routing cannot
/// fail.
///
/// Text mode sends the full prior history plus the new user entry, each
/// reduced to `{role, content}`; image references never go upstream.
/// Image mode is stateless per turn: only the new user text is sent, with
/// fixed generation parameters.
pub fn route(
    mode: Mode,
    routing: &RoutingConfig,
    history: &[Message],
    user_text: &str,
) -> RequestDescriptor {
    match mode {
        Mode::Text => {
            let mut messages: Vec<ChatMessage> = history
                .iter()
                .map(|entry| ChatMessage {
                    role: entry.role.as_str().to_string(),
                    content: entry.content.clone(),
                })
                .collect();
            messages.push(ChatMessage {
                role: "user".to_string(),
                content: user_text.to_string(),
            });

            RequestDescriptor::Chat {
                url: endpoint_url(&routing.base_url, "chat/completions"),
                body: ChatRequest {
                    model: routing.chat_model.clone(),
                    messages,
                },
            }
        }
        Mode::Image => RequestDescriptor::Image {
            url: endpoint_url(&routing.base_url, "images/generations"),
            body: ImageRequest {
                model: routing.image_model.clone(),
                prompt: user_text.to_string(),
                n: 1,
                size: "1024x1024".to_string(),
            },
        },
    }
}

impl RequestDescriptor {
    pub fn url(&self) -> &str {
        match self {
            RequestDescriptor::Chat { url, .. } => url,
            RequestDescriptor::Image { url, .. } => url,
        }
    }

    /// Convert a raw provider response into a uniform assistant entry.
    /// Never inspects the transcript; a dangling user entry from an earlier
    /// failed turn is invisible here.
    pub fn normalize(&self, raw: serde_json::Value) -> Result<Message, TurnError> {
        match self {
            RequestDescriptor::Chat { .. } => {
                let response: ChatResponse = serde_json::from_value(raw).map_err(|e| {
                    TurnError::MalformedResponse(format!("unexpected chat completion shape: {e}"))
                })?;
                let choice = response.choices.into_iter().next().ok_or_else(|| {
                    TurnError::MalformedResponse("chat completion contained no choices".to_string())
                })?;
                Ok(Message::assistant(choice.message.content))
            }
            RequestDescriptor::Image { .. } => {
                let response: ImagesResponse = serde_json::from_value(raw).map_err(|e| {
                    TurnError::MalformedResponse(format!("unexpected image response shape: {e}"))
                })?;
                let image = response.data.into_iter().next().ok_or_else(|| {
                    TurnError::MalformedResponse("image response contained no results".to_string())
                })?;
                Ok(Message::assistant_image(
                    image.revised_prompt.unwrap_or_default(),
                    image.url,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;
    use serde_json::json;

    fn routing() -> RoutingConfig {
        RoutingConfig {
            base_url: "https://api.example.test/v1".to_string(),
            chat_model: "gpt-4".to_string(),
            image_model: "dall-e-3".to_string(),
        }
    }

    #[test]
    fn text_route_sends_full_history_plus_user_entry() {
        let history = vec![
            Message::system("sys"),
            Message::user("first"),
            Message::assistant_image("a cat", "https://x/img.png"),
        ];
        let descriptor = route(Mode::Text, &routing(), &history, "second");

        match descriptor {
            RequestDescriptor::Chat { url, body } => {
                assert_eq!(url, "https://api.example.test/v1/chat/completions");
                assert_eq!(body.model, "gpt-4");
                let pairs: Vec<(&str, &str)> = body
                    .messages
                    .iter()
                    .map(|m| (m.role.as_str(), m.content.as_str()))
                    .collect();
                assert_eq!(
                    pairs,
                    vec![
                        ("system", "sys"),
                        ("user", "first"),
                        ("assistant", "a cat"),
                        ("user", "second"),
                    ]
                );
            }
            other => panic!("expected chat descriptor, got {other:?}"),
        }
    }

    #[test]
    fn image_route_is_stateless_with_fixed_parameters() {
        let history = vec![Message::system("sys"), Message::user("earlier")];
        let descriptor = route(Mode::Image, &routing(), &history, "a red panda");

        match descriptor {
            RequestDescriptor::Image { url, body } => {
                assert_eq!(url, "https://api.example.test/v1/images/generations");
                assert_eq!(body.model, "dall-e-3");
                assert_eq!(body.prompt, "a red panda");
                assert_eq!(body.n, 1);
                assert_eq!(body.size, "1024x1024");
            }
            other => panic!("expected image descriptor, got {other:?}"),
        }
    }

    #[test]
    fn chat_normalize_extracts_first_choice() {
        let descriptor = route(Mode::Text, &routing(), &[], "hi");
        let entry = descriptor
            .normalize(json!({"choices": [{"message": {"content": "hello there"}}]}))
            .expect("normalizes");
        assert_eq!(entry.role, TranscriptRole::Assistant);
        assert_eq!(entry.content, "hello there");
        assert!(entry.image_url.is_none());
    }

    #[test]
    fn chat_normalize_rejects_missing_field_path() {
        let descriptor = route(Mode::Text, &routing(), &[], "hi");
        let err = descriptor
            .normalize(json!({"choices": [{"message": {}}]}))
            .expect_err("missing content");
        assert!(matches!(err, TurnError::MalformedResponse(_)));

        let err = descriptor
            .normalize(json!({"choices": []}))
            .expect_err("no choices");
        assert!(matches!(err, TurnError::MalformedResponse(_)));
    }

    #[test]
    fn image_normalize_requires_url_but_not_revised_prompt() {
        let descriptor = route(Mode::Image, &routing(), &[], "a cat");

        let entry = descriptor
            .normalize(json!({"data": [{"url": "https://x/img.png", "revised_prompt": "a cat"}]}))
            .expect("normalizes");
        assert_eq!(entry.content, "a cat");
        assert_eq!(entry.image_url.as_deref(), Some("https://x/img.png"));

        let entry = descriptor
            .normalize(json!({"data": [{"url": "https://x/img.png"}]}))
            .expect("revised_prompt is optional");
        assert_eq!(entry.content, "");
        assert_eq!(entry.image_url.as_deref(), Some("https://x/img.png"));

        let err = descriptor
            .normalize(json!({"data": [{"revised_prompt": "a cat"}]}))
            .expect_err("url is required");
        assert!(matches!(err, TurnError::MalformedResponse(_)));
    }

    #[test]
    fn mode_toggles_between_the_two_capabilities() {
        assert_eq!(Mode::Text.toggled(), Mode::Image);
        assert_eq!(Mode::Image.toggled(), Mode::Text);
        assert_eq!(Mode::Text.label(), "text");
        assert_eq!(Mode::Image.label(), "image");
    }
}
