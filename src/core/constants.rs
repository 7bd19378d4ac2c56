//! Shared constants used across the application

/// System prompt seeding every transcript.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Chat-completion model used when neither config nor CLI overrides one.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";

/// Image-generation model used when neither config nor CLI overrides one.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// API base URL used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
