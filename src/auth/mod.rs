//! Credential and endpoint resolution from the process environment.
//!
//! The API key is treated as an opaque secret: read once at startup,
//! carried in [`Credentials`], and never logged or printed.

use std::env;
use std::error::Error;
use std::fmt;

use crate::core::constants::DEFAULT_BASE_URL;

const MISSING_KEY_HELP: &str = "Error: OPENAI_API_KEY environment variable not set

Please set your OpenAI API key:
export OPENAI_API_KEY=\"your-api-key-here\"

Optionally, you can also set a custom base URL:
export OPENAI_BASE_URL=\"https://api.openai.com/v1\"";

#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Everything the session needs from the environment: the bearer secret
/// and the endpoint base URL.
pub struct EnvSession {
    pub credentials: Credentials,
    pub base_url: String,
}

pub fn resolve_env() -> Result<EnvSession, Box<dyn Error>> {
    let api_key = env::var("OPENAI_API_KEY").map_err(|_| MISSING_KEY_HELP)?;
    let base_url =
        env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    Ok(EnvSession {
        credentials: Credentials::new(api_key),
        base_url,
    })
}
