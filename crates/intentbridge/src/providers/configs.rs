use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer credential for the completion API. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        ApiKey(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    /// Full chat completions URL, posted to as given
    pub endpoint: String,
    pub api_key: ApiKey,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    pub timeout: Duration,
}

impl OpenAiProviderConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            endpoint: OPENAI_ENDPOINT.to_string(),
            api_key,
            model: OPENAI_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
