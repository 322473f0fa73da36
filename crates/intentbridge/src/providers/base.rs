use async_trait::async_trait;

use crate::errors::CompletionResult;

/// Base trait for chat completion backends (OpenAI and compatible APIs)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Ask the model to answer `query` under the `system` persona and return the
    /// raw content of the first choice
    async fn complete(&self, system: &str, query: &str) -> CompletionResult<String>;
}
