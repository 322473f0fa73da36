use std::sync::Arc;

use crate::providers::base::Provider;
use crate::providers::utils::clean_completion;

pub const DEFAULT_PERSONA: &str = "You are StudyHub AI, a helpful assistant that provides \
information about the StudyHub website and other related services.";

/// Turns a user's query into text that can be shown back to them.
///
/// Never fails: upstream errors are rendered as `"Error: ..."` strings.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
    persona: String,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }

    pub fn with_persona<S: Into<String>>(mut self, persona: S) -> Self {
        self.persona = persona.into();
        self
    }

    pub async fn complete(&self, query: &str) -> String {
        match self.provider.complete(&self.persona, query).await {
            Ok(content) => clean_completion(&content, query),
            Err(err) => {
                tracing::warn!(error = %err, "completion failed, replying with error text");
                err.display_text()
            }
        }
    }
}
