use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::base::Provider;
use super::configs::OpenAiProviderConfig;
use super::utils::{classify_status, first_choice_content};
use crate::errors::{CompletionError, CompletionResult};
use crate::models::message::CompletionRequest;

pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, request: &CompletionRequest) -> CompletionResult<Value> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(self.config.api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: Value = response.json().await?;
            tracing::debug!(body = %body, "completion API response");
            return Ok(body);
        }

        // Upstream failures are reported to the user, never retried
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    status = %status,
                    error = %e,
                    "failed to read completion API error body"
                );
                String::new()
            }
        };
        let err = classify_status(status, &body);
        match &err {
            CompletionError::Unauthorized => {
                tracing::error!("unauthorized calling completion API, check the API key")
            }
            _ => tracing::error!(status = %status, error = %err, "completion API call failed"),
        }
        Err(err)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, system: &str, query: &str) -> CompletionResult<String> {
        let request = CompletionRequest::new(&self.config.model, system, query)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        let response = self.post(&request).await?;
        first_choice_content(&response)
    }
}
