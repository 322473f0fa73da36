use crate::completion::CompletionClient;
use crate::errors::WebhookError;
use crate::models::fulfillment::{InboundEvent, OutboundEvent};
use crate::providers::utils::DEFAULT_RESPONSE;
use serde_json::Value;

pub const DEFAULT_FALLBACK_INTENT: &str = "Default Fallback Intent";

/// Answers Dialogflow fulfillment calls.
///
/// Only the fallback intent reaches the model. Every other intent gets
/// [`DEFAULT_RESPONSE`] and is left to the agent's own configured responses.
#[derive(Clone)]
pub struct WebhookHandler {
    client: CompletionClient,
    fallback_intent: String,
}

impl WebhookHandler {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            fallback_intent: DEFAULT_FALLBACK_INTENT.to_string(),
        }
    }

    pub fn with_fallback_intent<S: Into<String>>(mut self, label: S) -> Self {
        self.fallback_intent = label.into();
        self
    }

    pub async fn handle(&self, payload: &Value) -> Result<OutboundEvent, WebhookError> {
        let event = InboundEvent::from_value(payload)?;
        tracing::info!(intent = %event.intent_name, "received intent");

        let mut response_text = DEFAULT_RESPONSE.to_string();
        if event.intent_name == self.fallback_intent {
            let query = event.require_query_text()?;
            tracing::info!(query = %query, "user query");

            response_text = self.client.complete(query).await;
            tracing::info!(text = %response_text, "completion text");
        }

        let outbound = OutboundEvent::text(response_text);
        if let Ok(serialized) = serde_json::to_string(&outbound) {
            tracing::info!(response = %serialized, "fulfillment response");
        }
        Ok(outbound)
    }
}
