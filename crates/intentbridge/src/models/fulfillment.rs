use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::WebhookError;

const INTENT_NAME_PATH: &str = "queryResult.intent.displayName";
const QUERY_TEXT_PATH: &str = "queryResult.queryText";

/// The parts of a Dialogflow webhook request this service reads
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub intent_name: String,
    pub query_text: Option<String>,
}

impl InboundEvent {
    /// Extract the event from a raw webhook payload.
    ///
    /// The intent name is mandatory. The query text is kept optional here and only
    /// checked by [`InboundEvent::require_query_text`] when an intent needs it.
    pub fn from_value(payload: &Value) -> Result<Self, WebhookError> {
        let intent_name = payload
            .pointer("/queryResult/intent/displayName")
            .and_then(Value::as_str)
            .ok_or_else(|| WebhookError::MalformedInboundEvent(INTENT_NAME_PATH.to_string()))?
            .to_string();

        let query_text = payload
            .pointer("/queryResult/queryText")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(Self {
            intent_name,
            query_text,
        })
    }

    pub fn require_query_text(&self) -> Result<&str, WebhookError> {
        self.query_text
            .as_deref()
            .ok_or_else(|| WebhookError::MalformedInboundEvent(QUERY_TEXT_PATH.to_string()))
    }
}

/// Webhook response in the shape Dialogflow renders as a text reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEvent {
    pub fulfillment_messages: Vec<FulfillmentMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentMessage {
    pub text: FulfillmentText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentText {
    pub text: Vec<String>,
}

impl OutboundEvent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            fulfillment_messages: vec![FulfillmentMessage {
                text: FulfillmentText {
                    text: vec![text.into()],
                },
            }],
        }
    }

    /// First text of the first message, if any
    pub fn response_text(&self) -> Option<&str> {
        self.fulfillment_messages
            .first()
            .and_then(|message| message.text.text.first())
            .map(String::as_str)
    }
}
