use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the chat completion API.
///
/// None of these are surfaced to the webhook caller as protocol errors; they are
/// rendered into the fulfillment text through [`CompletionError::display_text`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("Unauthorized. Please check your API key.")]
    Unauthorized,

    #[error("{message}")]
    ClientError { status: StatusCode, message: String },

    #[error("{message}")]
    ServerError { status: StatusCode, message: String },

    #[error("{0}")]
    Unreachable(String),

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// Text shown to the end user in place of a model answer
    pub fn display_text(&self) -> String {
        format!("Error: {}", self)
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Unreachable("Request to completion API timed out".to_string())
        } else if err.is_decode() {
            CompletionError::InvalidResponse(err.to_string())
        } else {
            CompletionError::Unreachable(format!("Completion API unreachable: {}", err))
        }
    }
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WebhookError {
    #[error("Malformed inbound event: missing {0}")]
    MalformedInboundEvent(String),
}

pub type CompletionResult<T> = Result<T, CompletionError>;
