use regex::RegexBuilder;
use reqwest::StatusCode;
use serde_json::Value;

use crate::errors::{CompletionError, CompletionResult};

/// Reply used whenever there is nothing better to say
pub const DEFAULT_RESPONSE: &str = "Default response";

/// Remove the first case-insensitive occurrence of `query` from `content` and trim.
///
/// Models sometimes restate the question before answering. The query is matched
/// literally, so characters like `?` or `(` in it are not treated as patterns.
pub fn strip_echo(content: &str, query: &str) -> String {
    if query.is_empty() {
        return content.trim().to_string();
    }

    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replacen(content, 1, "").trim().to_string(),
        // only reachable for queries too large to compile
        Err(_) => content.trim().to_string(),
    }
}

/// Strip the echoed query, falling back to [`DEFAULT_RESPONSE`] when nothing is left
pub fn clean_completion(content: &str, query: &str) -> String {
    let cleaned = strip_echo(content, query);
    if cleaned.is_empty() {
        DEFAULT_RESPONSE.to_string()
    } else {
        cleaned
    }
}

/// Pull `choices[0].message.content` out of an OpenAI chat completion response
pub fn first_choice_content(response: &Value) -> CompletionResult<String> {
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        return Err(CompletionError::InvalidResponse(message.to_string()));
    }

    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| {
            CompletionError::InvalidResponse("no message content in first choice".to_string())
        })
}

/// Build the upstream message for a failed call: `"<status>: <detail>"`
///
/// The detail is the OpenAI `error.message` when the body is an error object,
/// otherwise the raw body.
pub fn upstream_error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, detail)
    }
}

/// Map a non-success status into the matching [`CompletionError`]
pub fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    if status == StatusCode::UNAUTHORIZED {
        return CompletionError::Unauthorized;
    }

    let message = upstream_error_message(status, body);
    if status.is_client_error() {
        CompletionError::ClientError { status, message }
    } else if status.is_server_error() {
        CompletionError::ServerError { status, message }
    } else {
        // informational or unfollowed redirect, not an answer and not an upstream fault
        CompletionError::InvalidResponse(message)
    }
}
