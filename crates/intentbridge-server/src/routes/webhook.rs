use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use intentbridge::{errors::WebhookError, models::fulfillment::OutboundEvent};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Rejection for payloads the handler cannot answer
pub struct WebhookRejection(WebhookError);

impl From<WebhookError> for WebhookRejection {
    fn from(err: WebhookError) -> Self {
        WebhookRejection(err)
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "rejecting webhook call");
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

// Dialogflow fulfillment call. Completion failures still answer 200 with the error as text.
async fn handler(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<OutboundEvent>, WebhookRejection> {
    let outbound = state.handler.handle(&payload).await?;
    Ok(Json(outbound))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handler))
        .with_state(state)
}
