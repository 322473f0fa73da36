use intentbridge::webhook::WebhookHandler;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<WebhookHandler>,
}

impl AppState {
    pub fn new(handler: WebhookHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}
