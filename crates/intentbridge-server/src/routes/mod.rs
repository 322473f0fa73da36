// Export route modules
pub mod webhook;

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(webhook::routes(state))
        .layer(TraceLayer::new_for_http())
}
