pub mod health;
pub mod whatsapp;

pub use health::health_check;
pub use whatsapp::{receive_message, verify_webhook};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/whatsapp", get(verify_webhook).post(receive_message))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
