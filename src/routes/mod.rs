use axum::{Router, routing::get};

use crate::{realtime::gateway, state::AppState};

pub mod auth;
pub mod doc;
pub mod establishments;
pub mod health;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/establishments", establishments::router())
        .nest("/orders", orders::router())
}

/// Full application router: health, `/api`, the realtime socket and docs.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(gateway::ws_handler))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .with_state(state)
}
