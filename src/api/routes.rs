use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::cors::{cors_layer, enforce_origin, OriginPolicy};
use super::handlers;
use crate::AppState;

/// Build the HTTP router with the CORS policy and request tracing applied
pub fn router(state: AppState) -> Router {
    let policy = OriginPolicy::new(state.config.allowed_origins());

    Router::new()
        .route("/api/twitch/streams", get(handlers::list_streams))
        .route("/auth/twitch/callback", post(handlers::twitch_callback))
        .with_state(state)
        .layer(cors_layer(policy.clone()))
        // Outside the CORS layer so rejected preflights are logged too
        .layer(middleware::from_fn_with_state(policy, enforce_origin))
        .layer(TraceLayer::new_for_http())
}
