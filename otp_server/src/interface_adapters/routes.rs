use crate::interface_adapters::handlers::{health, send_otp, verify_otp};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/send-otp", post(send_otp))
        .route("/api/verify-otp", post(verify_otp))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
