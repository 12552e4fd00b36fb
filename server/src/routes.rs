//! Router configuration.

use crate::api::{bookings, sessions, slots, webhooks};
use crate::state::AppState;
use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Availability slots
        .route("/slots", get(slots::list_slots))
        .route("/slots", post(slots::generate_slots))
        .route("/slots/:id", delete(slots::delete_slot))
        // Bookings and the token-addressed manage page
        .route("/bookings", post(bookings::book))
        .route("/bookings/:token", get(bookings::get_booking))
        .route("/bookings/:token/reschedule", post(bookings::reschedule))
        .route("/bookings/:token/cancel", post(bookings::cancel))
        // Session lifecycle
        .route("/sessions/:id", get(sessions::get_session))
        .route("/sessions/:id/claim", post(sessions::claim))
        .route("/sessions/:id/unclaim", post(sessions::unclaim))
        .route(
            "/sessions/:id/external-booking",
            post(sessions::external_booking),
        )
        .route(
            "/sessions/:id/recording/start",
            post(sessions::begin_recording),
        )
        .route("/sessions/:id/recording", post(sessions::attach_recording))
        .route("/sessions/:id/deliver", post(sessions::deliver))
        // Inbound webhooks
        .route("/webhooks/payment", post(webhooks::payment_confirmed));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Liveness probe.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
