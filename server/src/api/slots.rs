//! Availability-slot endpoints.
//!
//! - `GET /api/slots` - List open future slots (public)
//! - `POST /api/slots` - Generate hourly slots for a window (admin)
//! - `DELETE /api/slots/:id` - Delete an unbooked future slot (admin)

use super::SlotResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use dearly_booking::types::SlotId;
use serde::Deserialize;
use uuid::Uuid;

/// Request to generate slots for a window.
#[derive(Debug, Deserialize)]
pub struct GenerateSlotsRequest {
    /// Window start (rounded up to the next full hour)
    pub window_start: DateTime<Utc>,
    /// Window end (exclusive)
    pub window_end: DateTime<Utc>,
}

/// List open future slots, ascending by start time.
pub async fn list_slots(
    State(state): State<AppState>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let slots = state.engine.list_open_slots().await?;
    Ok(Json(slots.into_iter().map(Into::into).collect()))
}

/// Generate hourly slots for a window. All-or-nothing on overlap.
pub async fn generate_slots(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<GenerateSlotsRequest>,
) -> Result<(StatusCode, Json<Vec<SlotResponse>>), AppError> {
    let slots = state
        .engine
        .generate_slots(actor, request.window_start, request.window_end)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(slots.into_iter().map(Into::into).collect()),
    ))
}

/// Delete a slot while it is unbooked and in the future.
pub async fn delete_slot(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .engine
        .delete_slot(actor, SlotId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
