//! Booking endpoints: the slot-system channel and the self-service
//! manage page behind it.
//!
//! - `POST /api/bookings` - Book a slot for a paid session (authenticated)
//! - `GET /api/bookings/:token` - Appointment behind a manage token (token is the credential)
//! - `POST /api/bookings/:token/reschedule` - Move onto a new slot
//! - `POST /api/bookings/:token/cancel` - Cancel and roll the session back to paid

use super::AppointmentResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use dearly_booking::types::{SessionId, SlotId};
use serde::Deserialize;
use uuid::Uuid;

/// Request to book a slot.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    /// Paid session to book for
    pub session_id: Uuid,
    /// Slot to reserve
    pub slot_id: Uuid,
}

/// Request to reschedule onto a new slot.
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    /// The new slot
    pub new_slot_id: Uuid,
}

/// Book a slot for a paid session.
///
/// The actor only needs to be authenticated; the engine decides whether
/// the session and slot admit the booking.
pub async fn book(
    AuthUser(_actor): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<BookRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let appointment = state
        .engine
        .book(
            SessionId::from_uuid(request.session_id),
            SlotId::from_uuid(request.slot_id),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

/// Fetch the appointment behind a manage token. The token itself is the
/// credential; there is no separate login for the manage page.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state.engine.appointment_by_token(&token).await?;
    Ok(Json(appointment.into()))
}

/// Reschedule the appointment onto a new slot.
pub async fn reschedule(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state
        .engine
        .reschedule(&token, SlotId::from_uuid(request.new_slot_id))
        .await?;
    Ok(Json(appointment.into()))
}

/// Cancel the appointment; the owning session returns to `paid`.
pub async fn cancel(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state.engine.cancel(&token).await?;
    Ok(Json(appointment.into()))
}
