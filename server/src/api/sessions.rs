//! Session lifecycle endpoints.
//!
//! - `GET /api/sessions/:id` - Session details (staff)
//! - `POST /api/sessions/:id/claim` - Interviewer self-assignment (staff)
//! - `POST /api/sessions/:id/unclaim` - Clear the assignment (admin)
//! - `POST /api/sessions/:id/external-booking` - Record an external-calendar booking
//! - `POST /api/sessions/:id/recording/start` - Mark the upload as started
//! - `POST /api/sessions/:id/recording` - Attach recording and transcript
//! - `POST /api/sessions/:id/deliver` - Generate the share link and notify the customer

use super::SessionResponse;
use crate::alignment::spawn_alignment;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use dearly_booking::types::SessionId;
use serde::Deserialize;
use uuid::Uuid;

/// Request to record an external-calendar booking.
#[derive(Debug, Deserialize)]
pub struct ExternalBookingRequest {
    /// Interview start
    pub start: DateTime<Utc>,
    /// Interview end
    pub end: DateTime<Utc>,
}

/// Request to attach an uploaded recording.
#[derive(Debug, Deserialize)]
pub struct AttachRecordingRequest {
    /// Storage path of the uploaded audio
    pub audio_path: String,
    /// Storage path of the uploaded transcript
    pub transcript_path: String,
}

/// Session details. Staff only; customers see their session through the
/// manage page, not this endpoint.
pub async fn get_session(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.engine.session(actor, SessionId::from_uuid(id)).await?;
    Ok(Json(session.into()))
}

/// Claim a session. Of two concurrent claims exactly one succeeds.
pub async fn claim(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.engine.claim(actor, SessionId::from_uuid(id)).await?;
    Ok(Json(session.into()))
}

/// Clear the interviewer assignment (admin).
pub async fn unclaim(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.engine.unclaim(actor, SessionId::from_uuid(id)).await?;
    Ok(Json(session.into()))
}

/// Record a booking made through the external calendar integration.
pub async fn external_booking(
    AuthUser(_actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ExternalBookingRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .engine
        .register_external_booking(SessionId::from_uuid(id), request.start, request.end)
        .await?;
    Ok(Json(session.into()))
}

/// Signal that the recording upload has started.
pub async fn begin_recording(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .engine
        .begin_recording_upload(actor, SessionId::from_uuid(id))
        .await?;
    Ok(Json(session.into()))
}

/// Attach the uploaded recording and transcript, then kick off alignment
/// in the background.
pub async fn attach_recording(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachRecordingRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session_id = SessionId::from_uuid(id);
    let session = state
        .engine
        .attach_recording(
            actor,
            session_id,
            &request.audio_path,
            &request.transcript_path,
        )
        .await?;
    spawn_alignment(
        state.clone(),
        actor,
        session_id,
        request.audio_path,
        request.transcript_path,
    );
    Ok((StatusCode::ACCEPTED, Json(session.into())))
}

/// Deliver a processed session to the customer.
pub async fn deliver(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.engine.deliver(actor, SessionId::from_uuid(id)).await?;
    Ok(Json(session.into()))
}
