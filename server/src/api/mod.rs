//! HTTP API handlers.

pub mod bookings;
pub mod sessions;
pub mod slots;
pub mod webhooks;

use chrono::{DateTime, Utc};
use dearly_booking::types::{Appointment, AvailabilitySlot, Session};
use serde::Serialize;
use uuid::Uuid;

/// Availability slot as returned to clients.
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    /// Slot ID
    pub id: Uuid,
    /// Interval start
    pub start_time: DateTime<Utc>,
    /// Interval end
    pub end_time: DateTime<Utc>,
    /// Whether an active appointment holds the slot
    pub booked: bool,
}

impl From<AvailabilitySlot> for SlotResponse {
    fn from(slot: AvailabilitySlot) -> Self {
        Self {
            id: slot.id.0,
            start_time: slot.start_time,
            end_time: slot.end_time,
            booked: slot.booked,
        }
    }
}

/// Appointment as returned to clients.
///
/// The manage token is included: the caller either just created the
/// appointment or presented the token to fetch it.
#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    /// Appointment ID
    pub id: Uuid,
    /// Owning session ID
    pub session_id: Uuid,
    /// Interval start
    pub start_time: DateTime<Utc>,
    /// Interval end
    pub end_time: DateTime<Utc>,
    /// `scheduled` or `cancelled`
    pub status: String,
    /// Self-service manage token
    pub manage_token: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id.0,
            session_id: appointment.session_id.0,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status.as_str().to_string(),
            manage_token: appointment.manage_token,
        }
    }
}

/// Session as returned to clients.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session ID
    pub id: Uuid,
    /// Lifecycle status
    pub status: String,
    /// Booking channel
    pub channel: String,
    /// Assigned interviewer, if claimed
    pub interviewer_id: Option<Uuid>,
    /// Active appointment, if booked through the slot system
    pub appointment_id: Option<Uuid>,
    /// Cached interview start
    pub scheduled_start: Option<DateTime<Utc>>,
    /// Cached interview end
    pub scheduled_end: Option<DateTime<Utc>>,
    /// Recording-processing status, once an upload started
    pub processing: Option<String>,
    /// Playback share token, once delivered
    pub share_token: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id.0,
            status: session.status.as_str().to_string(),
            channel: session.channel.as_str().to_string(),
            interviewer_id: session.interviewer_id.map(|u| u.0),
            appointment_id: session.appointment_id.map(|a| a.0),
            scheduled_start: session.scheduled_start,
            scheduled_end: session.scheduled_end,
            processing: session.processing.map(|p| p.as_str().to_string()),
            share_token: session.share_token,
        }
    }
}
