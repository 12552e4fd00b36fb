//! Row structs and row-to-domain conversions.
//!
//! Statuses are stored as their stable string forms; a value that fails to
//! parse is a corrupt row and surfaces as an internal error, never as a
//! user-facing one.

use chrono::{DateTime, Utc};
use dearly_booking::error::{BookingError, Result};
use dearly_booking::types::{
    Appointment, AppointmentId, AppointmentStatus, AvailabilitySlot, BookingChannel,
    ProcessingStatus, Session, SessionId, SessionStatus, SlotId, UserId,
};
use sqlx::FromRow;
use uuid::Uuid;

fn corrupt(column: &str, value: &str) -> BookingError {
    BookingError::Internal(format!("corrupt {column} value in row: {value:?}"))
}

#[derive(FromRow)]
pub(crate) struct SlotRow {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booked: bool,
    pub created_by: Uuid,
}

impl From<SlotRow> for AvailabilitySlot {
    fn from(row: SlotRow) -> Self {
        Self {
            id: SlotId::from_uuid(row.id),
            start_time: row.start_time,
            end_time: row.end_time,
            booked: row.booked,
            created_by: UserId::from_uuid(row.created_by),
        }
    }
}

#[derive(FromRow)]
pub(crate) struct SessionRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_email: String,
    pub status: String,
    pub channel: String,
    pub interviewer_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub amount_cents: i64,
    pub audio_path: Option<String>,
    pub transcript_path: Option<String>,
    pub alignment_json: Option<String>,
    pub processing: Option<String>,
    pub share_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = BookingError;

    fn try_from(row: SessionRow) -> Result<Self> {
        let status =
            SessionStatus::parse(&row.status).ok_or_else(|| corrupt("status", &row.status))?;
        let channel =
            BookingChannel::parse(&row.channel).ok_or_else(|| corrupt("channel", &row.channel))?;
        let processing = row
            .processing
            .as_deref()
            .map(|s| ProcessingStatus::parse(s).ok_or_else(|| corrupt("processing", s)))
            .transpose()?;
        Ok(Self {
            id: SessionId::from_uuid(row.id),
            customer_id: UserId::from_uuid(row.customer_id),
            customer_email: row.customer_email,
            status,
            channel,
            interviewer_id: row.interviewer_id.map(UserId::from_uuid),
            appointment_id: row.appointment_id.map(AppointmentId::from_uuid),
            scheduled_start: row.scheduled_start,
            scheduled_end: row.scheduled_end,
            amount_cents: row.amount_cents,
            audio_path: row.audio_path,
            transcript_path: row.transcript_path,
            alignment_json: row.alignment_json,
            processing,
            share_token: row.share_token,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub customer_id: Uuid,
    pub slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub manage_token: String,
    pub reminder_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = BookingError;

    fn try_from(row: AppointmentRow) -> Result<Self> {
        let status =
            AppointmentStatus::parse(&row.status).ok_or_else(|| corrupt("status", &row.status))?;
        Ok(Self {
            id: AppointmentId::from_uuid(row.id),
            session_id: SessionId::from_uuid(row.session_id),
            customer_id: UserId::from_uuid(row.customer_id),
            slot_id: SlotId::from_uuid(row.slot_id),
            start_time: row.start_time,
            end_time: row.end_time,
            status,
            manage_token: row.manage_token,
            reminder_sent_at: row.reminder_sent_at,
            created_at: row.created_at,
        })
    }
}

/// Rewrite every mutable session column. Shared by the session store and
/// the paired appointment+session transactions.
pub(crate) async fn update_session<'e, E>(executor: E, session: &Session) -> Result<u64>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        r"
        UPDATE sessions
        SET status = $2,
            channel = $3,
            interviewer_id = $4,
            appointment_id = $5,
            scheduled_start = $6,
            scheduled_end = $7,
            audio_path = $8,
            transcript_path = $9,
            alignment_json = $10,
            processing = $11,
            share_token = $12
        WHERE id = $1
        ",
    )
    .bind(session.id.0)
    .bind(session.status.as_str())
    .bind(session.channel.as_str())
    .bind(session.interviewer_id.map(|u| u.0))
    .bind(session.appointment_id.map(|a| a.0))
    .bind(session.scheduled_start)
    .bind(session.scheduled_end)
    .bind(session.audio_path.as_deref())
    .bind(session.transcript_path.as_deref())
    .bind(session.alignment_json.as_deref())
    .bind(session.processing.map(ProcessingStatus::as_str))
    .bind(session.share_token.as_deref())
    .execute(executor)
    .await
    .map_err(BookingError::database)?;
    Ok(result.rows_affected())
}
