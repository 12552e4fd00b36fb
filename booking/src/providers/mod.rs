//! Capability traits the booking engine depends on.
//!
//! Each external collaborator (datastore tables, clock, outbound email) is
//! one trait. Implementations live in `dearly-postgres` (persistent) and in
//! [`crate::mocks`] (in-memory, for tests). The traits carry no policy: all
//! authorization happens inside the engine operations, so a storage
//! credential with ambient bypass power never exists.

use crate::error::Result;
use crate::types::{
    Appointment, AppointmentId, AvailabilitySlot, Session, SessionId, SlotId, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Time source. Injected so tests can pin the clock.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Storage for availability slots.
///
/// The slot table is the only shared mutable resource contended by multiple
/// actors, so its one mutating path is a conditional update: [`reserve`]
/// applies only if the row is still unbooked, making it the sole
/// reservation mechanism (there is no separate check-then-set).
///
/// [`reserve`]: SlotRepository::reserve
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert a generated batch. All-or-nothing at the request level.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn insert_batch(&self, slots: &[AvailabilitySlot]) -> Result<()>;

    /// Point read by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::NotFound`] if the slot does not exist.
    async fn get(&self, id: SlotId) -> Result<AvailabilitySlot>;

    /// All slots whose interval intersects `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn list_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilitySlot>>;

    /// Unbooked slots starting at or after `from`, ascending by start.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn list_open(&self, from: DateTime<Utc>) -> Result<Vec<AvailabilitySlot>>;

    /// Compare-and-swap reservation: flip `booked` to `true` only if it is
    /// still `false` and the slot starts strictly after `now`.
    ///
    /// Returns `true` if the write applied, `false` if the predicate no
    /// longer held (someone else won, or the slot slipped into the past).
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure; a lost
    /// race is `Ok(false)`, not an error.
    async fn reserve(&self, id: SlotId, now: DateTime<Utc>) -> Result<bool>;

    /// Release a slot (idempotent; releasing an unbooked slot is a no-op).
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn release(&self, id: SlotId) -> Result<()>;

    /// Delete a slot only while it is unbooked and starts after `now`.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn delete_unbooked(&self, id: SlotId, now: DateTime<Utc>) -> Result<bool>;
}

/// Storage for sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn insert(&self, session: &Session) -> Result<()>;

    /// Point read by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::NotFound`] if the session does not exist.
    async fn get(&self, id: SessionId) -> Result<Session>;

    /// Rewrite a session row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::NotFound`] if the session does not
    /// exist, [`crate::BookingError::Internal`] on storage failure.
    async fn update(&self, session: &Session) -> Result<()>;

    /// Compare-and-swap claim: set `interviewer_id` only if it is still
    /// null and the status is still `paid`.
    ///
    /// Returns `true` if the write applied; `false` means a concurrent
    /// claim won (or the status moved), never an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn claim(&self, id: SessionId, interviewer: UserId) -> Result<bool>;

    /// Unconditionally clear the interviewer assignment (admin action).
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::NotFound`] if the session does not
    /// exist, [`crate::BookingError::Internal`] on storage failure.
    async fn clear_interviewer(&self, id: SessionId) -> Result<()>;
}

/// Storage for appointments.
///
/// The two `*_with_session` writes pair the appointment mutation with the
/// owning session's cache rewrite. Persistent implementations apply both in
/// one transaction; the in-memory mock applies them under one lock. Either
/// way, the caller can treat the pair as a unit and compensate only the
/// slot reservation when it fails.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Point read by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::NotFound`] if the appointment does not exist.
    async fn get(&self, id: AppointmentId) -> Result<Appointment>;

    /// Look up by manage token (the bearer credential).
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::NotFound`] if no appointment bears the token.
    async fn get_by_token(&self, token: &str) -> Result<Appointment>;

    /// Insert the appointment and rewrite the owning session, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure; neither
    /// record is written in that case.
    async fn insert_with_session(&self, appointment: &Appointment, session: &Session)
    -> Result<()>;

    /// Rewrite the appointment and the owning session, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::NotFound`] if either row is missing,
    /// [`crate::BookingError::Internal`] on storage failure.
    async fn update_with_session(&self, appointment: &Appointment, session: &Session)
    -> Result<()>;

    /// Active appointments starting within `[from, to)` that have not been
    /// reminded yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn due_for_reminder(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;

    /// Record that the reminder for this appointment went out.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] on storage failure.
    async fn mark_reminded(&self, id: AppointmentId, at: DateTime<Utc>) -> Result<()>;
}

/// Outbound email. Fire-and-forget from the engine's point of view:
/// delivery failures are logged by the caller, never propagated.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one HTML email.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookingError::Internal`] if the provider rejects the
    /// message or the network fails.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}
