//! Domain types for the Dearly booking system.
//!
//! Three entities share the booking invariants: an [`AvailabilitySlot`] is a
//! fixed interval offered for booking, a [`Session`] is the purchased
//! interview engagement, and an [`Appointment`] is the concrete booking of a
//! session against a slot, bearing the self-service manage token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id! {
    /// Identifier of an availability slot.
    SlotId
}
uuid_id! {
    /// Identifier of a purchased interview session.
    SessionId
}
uuid_id! {
    /// Identifier of a booked appointment.
    AppointmentId
}
uuid_id! {
    /// Identifier of a user (customer, interviewer, or admin).
    UserId
}

// ============================================================================
// Identity and roles
// ============================================================================

/// Role attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A paying customer.
    Customer,
    /// Staff member who conducts interviews.
    Interviewer,
    /// Staff member with full administrative access.
    Admin,
}

impl Role {
    /// Stable string form used in storage and tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Interviewer => "interviewer",
            Self::Admin => "admin",
        }
    }

    /// Parse the stable string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "interviewer" => Some(Self::Interviewer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// An authenticated identity as reported by the auth collaborator.
///
/// The auth service is external; the booking engine only ever sees this
/// `{id, role}` pair and performs all authorization itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's role.
    pub role: Role,
}

impl Identity {
    /// Create a new identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether this identity is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Whether this identity may conduct interviews (interviewer or admin).
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self.role, Role::Interviewer | Role::Admin)
    }
}

// ============================================================================
// Status enumerations
// ============================================================================

/// Lifecycle of a purchased session.
///
/// `Paid → Scheduled → Completed → Delivered`, with `Scheduled → Paid`
/// reachable again via cancellation. Sessions are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Payment confirmed, no active appointment.
    Paid,
    /// An active booking exists (or an external-calendar booking was made).
    Scheduled,
    /// The interview was conducted and a recording attached.
    Completed,
    /// The playback link was sent to the customer.
    Delivered,
}

impl SessionStatus {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Delivered => "delivered",
        }
    }

    /// Parse the stable string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(Self::Paid),
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }
}

/// Recording-processing lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Upload in progress.
    Uploading,
    /// Transcript alignment in progress.
    Processing,
    /// Aligned and ready to deliver.
    Ready,
    /// Processing failed; requires staff attention.
    Failed,
}

impl ProcessingStatus {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// Parse the stable string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploading" => Some(Self::Uploading),
            "processing" => Some(Self::Processing),
            "ready" => Some(Self::Ready),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Status of a booked appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Active booking.
    Scheduled,
    /// Cancelled; the slot was released.
    Cancelled,
}

impl AppointmentStatus {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the stable string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// How a session reached `Scheduled`.
///
/// The slot system and the external calendar integration are two distinct
/// booking channels. They are mutually exclusive per session: a session
/// scheduled one way cannot also be scheduled the other. This is a product
/// decision recorded in DESIGN.md, not an accident of implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingChannel {
    /// Booked through the availability-slot system; an [`Appointment`] exists.
    SlotSystem,
    /// Scheduled directly by the external calendar webhook; no appointment.
    ExternalCalendar,
}

impl BookingChannel {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SlotSystem => "slot_system",
            Self::ExternalCalendar => "external_calendar",
        }
    }

    /// Parse the stable string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "slot_system" => Some(Self::SlotSystem),
            "external_calendar" => Some(Self::ExternalCalendar),
            _ => None,
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A fixed time interval offered for booking an interview.
///
/// Invariant: `start_time < end_time`. Non-overlap with other slots is
/// enforced at creation by the slot generator, not by the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// Slot identifier.
    pub id: SlotId,
    /// Inclusive start of the interval.
    pub start_time: DateTime<Utc>,
    /// Exclusive end of the interval.
    pub end_time: DateTime<Utc>,
    /// Whether an active appointment holds this slot.
    pub booked: bool,
    /// The admin who generated the slot.
    pub created_by: UserId,
}

/// The purchased interview engagement, tracked through its lifecycle.
///
/// `scheduled_start`/`scheduled_end` are a denormalized cache of the active
/// appointment's interval (or the external-calendar time). The invalidation
/// rule: every booking-engine write that creates, repoints, or cancels an
/// appointment also rewrites (or clears) this pair. Nothing else writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// Owning customer.
    pub customer_id: UserId,
    /// Customer contact address for notifications.
    pub customer_email: String,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Which booking channel scheduled this session, if any.
    pub channel: BookingChannel,
    /// Assigned interviewer; set once via claim, cleared only by an admin.
    pub interviewer_id: Option<UserId>,
    /// Active appointment, when booked through the slot system.
    pub appointment_id: Option<AppointmentId>,
    /// Cached appointment start (see struct docs).
    pub scheduled_start: Option<DateTime<Utc>>,
    /// Cached appointment end (see struct docs).
    pub scheduled_end: Option<DateTime<Utc>>,
    /// Amount paid, in cents.
    pub amount_cents: i64,
    /// Storage path of the uploaded audio, once attached.
    pub audio_path: Option<String>,
    /// Storage path of the uploaded transcript, once attached.
    pub transcript_path: Option<String>,
    /// Transcript-to-question alignment output (JSON), once processed.
    pub alignment_json: Option<String>,
    /// Recording-processing status, once an upload started.
    pub processing: Option<ProcessingStatus>,
    /// Bearer token in the shareable playback link, once delivered.
    pub share_token: Option<String>,
    /// When payment was confirmed.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a freshly paid session with no booking.
    #[must_use]
    pub fn paid(
        id: SessionId,
        customer_id: UserId,
        customer_email: String,
        amount_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            customer_email,
            status: SessionStatus::Paid,
            channel: BookingChannel::SlotSystem,
            interviewer_id: None,
            appointment_id: None,
            scheduled_start: None,
            scheduled_end: None,
            amount_cents,
            audio_path: None,
            transcript_path: None,
            alignment_json: None,
            processing: None,
            share_token: None,
            created_at,
        }
    }
}

/// The concrete booking of a [`Session`] against an [`AvailabilitySlot`].
///
/// `manage_token` is the sole credential for self-service reschedule and
/// cancel: anyone possessing it can act on the appointment with no further
/// authentication, like a capability URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Appointment identifier.
    pub id: AppointmentId,
    /// The session this appointment books.
    pub session_id: SessionId,
    /// Owning customer (copied from the session for reminder queries).
    pub customer_id: UserId,
    /// The slot currently held; repointed on reschedule.
    pub slot_id: SlotId,
    /// Start time, copied from the slot at booking time.
    pub start_time: DateTime<Utc>,
    /// End time, copied from the slot at booking time.
    pub end_time: DateTime<Utc>,
    /// Active or cancelled.
    pub status: AppointmentStatus,
    /// Unguessable self-service management token.
    pub manage_token: String,
    /// When the day-ahead reminder was sent, if it was.
    pub reminder_sent_at: Option<DateTime<Utc>>,
    /// When the booking was made.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_form() {
        for role in [Role::Customer, Role::Interviewer, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            SessionStatus::Paid,
            SessionStatus::Scheduled,
            SessionStatus::Completed,
            SessionStatus::Delivered,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn staff_roles() {
        let admin = Identity::new(UserId::new(), Role::Admin);
        let interviewer = Identity::new(UserId::new(), Role::Interviewer);
        let customer = Identity::new(UserId::new(), Role::Customer);
        assert!(admin.is_admin() && admin.is_staff());
        assert!(!interviewer.is_admin() && interviewer.is_staff());
        assert!(!customer.is_staff());
    }
}
