//! The booking state machine.
//!
//! Orchestrates the multi-entity transitions of booking, rescheduling, and
//! cancelling an interview appointment, keeping [`Session`],
//! [`Appointment`], and [`AvailabilitySlot`] consistent without a
//! multi-table transaction spanning all three.
//!
//! # Consistency guard
//!
//! Two techniques, in this order inside every multi-entity operation:
//!
//! 1. **Conditional update as compare-and-swap**: reserving a slot
//!    ([`SlotRepository::reserve`]) and claiming a session
//!    ([`SessionRepository::claim`]) only apply if their row predicate
//!    still holds at write time. The CAS is the *only* reservation
//!    mechanism; the preceding reads exist to produce precise rejection
//!    messages, never to decide the reservation.
//! 2. **Compensating actions**: the reservation write happens before the
//!    dependent appointment+session write (which is itself atomic at the
//!    repository). If the dependent write fails, the engine frees the
//!    just-reserved slot (an idempotent release) and reports failure.
//!
//! Notification delivery is best-effort: failures are logged at `warn` and
//! never abort an already-committed transition.

use crate::environment::BookingEnvironment;
use crate::error::{BookingError, Result};
use crate::notify;
use crate::slots::{self, intervals_overlap};
use crate::token::generate_token;
use crate::types::{
    Appointment, AppointmentId, AppointmentStatus, AvailabilitySlot, BookingChannel, Identity,
    Session, SessionId, SessionStatus, SlotId, UserId,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// The booking engine: every operation of the availability-slot system.
///
/// Operations are synchronous request-scoped calls; the only suspension
/// points are the repository and mailer boundaries.
#[derive(Clone)]
pub struct BookingEngine {
    env: BookingEnvironment,
}

impl BookingEngine {
    /// Build an engine over its environment.
    #[must_use]
    pub const fn new(env: BookingEnvironment) -> Self {
        Self { env }
    }

    /// Borrow the environment (handlers occasionally need the config).
    #[must_use]
    pub const fn env(&self) -> &BookingEnvironment {
        &self.env
    }

    // ========================================================================
    // Slot generation and administration
    // ========================================================================

    /// Generate hourly slots for `[window_start, window_end)`.
    ///
    /// All-or-nothing at the request level: any overlap with an existing
    /// slot aborts the whole batch before anything is persisted.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is an admin.
    /// - [`BookingError::Validation`] for an inverted window or one shorter
    ///   than a full hour after rounding the start up.
    /// - [`BookingError::Conflict`] naming the offending range if any
    ///   candidate overlaps an existing slot.
    /// - [`BookingError::Internal`] on storage failure.
    pub async fn generate_slots(
        &self,
        actor: Identity,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilitySlot>> {
        require_admin(&actor)?;

        let candidates = slots::plan_window(window_start, window_end)?;

        // One range query covers every candidate; the pairwise test below
        // decides actual conflicts.
        let first = candidates[0].start;
        let last = candidates[candidates.len() - 1].end;
        let existing = self.env.slots.list_overlapping(first, last).await?;
        for candidate in &candidates {
            if let Some(hit) = existing.iter().find(|s| {
                intervals_overlap(s.start_time, s.end_time, candidate.start, candidate.end)
            }) {
                return Err(BookingError::Conflict(format!(
                    "window overlaps existing slot {} to {}",
                    hit.start_time, hit.end_time
                )));
            }
        }

        let new_slots: Vec<AvailabilitySlot> = candidates
            .iter()
            .map(|c| AvailabilitySlot {
                id: SlotId::new(),
                start_time: c.start,
                end_time: c.end,
                booked: false,
                created_by: actor.user_id,
            })
            .collect();
        self.env.slots.insert_batch(&new_slots).await?;

        info!(count = new_slots.len(), from = %first, to = %last, "generated availability slots");
        Ok(new_slots)
    }

    /// Unbooked future slots, ascending by start time.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Internal`] on storage failure.
    pub async fn list_open_slots(&self) -> Result<Vec<AvailabilitySlot>> {
        self.env.slots.list_open(self.env.clock.now()).await
    }

    /// Delete a slot. Allowed only while it is unbooked and in the future.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is an admin.
    /// - [`BookingError::Conflict`] if the slot is booked or already started.
    /// - [`BookingError::NotFound`] if it does not exist.
    pub async fn delete_slot(&self, actor: Identity, slot_id: SlotId) -> Result<()> {
        require_admin(&actor)?;
        // Read first so a missing slot reports NotFound rather than Conflict.
        let _ = self.env.slots.get(slot_id).await?;
        let deleted = self
            .env
            .slots
            .delete_unbooked(slot_id, self.env.clock.now())
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(BookingError::Conflict(
                "slot is booked or already started".to_string(),
            ))
        }
    }

    // ========================================================================
    // Session intake
    // ========================================================================

    /// Create a session at payment confirmation.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Validation`] for an empty email or non-positive amount.
    /// - [`BookingError::Internal`] on storage failure.
    pub async fn register_payment(
        &self,
        customer_id: UserId,
        customer_email: &str,
        amount_cents: i64,
    ) -> Result<Session> {
        if customer_email.trim().is_empty() {
            return Err(BookingError::Validation(
                "customer email is required".to_string(),
            ));
        }
        if amount_cents <= 0 {
            return Err(BookingError::Validation(
                "amount must be positive".to_string(),
            ));
        }
        let session = Session::paid(
            SessionId::new(),
            customer_id,
            customer_email.trim().to_string(),
            amount_cents,
            self.env.clock.now(),
        );
        self.env.sessions.insert(&session).await?;
        info!(session_id = %session.id, "session created from payment");
        Ok(session)
    }

    /// Mark a session scheduled by the external calendar integration.
    ///
    /// This is the second booking channel; it never creates an appointment
    /// or token, and it is mutually exclusive with slot-system booking.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if the session does not exist.
    /// - [`BookingError::Conflict`] if the session is not `paid` or already
    ///   has an active appointment.
    /// - [`BookingError::Validation`] for an inverted interval.
    pub async fn register_external_booking(
        &self,
        session_id: SessionId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Session> {
        if start >= end {
            return Err(BookingError::Validation(
                "start must be before end".to_string(),
            ));
        }
        let mut session = self.env.sessions.get(session_id).await?;
        if session.appointment_id.is_some() {
            return Err(BookingError::Conflict(
                "session is booked through the slot system".to_string(),
            ));
        }
        if session.status != SessionStatus::Paid {
            return Err(BookingError::Conflict(format!(
                "session is {}, expected paid",
                session.status.as_str()
            )));
        }
        session.status = SessionStatus::Scheduled;
        session.channel = BookingChannel::ExternalCalendar;
        session.scheduled_start = Some(start);
        session.scheduled_end = Some(end);
        self.env.sessions.update(&session).await?;
        info!(session_id = %session.id, "session scheduled via external calendar");
        Ok(session)
    }

    // ========================================================================
    // Book / Reschedule / Cancel
    // ========================================================================

    /// Book a slot for a paid session.
    ///
    /// Write order: reserve the slot (CAS), then insert the appointment and
    /// rewrite the session as one unit; if that unit fails, free the slot
    /// and report failure.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown session or slot.
    /// - [`BookingError::Conflict`] if the session is not `paid`, already has
    ///   an appointment, was scheduled externally, or the slot is booked,
    ///   in the past, or lost to a concurrent booking.
    /// - [`BookingError::Internal`] on storage failure.
    pub async fn book(&self, session_id: SessionId, slot_id: SlotId) -> Result<Appointment> {
        let now = self.env.clock.now();
        let session = self.env.sessions.get(session_id).await?;
        if session.channel == BookingChannel::ExternalCalendar
            && session.status != SessionStatus::Paid
        {
            return Err(BookingError::Conflict(
                "session is scheduled through the external calendar".to_string(),
            ));
        }
        if session.status != SessionStatus::Paid {
            return Err(BookingError::Conflict(format!(
                "session is {}, expected paid",
                session.status.as_str()
            )));
        }
        if session.appointment_id.is_some() {
            return Err(BookingError::Conflict(
                "session already has an appointment".to_string(),
            ));
        }

        // Precondition reads give precise messages; the CAS below decides.
        let slot = self.env.slots.get(slot_id).await?;
        if slot.booked {
            return Err(BookingError::Conflict("slot is already booked".to_string()));
        }
        if slot.start_time <= now {
            return Err(BookingError::Conflict("slot is in the past".to_string()));
        }

        if !self.env.slots.reserve(slot_id, now).await? {
            return Err(BookingError::Conflict(
                "slot was just booked by someone else".to_string(),
            ));
        }

        let appointment = Appointment {
            id: AppointmentId::new(),
            session_id,
            customer_id: session.customer_id,
            slot_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            status: AppointmentStatus::Scheduled,
            manage_token: generate_token(),
            reminder_sent_at: None,
            created_at: now,
        };
        let mut updated = session;
        updated.status = SessionStatus::Scheduled;
        updated.channel = BookingChannel::SlotSystem;
        updated.appointment_id = Some(appointment.id);
        updated.scheduled_start = Some(slot.start_time);
        updated.scheduled_end = Some(slot.end_time);

        if let Err(err) = self
            .env
            .appointments
            .insert_with_session(&appointment, &updated)
            .await
        {
            // Compensation: the reservation is the only committed write.
            self.release_slot_compensating(slot_id).await;
            return Err(err);
        }

        let manage_url = self.env.config.manage_url(&appointment.manage_token);
        self.send_best_effort(
            &updated.customer_email,
            &notify::booking_confirmation(&appointment, &manage_url),
        )
        .await;
        self.send_staff_best_effort(&notify::staff_notice("New booking", &appointment))
            .await;

        info!(session_id = %session_id, appointment_id = %appointment.id, slot_id = %slot_id, "booked");
        Ok(appointment)
    }

    /// Reschedule an appointment onto a new slot, by manage token.
    ///
    /// Write order: reserve the new slot (CAS), repoint appointment+session
    /// as one unit (compensating the new slot on failure), then free the
    /// old slot best-effort.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown token or slot.
    /// - [`BookingError::Conflict`] if the appointment is not active or the
    ///   new slot is booked, past, or lost to a concurrent booking.
    /// - [`BookingError::Internal`] on storage failure.
    pub async fn reschedule(&self, manage_token: &str, new_slot_id: SlotId) -> Result<Appointment> {
        let now = self.env.clock.now();
        let appointment = self.env.appointments.get_by_token(manage_token).await?;
        if appointment.status != AppointmentStatus::Scheduled {
            return Err(BookingError::Conflict(
                "appointment is not active".to_string(),
            ));
        }

        let new_slot = self.env.slots.get(new_slot_id).await?;
        if new_slot.booked {
            return Err(BookingError::Conflict("slot is already booked".to_string()));
        }
        if new_slot.start_time <= now {
            return Err(BookingError::Conflict("slot is in the past".to_string()));
        }

        if !self.env.slots.reserve(new_slot_id, now).await? {
            return Err(BookingError::Conflict(
                "slot was just booked by someone else".to_string(),
            ));
        }

        let old_slot_id = appointment.slot_id;
        let old_start = appointment.start_time;
        let old_end = appointment.end_time;

        let mut session = match self.env.sessions.get(appointment.session_id).await {
            Ok(session) => session,
            Err(err) => {
                self.release_slot_compensating(new_slot_id).await;
                return Err(err);
            }
        };

        let mut updated = appointment;
        updated.slot_id = new_slot_id;
        updated.start_time = new_slot.start_time;
        updated.end_time = new_slot.end_time;
        updated.reminder_sent_at = None;
        session.scheduled_start = Some(new_slot.start_time);
        session.scheduled_end = Some(new_slot.end_time);

        if let Err(err) = self
            .env
            .appointments
            .update_with_session(&updated, &session)
            .await
        {
            self.release_slot_compensating(new_slot_id).await;
            return Err(err);
        }

        // Old-slot release is best-effort: a failure leaves the slot
        // unsellable until manual repair, but the booking itself stands.
        if let Err(err) = self.env.slots.release(old_slot_id).await {
            warn!(slot_id = %old_slot_id, error = %err, "failed to release old slot after reschedule");
        }

        let manage_url = self.env.config.manage_url(&updated.manage_token);
        self.send_best_effort(
            &session.customer_email,
            &notify::reschedule_notice(&updated, old_start, old_end, &manage_url),
        )
        .await;
        self.send_staff_best_effort(&notify::staff_notice("Booking rescheduled", &updated))
            .await;

        info!(appointment_id = %updated.id, old_slot = %old_slot_id, new_slot = %new_slot_id, "rescheduled");
        Ok(updated)
    }

    /// Cancel an appointment by manage token.
    ///
    /// Rolls the owning session back to `paid` and frees the slot.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown token.
    /// - [`BookingError::Conflict`] if already cancelled or already started.
    /// - [`BookingError::Internal`] on storage failure.
    pub async fn cancel(&self, manage_token: &str) -> Result<Appointment> {
        let now = self.env.clock.now();
        let appointment = self.env.appointments.get_by_token(manage_token).await?;
        if appointment.status == AppointmentStatus::Cancelled {
            return Err(BookingError::Conflict(
                "appointment is already cancelled".to_string(),
            ));
        }
        if appointment.start_time <= now {
            return Err(BookingError::Conflict(
                "appointment has already started".to_string(),
            ));
        }

        let mut session = self.env.sessions.get(appointment.session_id).await?;
        let mut updated = appointment;
        updated.status = AppointmentStatus::Cancelled;
        session.status = SessionStatus::Paid;
        session.appointment_id = None;
        session.scheduled_start = None;
        session.scheduled_end = None;

        self.env
            .appointments
            .update_with_session(&updated, &session)
            .await?;

        // Best-effort, non-fatal: the cancellation stands even if the slot
        // cannot be freed right now.
        if let Err(err) = self.env.slots.release(updated.slot_id).await {
            warn!(slot_id = %updated.slot_id, error = %err, "failed to release slot after cancellation");
        }

        self.send_best_effort(
            &session.customer_email,
            &notify::cancellation_notice(&updated),
        )
        .await;
        self.send_staff_best_effort(&notify::staff_notice("Booking cancelled", &updated))
            .await;

        info!(appointment_id = %updated.id, "cancelled");
        Ok(updated)
    }

    /// Look up an appointment by its manage token (the manage page read).
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if no appointment bears the token.
    pub async fn appointment_by_token(&self, manage_token: &str) -> Result<Appointment> {
        self.env.appointments.get_by_token(manage_token).await
    }

    // ========================================================================
    // Claim / Unclaim
    // ========================================================================

    /// Staff read of a session's full state.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is staff.
    /// - [`BookingError::NotFound`] if the session does not exist.
    pub async fn session(&self, actor: Identity, session_id: SessionId) -> Result<Session> {
        require_staff(&actor)?;
        self.env.sessions.get(session_id).await
    }

    /// Interviewer self-assignment to an unassigned paid session.
    ///
    /// The update is a compare-and-swap on `interviewer_id IS NULL`, so of
    /// two concurrent claims exactly one succeeds.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is staff.
    /// - [`BookingError::NotFound`] if the session does not exist.
    /// - [`BookingError::Conflict`] if already assigned, not `paid`, or the
    ///   conditional update lost to a concurrent claim.
    pub async fn claim(&self, actor: Identity, session_id: SessionId) -> Result<Session> {
        require_staff(&actor)?;
        let session = self.env.sessions.get(session_id).await?;
        if session.interviewer_id.is_some() {
            return Err(BookingError::Conflict(
                "session already has an interviewer".to_string(),
            ));
        }
        if session.status != SessionStatus::Paid {
            return Err(BookingError::Conflict(format!(
                "session is {}, expected paid",
                session.status.as_str()
            )));
        }
        if !self.env.sessions.claim(session_id, actor.user_id).await? {
            return Err(BookingError::Conflict(
                "session was claimed by someone else".to_string(),
            ));
        }
        info!(session_id = %session_id, interviewer = %actor.user_id, "session claimed");
        self.env.sessions.get(session_id).await
    }

    /// Admin-only: clear a session's interviewer assignment.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is an admin.
    /// - [`BookingError::NotFound`] if the session does not exist.
    pub async fn unclaim(&self, actor: Identity, session_id: SessionId) -> Result<Session> {
        require_admin(&actor)?;
        self.env.sessions.clear_interviewer(session_id).await?;
        info!(session_id = %session_id, "interviewer assignment cleared");
        self.env.sessions.get(session_id).await
    }

    // ========================================================================
    // Recording, processing, delivery
    // ========================================================================

    /// Mark the recording upload as started.
    ///
    /// Idempotent: a client may re-signal the start after a stalled upload.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is the assigned
    ///   interviewer or an admin.
    /// - [`BookingError::Conflict`] unless the session is `scheduled` with
    ///   no processing already underway.
    pub async fn begin_recording_upload(
        &self,
        actor: Identity,
        session_id: SessionId,
    ) -> Result<Session> {
        let mut session = self.env.sessions.get(session_id).await?;
        require_session_staff(&actor, &session)?;
        if session.status != SessionStatus::Scheduled {
            return Err(BookingError::Conflict(format!(
                "session is {}, expected scheduled",
                session.status.as_str()
            )));
        }
        match session.processing {
            None | Some(crate::types::ProcessingStatus::Uploading) => {}
            Some(_) => {
                return Err(BookingError::Conflict(
                    "session recording is already processing".to_string(),
                ));
            }
        }
        session.processing = Some(crate::types::ProcessingStatus::Uploading);
        self.env.sessions.update(&session).await?;
        info!(session_id = %session_id, "recording upload started");
        Ok(session)
    }

    /// Attach the uploaded recording and transcript; the session moves to
    /// `completed` and processing starts.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is the assigned
    ///   interviewer or an admin.
    /// - [`BookingError::Conflict`] unless the session is `scheduled`.
    /// - [`BookingError::Validation`] for empty paths.
    pub async fn attach_recording(
        &self,
        actor: Identity,
        session_id: SessionId,
        audio_path: &str,
        transcript_path: &str,
    ) -> Result<Session> {
        if audio_path.is_empty() || transcript_path.is_empty() {
            return Err(BookingError::Validation(
                "audio and transcript paths are required".to_string(),
            ));
        }
        let mut session = self.env.sessions.get(session_id).await?;
        require_session_staff(&actor, &session)?;
        if session.status != SessionStatus::Scheduled {
            return Err(BookingError::Conflict(format!(
                "session is {}, expected scheduled",
                session.status.as_str()
            )));
        }
        session.status = SessionStatus::Completed;
        session.audio_path = Some(audio_path.to_string());
        session.transcript_path = Some(transcript_path.to_string());
        session.processing = Some(crate::types::ProcessingStatus::Processing);
        self.env.sessions.update(&session).await?;
        info!(session_id = %session_id, "recording attached, processing started");
        Ok(session)
    }

    /// Record the transcript-alignment output; processing becomes `ready`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is the assigned
    ///   interviewer or an admin.
    /// - [`BookingError::Conflict`] unless processing is in progress.
    pub async fn store_alignment(
        &self,
        actor: Identity,
        session_id: SessionId,
        alignment_json: String,
    ) -> Result<Session> {
        let mut session = self.env.sessions.get(session_id).await?;
        require_session_staff(&actor, &session)?;
        if session.processing != Some(crate::types::ProcessingStatus::Processing) {
            return Err(BookingError::Conflict(
                "session is not processing".to_string(),
            ));
        }
        session.alignment_json = Some(alignment_json);
        session.processing = Some(crate::types::ProcessingStatus::Ready);
        self.env.sessions.update(&session).await?;
        info!(session_id = %session_id, "alignment stored, session ready");
        Ok(session)
    }

    /// Mark processing failed (alignment collaborator errored).
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is the assigned
    ///   interviewer or an admin.
    /// - [`BookingError::NotFound`] if the session does not exist.
    pub async fn mark_processing_failed(
        &self,
        actor: Identity,
        session_id: SessionId,
        reason: &str,
    ) -> Result<Session> {
        let mut session = self.env.sessions.get(session_id).await?;
        require_session_staff(&actor, &session)?;
        session.processing = Some(crate::types::ProcessingStatus::Failed);
        self.env.sessions.update(&session).await?;
        warn!(session_id = %session_id, reason, "processing marked failed");
        Ok(session)
    }

    /// Deliver a completed, processed session: generate the share token,
    /// mark `delivered`, and email the customer the playback link.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthorized`] unless the actor is the assigned
    ///   interviewer or an admin.
    /// - [`BookingError::Conflict`] unless the session is `completed` with
    ///   processing `ready`.
    pub async fn deliver(&self, actor: Identity, session_id: SessionId) -> Result<Session> {
        let mut session = self.env.sessions.get(session_id).await?;
        require_session_staff(&actor, &session)?;
        if session.status != SessionStatus::Completed {
            return Err(BookingError::Conflict(format!(
                "session is {}, expected completed",
                session.status.as_str()
            )));
        }
        if session.processing != Some(crate::types::ProcessingStatus::Ready) {
            return Err(BookingError::Conflict(
                "session recording is not ready".to_string(),
            ));
        }
        let share_token = generate_token();
        session.status = SessionStatus::Delivered;
        session.share_token = Some(share_token.clone());
        self.env.sessions.update(&session).await?;

        let playback_url = self.env.config.playback_url(&share_token);
        self.send_best_effort(
            &session.customer_email,
            &notify::delivery_notice(&playback_url),
        )
        .await;

        info!(session_id = %session_id, "session delivered");
        Ok(session)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Free a slot after a failed dependent write. Idempotent; a failure
    /// here leaves the slot falsely booked and is logged for manual repair.
    async fn release_slot_compensating(&self, slot_id: SlotId) {
        if let Err(err) = self.env.slots.release(slot_id).await {
            warn!(slot_id = %slot_id, error = %err, "compensating slot release failed; slot needs manual repair");
        }
    }

    async fn send_best_effort(&self, to: &str, mail: &notify::EmailContent) {
        if let Err(err) = self
            .env
            .mailer
            .send(to, &mail.subject, &mail.html_body)
            .await
        {
            warn!(to, subject = %mail.subject, error = %err, "notification delivery failed");
        }
    }

    async fn send_staff_best_effort(&self, mail: &notify::EmailContent) {
        let staff = self.env.config.staff_email.clone();
        self.send_best_effort(&staff, mail).await;
    }
}

fn require_admin(actor: &Identity) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(BookingError::Unauthorized(
            "admin role required".to_string(),
        ))
    }
}

fn require_staff(actor: &Identity) -> Result<()> {
    if actor.is_staff() {
        Ok(())
    } else {
        Err(BookingError::Unauthorized(
            "interviewer or admin role required".to_string(),
        ))
    }
}

/// Staff check scoped to one session: admins always pass; interviewers
/// only for sessions assigned to them.
fn require_session_staff(actor: &Identity, session: &Session) -> Result<()> {
    if actor.is_admin() {
        return Ok(());
    }
    if actor.role == crate::types::Role::Interviewer
        && session.interviewer_id == Some(actor.user_id)
    {
        return Ok(());
    }
    Err(BookingError::Unauthorized(
        "session is not assigned to you".to_string(),
    ))
}
