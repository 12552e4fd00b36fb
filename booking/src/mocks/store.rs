//! In-memory implementation of the three booking repositories.

use crate::error::{BookingError, Result};
use crate::providers::{AppointmentRepository, SessionRepository, SlotRepository};
use crate::slots::intervals_overlap;
use crate::types::{
    Appointment, AppointmentId, AppointmentStatus, AvailabilitySlot, Session, SessionId, SlotId,
    UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    slots: HashMap<SlotId, AvailabilitySlot>,
    sessions: HashMap<SessionId, Session>,
    appointments: HashMap<AppointmentId, Appointment>,
    fail_appointment_writes: bool,
}

/// Shared in-memory store backing all three repository traits.
///
/// One lock guards all tables, so paired writes are atomic and the
/// conditional updates behave like their SQL counterparts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the paired appointment+session writes fail, to exercise the
    /// engine's slot-release compensation.
    pub fn set_fail_appointment_writes(&self, fail: bool) {
        self.lock().fail_appointment_writes = fail;
    }

    /// Seed a slot directly.
    pub fn put_slot(&self, slot: AvailabilitySlot) {
        self.lock().slots.insert(slot.id, slot);
    }

    /// Seed a session directly.
    pub fn put_session(&self, session: Session) {
        self.lock().sessions.insert(session.id, session);
    }

    /// Read a slot without going through the trait (test assertions).
    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<AvailabilitySlot> {
        self.lock().slots.get(&id).cloned()
    }

    /// Read a session without going through the trait (test assertions).
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<Session> {
        self.lock().sessions.get(&id).cloned()
    }

    /// Read an appointment without going through the trait (test assertions).
    #[must_use]
    pub fn appointment(&self, id: AppointmentId) -> Option<Appointment> {
        self.lock().appointments.get(&id).cloned()
    }
}

#[async_trait]
impl SlotRepository for InMemoryStore {
    async fn insert_batch(&self, slots: &[AvailabilitySlot]) -> Result<()> {
        let mut inner = self.lock();
        for slot in slots {
            inner.slots.insert(slot.id, slot.clone());
        }
        Ok(())
    }

    async fn get(&self, id: SlotId) -> Result<AvailabilitySlot> {
        self.lock()
            .slots
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound("Slot"))
    }

    async fn list_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilitySlot>> {
        let mut found: Vec<AvailabilitySlot> = self
            .lock()
            .slots
            .values()
            .filter(|s| intervals_overlap(s.start_time, s.end_time, start, end))
            .cloned()
            .collect();
        found.sort_by_key(|s| s.start_time);
        Ok(found)
    }

    async fn list_open(&self, from: DateTime<Utc>) -> Result<Vec<AvailabilitySlot>> {
        let mut open: Vec<AvailabilitySlot> = self
            .lock()
            .slots
            .values()
            .filter(|s| !s.booked && s.start_time > from)
            .cloned()
            .collect();
        open.sort_by_key(|s| s.start_time);
        Ok(open)
    }

    async fn reserve(&self, id: SlotId, now: DateTime<Utc>) -> Result<bool> {
        let mut inner = self.lock();
        match inner.slots.get_mut(&id) {
            Some(slot) if !slot.booked && slot.start_time > now => {
                slot.booked = true;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(BookingError::NotFound("Slot")),
        }
    }

    async fn release(&self, id: SlotId) -> Result<()> {
        if let Some(slot) = self.lock().slots.get_mut(&id) {
            slot.booked = false;
        }
        Ok(())
    }

    async fn delete_unbooked(&self, id: SlotId, now: DateTime<Utc>) -> Result<bool> {
        let mut inner = self.lock();
        let deletable = inner
            .slots
            .get(&id)
            .is_some_and(|s| !s.booked && s.start_time > now);
        if deletable {
            inner.slots.remove(&id);
        }
        Ok(deletable)
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert(&self, session: &Session) -> Result<()> {
        self.lock().sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Session> {
        self.lock()
            .sessions
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound("Session"))
    }

    async fn update(&self, session: &Session) -> Result<()> {
        let mut inner = self.lock();
        if !inner.sessions.contains_key(&session.id) {
            return Err(BookingError::NotFound("Session"));
        }
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn claim(&self, id: SessionId, interviewer: UserId) -> Result<bool> {
        let mut inner = self.lock();
        match inner.sessions.get_mut(&id) {
            Some(session)
                if session.interviewer_id.is_none()
                    && session.status == crate::types::SessionStatus::Paid =>
            {
                session.interviewer_id = Some(interviewer);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(BookingError::NotFound("Session")),
        }
    }

    async fn clear_interviewer(&self, id: SessionId) -> Result<()> {
        let mut inner = self.lock();
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or(BookingError::NotFound("Session"))?;
        session.interviewer_id = None;
        Ok(())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn get(&self, id: AppointmentId) -> Result<Appointment> {
        self.lock()
            .appointments
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound("Appointment"))
    }

    async fn get_by_token(&self, token: &str) -> Result<Appointment> {
        self.lock()
            .appointments
            .values()
            .find(|a| a.manage_token == token)
            .cloned()
            .ok_or(BookingError::NotFound("Appointment"))
    }

    async fn insert_with_session(
        &self,
        appointment: &Appointment,
        session: &Session,
    ) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_appointment_writes {
            return Err(BookingError::Internal(
                "injected appointment write failure".to_string(),
            ));
        }
        inner
            .appointments
            .insert(appointment.id, appointment.clone());
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn update_with_session(
        &self,
        appointment: &Appointment,
        session: &Session,
    ) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_appointment_writes {
            return Err(BookingError::Internal(
                "injected appointment write failure".to_string(),
            ));
        }
        if !inner.appointments.contains_key(&appointment.id) {
            return Err(BookingError::NotFound("Appointment"));
        }
        if !inner.sessions.contains_key(&session.id) {
            return Err(BookingError::NotFound("Session"));
        }
        inner
            .appointments
            .insert(appointment.id, appointment.clone());
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn due_for_reminder(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let mut due: Vec<Appointment> = self
            .lock()
            .appointments
            .values()
            .filter(|a| {
                a.status == AppointmentStatus::Scheduled
                    && a.reminder_sent_at.is_none()
                    && a.start_time >= from
                    && a.start_time < to
            })
            .cloned()
            .collect();
        due.sort_by_key(|a| a.start_time);
        Ok(due)
    }

    async fn mark_reminded(&self, id: AppointmentId, at: DateTime<Utc>) -> Result<()> {
        let mut inner = self.lock();
        let appointment = inner
            .appointments
            .get_mut(&id)
            .ok_or(BookingError::NotFound("Appointment"))?;
        appointment.reminder_sent_at = Some(at);
        Ok(())
    }
}
