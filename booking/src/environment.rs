//! Environment bundle injected into the booking engine.

use crate::config::BookingConfig;
use crate::providers::{AppointmentRepository, Clock, Mailer, SessionRepository, SlotRepository};
use std::sync::Arc;

/// Everything the booking engine needs from the outside world.
///
/// Cloned cheaply (all `Arc`s) into each operation; handlers build one at
/// startup and share it.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Availability-slot storage.
    pub slots: Arc<dyn SlotRepository>,
    /// Session storage.
    pub sessions: Arc<dyn SessionRepository>,
    /// Appointment storage.
    pub appointments: Arc<dyn AppointmentRepository>,
    /// Outbound email.
    pub mailer: Arc<dyn Mailer>,
    /// Link bases and staff address.
    pub config: BookingConfig,
}

impl BookingEnvironment {
    /// Bundle the providers.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        slots: Arc<dyn SlotRepository>,
        sessions: Arc<dyn SessionRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        mailer: Arc<dyn Mailer>,
        config: BookingConfig,
    ) -> Self {
        Self {
            clock,
            slots,
            sessions,
            appointments,
            mailer,
            config,
        }
    }
}
