//! # Dearly Booking
//!
//! The scheduling core of Dearly: availability slots, the session and
//! appointment lifecycle, and the consistency guard that keeps them
//! aligned under concurrent access.
//!
//! ## Architecture
//!
//! The crate is storage-agnostic. [`BookingEngine`] runs every operation
//! against a [`BookingEnvironment`] of trait objects:
//!
//! ```text
//! BookingEngine → BookingEnvironment → { Clock, SlotRepository,
//!     SessionRepository, AppointmentRepository, Mailer }
//! ```
//!
//! Production wires the repositories to Postgres and the mailer to SMTP;
//! tests use the in-memory doubles in [`mocks`] and run at memory speed.
//!
//! ## Consistency guard
//!
//! Multi-entity transitions use a conditional update (compare-and-swap)
//! as the sole reservation mechanism, followed by an atomic dependent
//! write, with an idempotent compensating release on failure. See
//! [`engine`] for the full write ordering.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod engine;
pub mod environment;
pub mod error;
pub mod notify;
pub mod providers;
pub mod slots;
pub mod token;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::BookingConfig;
pub use engine::BookingEngine;
pub use environment::BookingEnvironment;
pub use error::{BookingError, Result};
pub use types::{
    Appointment, AppointmentId, AppointmentStatus, AvailabilitySlot, BookingChannel, Identity,
    ProcessingStatus, Role, Session, SessionId, SessionStatus, SlotId, UserId,
};
