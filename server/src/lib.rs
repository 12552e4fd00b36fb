//! # Dearly Server
//!
//! HTTP surface of the Dearly booking system: Axum handlers over the
//! `dearly-booking` engine, Postgres-backed repositories, SMTP (or
//! console) email, the transcript-alignment client, and the background
//! reminder sweep.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod alignment;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod mailer;
pub mod reminders;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
