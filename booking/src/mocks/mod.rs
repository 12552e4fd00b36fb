//! In-memory mock providers for testing.
//!
//! [`InMemoryStore`] implements all three repository traits over one shared
//! map guarded by a single lock, so the paired appointment+session writes
//! are atomic the same way the Postgres implementation's transactions are,
//! and the conditional updates really are compare-and-swaps.

mod clock;
mod mailer;
mod store;

pub use clock::FixedClock;
pub use mailer::{MockMailer, SentMail};
pub use store::InMemoryStore;
