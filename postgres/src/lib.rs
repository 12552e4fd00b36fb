//! # Dearly Postgres
//!
//! PostgreSQL implementations of the `dearly-booking` repository traits.
//!
//! One store per table; each wraps the shared [`sqlx::PgPool`]. Conditional
//! writes (slot reservation, interviewer claim) are plain `UPDATE`
//! statements whose `WHERE` clause carries the compare-and-swap predicate,
//! decided by `rows_affected`. The paired appointment+session writes run in
//! a single transaction.
//!
//! ```rust,ignore
//! let pool = PgPool::connect(&database_url).await?;
//! run_migrations(&pool).await?;
//! let slots = PostgresSlotStore::new(pool.clone());
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

mod appointment_store;
mod rows;
mod session_store;
mod slot_store;

pub use appointment_store::PostgresAppointmentStore;
pub use session_store::PostgresSessionStore;
pub use slot_store::PostgresSlotStore;

use dearly_booking::error::{BookingError, Result};
use sqlx::PgPool;

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns [`BookingError::Internal`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| BookingError::Internal(format!("migration failed: {e}")))?;
    Ok(())
}
