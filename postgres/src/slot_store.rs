//! PostgreSQL availability-slot repository.

use crate::rows::SlotRow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dearly_booking::error::{BookingError, Result};
use dearly_booking::providers::SlotRepository;
use dearly_booking::types::{AvailabilitySlot, SlotId};
use sqlx::PgPool;

/// Slot storage backed by the `availability_slots` table.
///
/// Reservation is a conditional `UPDATE` guarded on `NOT booked`, so the
/// row predicate at write time is the only thing that decides a race.
#[derive(Clone)]
pub struct PostgresSlotStore {
    pool: PgPool,
}

impl PostgresSlotStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepository for PostgresSlotStore {
    async fn insert_batch(&self, slots: &[AvailabilitySlot]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(BookingError::database)?;
        for slot in slots {
            sqlx::query(
                r"
                INSERT INTO availability_slots (id, start_time, end_time, booked, created_by)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(slot.id.0)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .bind(slot.booked)
            .bind(slot.created_by.0)
            .execute(&mut *tx)
            .await
            .map_err(BookingError::database)?;
        }
        tx.commit().await.map_err(BookingError::database)
    }

    async fn get(&self, id: SlotId) -> Result<AvailabilitySlot> {
        let row = sqlx::query_as::<_, SlotRow>(
            "SELECT id, start_time, end_time, booked, created_by \
             FROM availability_slots WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingError::database)?
        .ok_or(BookingError::NotFound("Slot"))?;
        Ok(row.into())
    }

    async fn list_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilitySlot>> {
        let rows = sqlx::query_as::<_, SlotRow>(
            "SELECT id, start_time, end_time, booked, created_by \
             FROM availability_slots \
             WHERE start_time < $2 AND end_time > $1 \
             ORDER BY start_time",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(BookingError::database)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_open(&self, from: DateTime<Utc>) -> Result<Vec<AvailabilitySlot>> {
        let rows = sqlx::query_as::<_, SlotRow>(
            "SELECT id, start_time, end_time, booked, created_by \
             FROM availability_slots \
             WHERE NOT booked AND start_time > $1 \
             ORDER BY start_time",
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await
        .map_err(BookingError::database)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn reserve(&self, id: SlotId, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE availability_slots SET booked = TRUE \
             WHERE id = $1 AND NOT booked AND start_time > $2",
        )
        .bind(id.0)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(BookingError::database)?;
        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, id: SlotId) -> Result<()> {
        sqlx::query("UPDATE availability_slots SET booked = FALSE WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(BookingError::database)?;
        Ok(())
    }

    async fn delete_unbooked(&self, id: SlotId, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM availability_slots \
             WHERE id = $1 AND NOT booked AND start_time > $2",
        )
        .bind(id.0)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(BookingError::database)?;
        Ok(result.rows_affected() == 1)
    }
}
