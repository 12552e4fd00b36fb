//! PostgreSQL appointment repository.
//!
//! The paired appointment+session writes run in one transaction, so the
//! engine can treat them as a unit and compensate only the slot
//! reservation when the pair fails.

use crate::rows::{self, AppointmentRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dearly_booking::error::{BookingError, Result};
use dearly_booking::providers::AppointmentRepository;
use dearly_booking::types::{Appointment, AppointmentId, Session};
use sqlx::PgPool;

const SELECT_APPOINTMENT: &str = "SELECT id, session_id, customer_id, slot_id, start_time, \
     end_time, status, manage_token, reminder_sent_at, created_at \
     FROM appointments";

/// Appointment storage backed by the `appointments` table.
#[derive(Clone)]
pub struct PostgresAppointmentStore {
    pool: PgPool,
}

impl PostgresAppointmentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentStore {
    async fn get(&self, id: AppointmentId) -> Result<Appointment> {
        let row =
            sqlx::query_as::<_, AppointmentRow>(&format!("{SELECT_APPOINTMENT} WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(BookingError::database)?
                .ok_or(BookingError::NotFound("Appointment"))?;
        row.try_into()
    }

    async fn get_by_token(&self, token: &str) -> Result<Appointment> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{SELECT_APPOINTMENT} WHERE manage_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingError::database)?
        .ok_or(BookingError::NotFound("Appointment"))?;
        row.try_into()
    }

    async fn insert_with_session(
        &self,
        appointment: &Appointment,
        session: &Session,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(BookingError::database)?;
        sqlx::query(
            r"
            INSERT INTO appointments (
                id, session_id, customer_id, slot_id, start_time, end_time,
                status, manage_token, reminder_sent_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(appointment.id.0)
        .bind(appointment.session_id.0)
        .bind(appointment.customer_id.0)
        .bind(appointment.slot_id.0)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(appointment.status.as_str())
        .bind(&appointment.manage_token)
        .bind(appointment.reminder_sent_at)
        .bind(appointment.created_at)
        .execute(&mut *tx)
        .await
        .map_err(BookingError::database)?;

        let affected = rows::update_session(&mut *tx, session).await?;
        if affected == 0 {
            return Err(BookingError::NotFound("Session"));
        }
        tx.commit().await.map_err(BookingError::database)
    }

    async fn update_with_session(
        &self,
        appointment: &Appointment,
        session: &Session,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(BookingError::database)?;
        let result = sqlx::query(
            r"
            UPDATE appointments
            SET slot_id = $2,
                start_time = $3,
                end_time = $4,
                status = $5,
                reminder_sent_at = $6
            WHERE id = $1
            ",
        )
        .bind(appointment.id.0)
        .bind(appointment.slot_id.0)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(appointment.status.as_str())
        .bind(appointment.reminder_sent_at)
        .execute(&mut *tx)
        .await
        .map_err(BookingError::database)?;
        if result.rows_affected() == 0 {
            return Err(BookingError::NotFound("Appointment"));
        }

        let affected = rows::update_session(&mut *tx, session).await?;
        if affected == 0 {
            return Err(BookingError::NotFound("Session"));
        }
        tx.commit().await.map_err(BookingError::database)
    }

    async fn due_for_reminder(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let query = format!(
            "{SELECT_APPOINTMENT} \
             WHERE status = 'scheduled' AND reminder_sent_at IS NULL \
               AND start_time >= $1 AND start_time < $2 \
             ORDER BY start_time"
        );
        let rows = sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(BookingError::database)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn mark_reminded(&self, id: AppointmentId, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE appointments SET reminder_sent_at = $2 WHERE id = $1")
            .bind(id.0)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(BookingError::database)?;
        Ok(())
    }
}
