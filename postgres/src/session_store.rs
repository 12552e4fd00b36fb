//! PostgreSQL session repository.

use crate::rows::{self, SessionRow};
use async_trait::async_trait;
use dearly_booking::error::{BookingError, Result};
use dearly_booking::providers::SessionRepository;
use dearly_booking::types::{ProcessingStatus, Session, SessionId, UserId};
use sqlx::PgPool;

const SELECT_SESSION: &str = "SELECT id, customer_id, customer_email, status, channel, \
     interviewer_id, appointment_id, scheduled_start, scheduled_end, amount_cents, \
     audio_path, transcript_path, alignment_json, processing, share_token, created_at \
     FROM sessions";

/// Session storage backed by the `sessions` table.
///
/// The claim path is a conditional `UPDATE` guarded on
/// `interviewer_id IS NULL AND status = 'paid'`.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionStore {
    async fn insert(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO sessions (
                id, customer_id, customer_email, status, channel,
                interviewer_id, appointment_id, scheduled_start, scheduled_end,
                amount_cents, audio_path, transcript_path, alignment_json,
                processing, share_token, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ",
        )
        .bind(session.id.0)
        .bind(session.customer_id.0)
        .bind(&session.customer_email)
        .bind(session.status.as_str())
        .bind(session.channel.as_str())
        .bind(session.interviewer_id.map(|u| u.0))
        .bind(session.appointment_id.map(|a| a.0))
        .bind(session.scheduled_start)
        .bind(session.scheduled_end)
        .bind(session.amount_cents)
        .bind(session.audio_path.as_deref())
        .bind(session.transcript_path.as_deref())
        .bind(session.alignment_json.as_deref())
        .bind(session.processing.map(ProcessingStatus::as_str))
        .bind(session.share_token.as_deref())
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(BookingError::database)?;
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Session> {
        let row = sqlx::query_as::<_, SessionRow>(&format!("{SELECT_SESSION} WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(BookingError::database)?
            .ok_or(BookingError::NotFound("Session"))?;
        row.try_into()
    }

    async fn update(&self, session: &Session) -> Result<()> {
        let affected = rows::update_session(&self.pool, session).await?;
        if affected == 0 {
            return Err(BookingError::NotFound("Session"));
        }
        Ok(())
    }

    async fn claim(&self, id: SessionId, interviewer: UserId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET interviewer_id = $2 \
             WHERE id = $1 AND interviewer_id IS NULL AND status = 'paid'",
        )
        .bind(id.0)
        .bind(interviewer.0)
        .execute(&self.pool)
        .await
        .map_err(BookingError::database)?;
        Ok(result.rows_affected() == 1)
    }

    async fn clear_interviewer(&self, id: SessionId) -> Result<()> {
        let result = sqlx::query("UPDATE sessions SET interviewer_id = NULL WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(BookingError::database)?;
        if result.rows_affected() == 0 {
            return Err(BookingError::NotFound("Session"));
        }
        Ok(())
    }
}
