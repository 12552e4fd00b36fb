//! Inbound webhook endpoints.
//!
//! - `POST /api/webhooks/payment` - Payment-confirmed notification from the
//!   payment provider. Creates the session in `paid`.
//!
//! The provider is configured with one of the static bearer tokens, so the
//! endpoint sits behind the same authentication as the rest of the API.

use super::SessionResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use dearly_booking::types::UserId;
use serde::Deserialize;
use uuid::Uuid;

/// Payment-confirmed payload.
#[derive(Debug, Deserialize)]
pub struct PaymentConfirmedRequest {
    /// Paying customer
    pub customer_id: Uuid,
    /// Customer contact address for notifications
    pub customer_email: String,
    /// Amount paid, in cents
    pub amount_cents: i64,
}

/// Create a session from a confirmed payment.
pub async fn payment_confirmed(
    AuthUser(_actor): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<PaymentConfirmedRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = state
        .engine
        .register_payment(
            UserId::from_uuid(request.customer_id),
            &request.customer_email,
            request.amount_cents,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}
