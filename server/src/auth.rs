//! Authentication extractors.
//!
//! Identity comes from a static bearer-token table (the auth service proper
//! lives outside this system). The extractors only establish *who* is
//! calling; every role decision is made inside the booking engine, so no
//! handler holds ambient authority the engine didn't grant.
//!
//! ```rust,ignore
//! async fn claim_session(
//!     AuthUser(actor): AuthUser,
//!     State(state): State<AppState>,
//!     Path(id): Path<Uuid>,
//! ) -> Result<Json<SessionResponse>, AppError> {
//!     let session = state.engine.claim(actor, SessionId::from_uuid(id)).await?;
//!     ...
//! }
//! ```

use crate::error::AppError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use dearly_booking::types::Identity;

/// Bearer token extracted from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .to_string();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token))
    }
}

/// Authenticated identity resolved from the bearer token.
///
/// Use as a handler parameter to require authentication; the identity is
/// then passed to the engine, which enforces roles.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        state
            .tokens
            .get(&token)
            .copied()
            .map(Self)
            .ok_or_else(|| AppError::unauthorized("Unknown bearer token"))
    }
}
