//! Error types for booking operations.

use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Error taxonomy for the booking engine.
///
/// Every public operation returns one of these categories. Validation and
/// conflict rejections carry the user-facing reason; internal errors carry
/// the collaborator detail for logging, never for display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Malformed or missing input. Rejected before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A precondition on current state does not hold (wrong status,
    /// already booked, already claimed, slot in the past).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The acting identity is missing or lacks the required role.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A collaborator (datastore, network) failed mid-operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Returns `true` if this error is safe to show to the caller verbatim.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict(_) | Self::NotFound(_) | Self::Unauthorized(_)
        )
    }

    /// Shorthand for a database failure.
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Internal(format!("database error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_not_user_errors() {
        assert!(BookingError::Conflict("slot already booked".into()).is_user_error());
        assert!(BookingError::NotFound("Slot").is_user_error());
        assert!(!BookingError::database("connection reset").is_user_error());
    }
}
