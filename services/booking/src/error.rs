//! Custom error types for the booking service

use common::error::DatabaseError;
use thiserror::Error;
use uuid::Uuid;

/// Custom error type for the booking core
#[derive(Error, Debug)]
pub enum BookingError {
    /// Malformed caller input; surfaced synchronously, never retried
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Action not allowed from the session's current status
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Unknown entity id; distinct from a store failure
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    /// Store failure; the caller sees a generic failure
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

/// Type alias for booking results
pub type BookingResult<T> = Result<T, BookingError>;
