//! Custom error types for the common library
//!
//! This module defines the store-level error taxonomy shared by every
//! component that talks to the database.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for store operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while establishing a database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A stored document could not be decoded into its domain type
    #[error("Database decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        DatabaseError::Query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
