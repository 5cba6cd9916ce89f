//! Ephemeral auth session record
//!
//! Owned by the auth subsystem; the booking core only consumes it from the
//! recurring cleanup job that deletes records whose expiry has passed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short-lived auth session entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
