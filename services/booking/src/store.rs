//! Store abstraction consumed by the booking core
//!
//! The core never talks to a database directly; it goes through this trait.
//! Every filter a method implies reduces to equality, `<`/`>` comparisons on
//! timestamps and the status ordinal, or set membership, so any document
//! store can implement it. Bulk updates are atomic per affected document,
//! not across documents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{Availability, MentorProfile, Session};

pub mod memory;

/// Document store operations the booking core depends on
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_session(&self, session: &Session) -> DatabaseResult<()>;

    async fn find_session(&self, id: Uuid) -> DatabaseResult<Option<Session>>;

    async fn update_session(&self, session: &Session) -> DatabaseResult<()>;

    /// All availability windows owned by a user
    async fn availabilities_for(&self, user_id: Uuid) -> DatabaseResult<Vec<Availability>>;

    /// Sessions booked with a mentor whose committed start falls inside
    /// `[from, to]`, ordered by start time
    async fn booked_sessions_for(
        &self,
        mentor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DatabaseResult<Vec<Session>>;

    async fn mentor_profile(&self, mentor_id: Uuid) -> DatabaseResult<Option<MentorProfile>>;

    /// Bulk update: sessions with `session_time_end < now` still ahead of
    /// `Confirmed` become `Expired`. Returns the number of updated sessions.
    async fn expire_stale(&self, now: DateTime<Utc>) -> DatabaseResult<u64>;

    /// Bulk update: `Confirmed` sessions with `session_time_start < now`
    /// become `Completed`. Returns the number of updated sessions.
    async fn complete_elapsed(&self, now: DateTime<Utc>) -> DatabaseResult<u64>;

    /// Bulk delete of auth sessions whose expiry has passed. Returns the
    /// number of deleted records.
    async fn delete_expired_auth_sessions(&self, now: DateTime<Utc>) -> DatabaseResult<u64>;

    /// Confirmed sessions whose committed start falls inside `[from, to]`,
    /// both bounds inclusive, ordered by start time
    async fn sessions_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DatabaseResult<Vec<Session>>;

    /// Completed sessions that have not been prompted for a review yet
    async fn sessions_awaiting_review(&self) -> DatabaseResult<Vec<Session>>;

    /// Marks the given sessions as review-prompted. Returns the number of
    /// updated sessions.
    async fn mark_review_prompted(&self, ids: &[Uuid]) -> DatabaseResult<u64>;
}
