//! Booking repository for database operations
//!
//! PostgreSQL implementation of the store contract. Status values are
//! persisted as their ordinal and every bulk filter compares on that
//! ordinal, so the enum order in the models is part of the schema contract.
//! Bulk updates are atomic per affected row, not across rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc, Weekday};
use common::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Availability, MentorProfile, Session, SessionStatus};
use crate::store::BookingStore;

/// Booking repository
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_session(row: &PgRow) -> DatabaseResult<Session> {
        let ordinal: i16 = row.get("status");
        let status = SessionStatus::from_ordinal(ordinal).ok_or_else(|| {
            DatabaseError::Decode(format!("unknown session status ordinal {ordinal}"))
        })?;

        Ok(Session {
            id: row.get("id"),
            mentor_id: row.get("mentor_id"),
            mentee_id: row.get("mentee_id"),
            session_time_start: row.get("session_time_start"),
            session_time_end: row.get("session_time_end"),
            new_session_time_start: row.get("new_session_time_start"),
            new_session_time_end: row.get("new_session_time_end"),
            status,
            mentee_request: row.get("mentee_request"),
            payment_details: row.get("payment_details"),
            meeting_link: row.get("meeting_link"),
            review_prompted: row.get("review_prompted"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn map_availability(row: &PgRow) -> DatabaseResult<Availability> {
        let weekday_number: i16 = row.get("weekday");
        let weekday = Weekday::try_from(weekday_number as u8).map_err(|_| {
            DatabaseError::Decode(format!("unknown weekday number {weekday_number}"))
        })?;

        Ok(Availability {
            id: row.get("id"),
            user_id: row.get("user_id"),
            weekday,
            time_from: row.get("time_from"),
            time_to: row.get("time_to"),
        })
    }
}

const SESSION_COLUMNS: &str = "id, mentor_id, mentee_id, session_time_start, session_time_end, \
     new_session_time_start, new_session_time_end, status, mentee_request, \
     payment_details, meeting_link, review_prompted, created_at, updated_at";

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert_session(&self, session: &Session) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, mentor_id, mentee_id, session_time_start, session_time_end,
                                  new_session_time_start, new_session_time_end, status,
                                  mentee_request, payment_details, meeting_link, review_prompted,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(session.id)
        .bind(session.mentor_id)
        .bind(session.mentee_id)
        .bind(session.session_time_start)
        .bind(session.session_time_end)
        .bind(session.new_session_time_start)
        .bind(session.new_session_time_end)
        .bind(session.status.ordinal())
        .bind(&session.mentee_request)
        .bind(&session.payment_details)
        .bind(&session.meeting_link)
        .bind(session.review_prompted)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> DatabaseResult<Option<Session>> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::map_session).transpose()
    }

    async fn update_session(&self, session: &Session) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions
            SET session_time_start = $2, session_time_end = $3,
                new_session_time_start = $4, new_session_time_end = $5,
                status = $6, mentee_request = $7, payment_details = $8,
                meeting_link = $9, review_prompted = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(session.id)
        .bind(session.session_time_start)
        .bind(session.session_time_end)
        .bind(session.new_session_time_start)
        .bind(session.new_session_time_end)
        .bind(session.status.ordinal())
        .bind(&session.mentee_request)
        .bind(&session.payment_details)
        .bind(&session.meeting_link)
        .bind(session.review_prompted)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn availabilities_for(&self, user_id: Uuid) -> DatabaseResult<Vec<Availability>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, weekday, time_from, time_to
            FROM availabilities
            WHERE user_id = $1
            ORDER BY weekday, time_from
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_availability).collect()
    }

    async fn booked_sessions_for(
        &self,
        mentor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DatabaseResult<Vec<Session>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions \
             WHERE mentor_id = $1 AND session_time_start >= $2 AND session_time_start <= $3 \
             ORDER BY session_time_start"
        ))
        .bind(mentor_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_session).collect()
    }

    async fn mentor_profile(&self, mentor_id: Uuid) -> DatabaseResult<Option<MentorProfile>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, meeting_link, prices
            FROM mentor_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(mentor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| MentorProfile {
            user_id: row.get("user_id"),
            meeting_link: row.get("meeting_link"),
            prices: row.get("prices"),
        }))
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET status = $1, updated_at = $2
            WHERE session_time_end < $2 AND status < $3
            "#,
        )
        .bind(SessionStatus::Expired.ordinal())
        .bind(now)
        .bind(SessionStatus::Confirmed.ordinal())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn complete_elapsed(&self, now: DateTime<Utc>) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET status = $1, updated_at = $2
            WHERE session_time_start < $2 AND status = $3
            "#,
        )
        .bind(SessionStatus::Completed.ordinal())
        .bind(now)
        .bind(SessionStatus::Confirmed.ordinal())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_auth_sessions(&self, now: DateTime<Utc>) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn sessions_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DatabaseResult<Vec<Session>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions \
             WHERE status = $1 AND session_time_start >= $2 AND session_time_start <= $3 \
             ORDER BY session_time_start"
        ))
        .bind(SessionStatus::Confirmed.ordinal())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_session).collect()
    }

    async fn sessions_awaiting_review(&self) -> DatabaseResult<Vec<Session>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions \
             WHERE status = $1 AND review_prompted = FALSE \
             ORDER BY session_time_end"
        ))
        .bind(SessionStatus::Completed.ordinal())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_session).collect()
    }

    async fn mark_review_prompted(&self, ids: &[Uuid]) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET review_prompted = TRUE, updated_at = NOW()
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
