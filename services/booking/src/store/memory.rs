//! In-memory store implementation
//!
//! Backs the test suites and local development runs. Filtering mirrors the
//! ordinal comparisons the SQL implementation uses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{AuthSession, Availability, MentorProfile, Session, SessionStatus};
use crate::store::BookingStore;

#[derive(Default)]
struct Inner {
    sessions: HashMap<Uuid, Session>,
    availabilities: Vec<Availability>,
    profiles: HashMap<Uuid, MentorProfile>,
    auth_sessions: Vec<AuthSession>,
}

/// In-memory booking store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an availability window, bypassing the request path
    pub async fn add_availability(&self, availability: Availability) {
        self.inner.lock().await.availabilities.push(availability);
    }

    pub async fn add_profile(&self, profile: MentorProfile) {
        let mut inner = self.inner.lock().await;
        inner.profiles.insert(profile.user_id, profile);
    }

    pub async fn add_auth_session(&self, auth_session: AuthSession) {
        self.inner.lock().await.auth_sessions.push(auth_session);
    }

    /// Seed a session directly, bypassing the state machine
    pub async fn add_session(&self, session: Session) {
        let mut inner = self.inner.lock().await;
        inner.sessions.insert(session.id, session);
    }

    pub async fn session(&self, id: Uuid) -> Option<Session> {
        self.inner.lock().await.sessions.get(&id).cloned()
    }

    pub async fn auth_session_count(&self) -> usize {
        self.inner.lock().await.auth_sessions.len()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_session(&self, session: &Session) -> DatabaseResult<()> {
        let mut inner = self.inner.lock().await;
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> DatabaseResult<Option<Session>> {
        Ok(self.inner.lock().await.sessions.get(&id).cloned())
    }

    async fn update_session(&self, session: &Session) -> DatabaseResult<()> {
        let mut inner = self.inner.lock().await;
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn availabilities_for(&self, user_id: Uuid) -> DatabaseResult<Vec<Availability>> {
        Ok(self
            .inner
            .lock()
            .await
            .availabilities
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn booked_sessions_for(
        &self,
        mentor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DatabaseResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .inner
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| {
                s.mentor_id == mentor_id
                    && s.session_time_start >= from
                    && s.session_time_start <= to
            })
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.session_time_start);
        Ok(sessions)
    }

    async fn mentor_profile(&self, mentor_id: Uuid) -> DatabaseResult<Option<MentorProfile>> {
        Ok(self.inner.lock().await.profiles.get(&mentor_id).cloned())
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> DatabaseResult<u64> {
        let mut inner = self.inner.lock().await;
        let mut updated = 0;
        for session in inner.sessions.values_mut() {
            if session.session_time_end < now && session.status < SessionStatus::Confirmed {
                session.status = SessionStatus::Expired;
                session.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn complete_elapsed(&self, now: DateTime<Utc>) -> DatabaseResult<u64> {
        let mut inner = self.inner.lock().await;
        let mut updated = 0;
        for session in inner.sessions.values_mut() {
            if session.session_time_start < now && session.status == SessionStatus::Confirmed {
                session.status = SessionStatus::Completed;
                session.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_expired_auth_sessions(&self, now: DateTime<Utc>) -> DatabaseResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.auth_sessions.len();
        inner.auth_sessions.retain(|s| s.expires_at >= now);
        Ok((before - inner.auth_sessions.len()) as u64)
    }

    async fn sessions_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DatabaseResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .inner
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| {
                s.status == SessionStatus::Confirmed
                    && s.session_time_start >= from
                    && s.session_time_start <= to
            })
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.session_time_start);
        Ok(sessions)
    }

    async fn sessions_awaiting_review(&self) -> DatabaseResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .inner
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| s.status == SessionStatus::Completed && !s.review_prompted)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.session_time_end);
        Ok(sessions)
    }

    async fn mark_review_prompted(&self, ids: &[Uuid]) -> DatabaseResult<u64> {
        let mut inner = self.inner.lock().await;
        let mut updated = 0;
        for id in ids {
            if let Some(session) = inner.sessions.get_mut(id) {
                session.review_prompted = true;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn confirmed_session(start: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            mentor_id: Uuid::new_v4(),
            mentee_id: Uuid::new_v4(),
            session_time_start: start,
            session_time_end: start + Duration::minutes(60),
            new_session_time_start: None,
            new_session_time_end: None,
            status: SessionStatus::Confirmed,
            mentee_request: None,
            payment_details: None,
            meeting_link: None,
            review_prompted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sessions_starting_between_is_inclusive_on_both_bounds() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let from = now + Duration::minutes(30);
        let to = now + Duration::minutes(60);

        let at_from = confirmed_session(from);
        let at_to = confirmed_session(to);
        let before = confirmed_session(from - Duration::seconds(1));
        let after = confirmed_session(to + Duration::seconds(1));
        for s in [&at_from, &at_to, &before, &after] {
            store.add_session(s.clone()).await;
        }

        let found = store.sessions_starting_between(from, to).await.unwrap();
        let ids: Vec<Uuid> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![at_from.id, at_to.id]);
    }

    #[tokio::test]
    async fn test_sessions_starting_between_only_returns_confirmed() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let start = now + Duration::minutes(45);

        let mut pending = confirmed_session(start);
        pending.status = SessionStatus::PendingByMentor;
        let mut canceled = confirmed_session(start);
        canceled.status = SessionStatus::CanceledByMentee;
        let confirmed = confirmed_session(start);
        for s in [&pending, &canceled, &confirmed] {
            store.add_session(s.clone()).await;
        }

        let found = store
            .sessions_starting_between(now + Duration::minutes(30), now + Duration::minutes(60))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, confirmed.id);
    }
}
