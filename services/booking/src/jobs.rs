//! Standing background jobs
//!
//! Bodies of the recurring jobs driven by the scheduler: status
//! recalculation, expired auth-session cleanup, the upcoming-session
//! notification scan, and the post-session review sweep. Every job swallows
//! store errors for the tick and lets the next scheduled tick try again; a
//! failed sweep never takes the process down.

use chrono::{DateTime, Duration, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{error, info, warn};

use crate::dispatcher::DelayedDispatcher;
use crate::notifier::NotificationPayload;
use crate::store::BookingStore;

/// The standing jobs. Shares the store handle and the dispatcher across
/// ticks; jobs of different kinds may run concurrently and synchronize only
/// through the store.
#[derive(Clone)]
pub struct Jobs {
    store: Arc<dyn BookingStore>,
    dispatcher: DelayedDispatcher,
    lead_time: Duration,
}

impl Jobs {
    pub fn new(store: Arc<dyn BookingStore>, dispatcher: DelayedDispatcher, lead_minutes: i64) -> Self {
        Self {
            store,
            dispatcher,
            lead_time: Duration::minutes(lead_minutes),
        }
    }

    /// Marks overdue sessions `Expired` and elapsed confirmed sessions
    /// `Completed`. The two bulk updates are independent; a failure in one
    /// does not block the other.
    pub async fn status_sweep(&self) {
        let now = Utc::now();

        match self.store.expire_stale(now).await {
            Ok(count) if count > 0 => info!(count, "expired stale sessions"),
            Ok(_) => {}
            Err(err) => error!("failed to expire stale sessions: {err}"),
        }

        match self.store.complete_elapsed(now).await {
            Ok(count) if count > 0 => info!(count, "completed elapsed sessions"),
            Ok(_) => {}
            Err(err) => error!("failed to complete elapsed sessions: {err}"),
        }
    }

    /// Deletes ephemeral auth records whose expiry has passed
    pub async fn auth_session_cleanup(&self) {
        match self.store.delete_expired_auth_sessions(Utc::now()).await {
            Ok(count) => info!(count, "deleted expired auth sessions"),
            Err(err) => error!("failed to delete expired auth sessions: {err}"),
        }
    }

    /// Scans for confirmed sessions starting inside the forward window
    /// `[now + lead, now + 2*lead]` and arms a delayed dispatch for each,
    /// timed to fire `lead` before the session start. Sessions already too
    /// close to their start are skipped.
    pub async fn upcoming_notification_scan(&self) {
        let now = Utc::now();
        let window_start = now + self.lead_time;
        let window_end = now + self.lead_time * 2;

        let sessions = match self
            .store
            .sessions_starting_between(window_start, window_end)
            .await
        {
            Ok(sessions) => sessions,
            Err(err) => {
                error!("failed to scan for upcoming sessions: {err}");
                return;
            }
        };

        for session in sessions {
            match notification_delay(now, session.session_time_start, self.lead_time) {
                Some(delay) => {
                    self.dispatcher
                        .schedule(NotificationPayload::upcoming(&session), delay);
                }
                None => {
                    warn!(
                        session = %session.id,
                        "session starts too soon to schedule a reminder, skipping"
                    );
                }
            }
        }
    }

    /// Dispatches a review prompt for each completed session that has not
    /// been prompted yet, then marks them so re-runs stay idempotent.
    pub async fn review_prompt_sweep(&self) {
        let sessions = match self.store.sessions_awaiting_review().await {
            Ok(sessions) => sessions,
            Err(err) => {
                error!("failed to scan for sessions awaiting review: {err}");
                return;
            }
        };

        if sessions.is_empty() {
            return;
        }

        let mut prompted = Vec::with_capacity(sessions.len());
        for session in &sessions {
            self.dispatcher
                .schedule(NotificationPayload::review_prompt(session), StdDuration::ZERO);
            prompted.push(session.id);
        }

        if let Err(err) = self.store.mark_review_prompted(&prompted).await {
            error!("failed to mark sessions as review-prompted: {err}");
        }
    }
}

/// Delay until `lead_time` before the session start, or `None` when that
/// moment has already passed.
pub fn notification_delay(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    lead_time: Duration,
) -> Option<StdDuration> {
    let delay = start - now - lead_time;
    if delay <= Duration::zero() {
        return None;
    }
    delay.to_std().ok()
}

/// Delay that lands the first notification scan on the next half-hour
/// boundary: `30 - minute % 30` minutes from `now`.
pub fn half_hour_alignment_delay(now: DateTime<Utc>) -> StdDuration {
    let minutes = 30 - u64::from(now.minute() % 30);
    StdDuration::from_secs(minutes * 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthSession, Session, SessionStatus};
    use crate::notifier::NotificationKind;
    use crate::notifier::testing::RecordingGateway;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;
    use tokio::time::sleep;
    use uuid::Uuid;

    fn session(start: DateTime<Utc>, status: SessionStatus) -> Session {
        Session {
            id: Uuid::new_v4(),
            mentor_id: Uuid::new_v4(),
            mentee_id: Uuid::new_v4(),
            session_time_start: start,
            session_time_end: start + Duration::minutes(60),
            new_session_time_start: None,
            new_session_time_end: None,
            status,
            mentee_request: None,
            payment_details: None,
            meeting_link: None,
            review_prompted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn jobs_over(store: Arc<MemoryStore>, gateway: Arc<RecordingGateway>) -> Jobs {
        Jobs::new(store, DelayedDispatcher::new(gateway), 30)
    }

    #[tokio::test]
    async fn test_status_sweep_expires_and_completes() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();

        // ended a minute ago, never confirmed: expires
        let stale = session(now - Duration::minutes(61), SessionStatus::PendingByMentor);
        // started a minute ago, confirmed: completes
        let elapsed = session(now - Duration::minutes(1), SessionStatus::Confirmed);
        // already completed: untouched by both filters
        let done = session(now - Duration::days(1), SessionStatus::Completed);
        // still ahead: untouched
        let upcoming = session(now + Duration::hours(2), SessionStatus::Confirmed);
        for s in [&stale, &elapsed, &done, &upcoming] {
            store.add_session(s.clone()).await;
        }

        let jobs = jobs_over(store.clone(), Arc::new(RecordingGateway::new()));
        jobs.status_sweep().await;

        assert_eq!(
            store.session(stale.id).await.unwrap().status,
            SessionStatus::Expired
        );
        assert_eq!(
            store.session(elapsed.id).await.unwrap().status,
            SessionStatus::Completed
        );
        assert_eq!(
            store.session(done.id).await.unwrap().status,
            SessionStatus::Completed
        );
        assert_eq!(
            store.session(upcoming.id).await.unwrap().status,
            SessionStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_auth_session_cleanup_deletes_only_expired() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();

        store
            .add_auth_session(AuthSession {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                token_hash: "stale".to_string(),
                expires_at: now - Duration::hours(1),
            })
            .await;
        store
            .add_auth_session(AuthSession {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                token_hash: "live".to_string(),
                expires_at: now + Duration::hours(1),
            })
            .await;

        let jobs = jobs_over(store.clone(), Arc::new(RecordingGateway::new()));
        jobs.auth_session_cleanup().await;

        assert_eq!(store.auth_session_count().await, 1);
    }

    #[tokio::test]
    async fn test_notification_scan_schedules_only_inside_window() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();

        // inside the window: gets a dispatch with a ~15 minute delay
        let in_window = session(now + Duration::minutes(45), SessionStatus::Confirmed);
        // before the window: skipped by the scan
        let too_soon = session(now + Duration::minutes(20), SessionStatus::Confirmed);
        // past the window
        let too_far = session(now + Duration::minutes(90), SessionStatus::Confirmed);
        for s in [&in_window, &too_soon, &too_far] {
            store.add_session(s.clone()).await;
        }

        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = DelayedDispatcher::new(gateway.clone());
        let jobs = Jobs::new(store, dispatcher.clone(), 30);

        jobs.upcoming_notification_scan().await;

        assert_eq!(dispatcher.outstanding(), 1);
        assert_eq!(gateway.sent_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_review_sweep_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();

        let first = session(now - Duration::days(1), SessionStatus::Completed);
        let second = session(now - Duration::days(2), SessionStatus::Completed);
        let mut prompted = session(now - Duration::days(3), SessionStatus::Completed);
        prompted.review_prompted = true;
        let confirmed = session(now + Duration::days(1), SessionStatus::Confirmed);
        for s in [&first, &second, &prompted, &confirmed] {
            store.add_session(s.clone()).await;
        }

        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = DelayedDispatcher::new(gateway.clone());
        let jobs = Jobs::new(store.clone(), dispatcher, 30);

        jobs.review_prompt_sweep().await;
        sleep(StdDuration::from_millis(10)).await;
        assert_eq!(gateway.sent_count(), 2);
        assert!(store.session(first.id).await.unwrap().review_prompted);
        assert!(store.session(second.id).await.unwrap().review_prompted);

        // a second sweep finds nothing new
        jobs.review_prompt_sweep().await;
        sleep(StdDuration::from_millis(10)).await;
        assert_eq!(gateway.sent_count(), 2);

        let kinds: Vec<NotificationKind> = gateway
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::ReviewPrompt, NotificationKind::ReviewPrompt]
        );
    }

    #[test]
    fn test_notification_delay_arithmetic() {
        let now = Utc::now();
        let lead = Duration::minutes(30);

        // starts in 45 minutes: reminder fires in 15
        assert_eq!(
            notification_delay(now, now + Duration::minutes(45), lead),
            Some(StdDuration::from_secs(15 * 60))
        );
        // starts in 20 minutes: too late to usefully schedule
        assert_eq!(notification_delay(now, now + Duration::minutes(20), lead), None);
        // exactly at the lead boundary: delay would be zero, skipped
        assert_eq!(notification_delay(now, now + Duration::minutes(30), lead), None);
    }

    #[test]
    fn test_half_hour_alignment_delay() {
        let at_minute = |minute: u32| {
            Utc.with_ymd_and_hms(2025, 6, 2, 9, minute, 0).unwrap()
        };

        assert_eq!(
            half_hour_alignment_delay(at_minute(12)),
            StdDuration::from_secs(18 * 60)
        );
        assert_eq!(
            half_hour_alignment_delay(at_minute(59)),
            StdDuration::from_secs(60)
        );
        // exactly on a boundary: the full half hour until the next one
        assert_eq!(
            half_hour_alignment_delay(at_minute(0)),
            StdDuration::from_secs(30 * 60)
        );
        assert_eq!(
            half_hour_alignment_delay(at_minute(30)),
            StdDuration::from_secs(30 * 60)
        );
    }
}
