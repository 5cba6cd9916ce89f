//! Session lifecycle state machine
//!
//! Pure transition logic: given a session and an action, compute the next
//! status and the fields to persist. Status is mutated here and by the bulk
//! sweep filters in the store, nowhere else. `BookingService` wires the
//! transitions to the store for the handler layer.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::availability::session_duration;
use crate::error::{BookingError, BookingResult};
use crate::models::{MentorProfile, NewBooking, Session, SessionStatus};
use crate::store::BookingStore;

/// Party performing an action on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Mentor,
    Mentee,
}

/// Actions that drive an existing session through its lifecycle
#[derive(Debug, Clone)]
pub enum SessionAction {
    RequestReschedule {
        by: Actor,
        new_start: DateTime<Utc>,
    },
    ConfirmReschedule,
    Cancel {
        by: Actor,
    },
}

/// Build a new booking request. Always lands in `PendingByMentor`, commits
/// `session_time_end` one session length after the start, and copies the
/// mentor's meeting link and first listed price into the session.
pub fn create_booking(new: &NewBooking, profile: &MentorProfile, now: DateTime<Utc>) -> Session {
    Session {
        id: Uuid::new_v4(),
        mentor_id: new.mentor_id,
        mentee_id: new.mentee_id,
        session_time_start: new.session_time_start,
        session_time_end: new.session_time_start + session_duration(),
        new_session_time_start: None,
        new_session_time_end: None,
        status: SessionStatus::PendingByMentor,
        mentee_request: new.mentee_request.clone(),
        payment_details: profile.first_price().map(str::to_string),
        meeting_link: profile.meeting_link.clone(),
        review_prompted: false,
        created_at: now,
        updated_at: now,
    }
}

/// Apply an action to an existing session, returning the updated session to
/// persist. No side effects.
pub fn transition(
    session: &Session,
    action: &SessionAction,
    now: DateTime<Utc>,
) -> BookingResult<Session> {
    let mut next = session.clone();

    match action {
        SessionAction::RequestReschedule { by, new_start } => {
            // committed times stay in place until the other party confirms
            next.new_session_time_start = Some(*new_start);
            next.new_session_time_end = Some(*new_start + session_duration());
            next.status = match by {
                Actor::Mentor => SessionStatus::ReschedulingByMentor,
                Actor::Mentee => SessionStatus::ReschedulingByMentee,
            };
        }
        SessionAction::ConfirmReschedule => {
            let (start, end) = match (next.new_session_time_start, next.new_session_time_end) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    return Err(BookingError::InvalidTransition(
                        "no pending reschedule to confirm".to_string(),
                    ));
                }
            };
            next.session_time_start = start;
            next.session_time_end = end;
            next.new_session_time_start = None;
            next.new_session_time_end = None;
            next.status = SessionStatus::Confirmed;
        }
        SessionAction::Cancel { by } => {
            if session.status.is_terminal() {
                return Err(BookingError::InvalidTransition(format!(
                    "cannot cancel a session in status {:?}",
                    session.status
                )));
            }
            next.status = match by {
                Actor::Mentor => SessionStatus::CanceledByMentor,
                Actor::Mentee => SessionStatus::CanceledByMentee,
            };
        }
    }

    next.updated_at = now;
    Ok(next)
}

/// Orchestrates the state machine over the store. This is the contract the
/// handler layer consumes.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn create_booking(&self, new: &NewBooking) -> BookingResult<Session> {
        info!("Creating booking request for mentor {}", new.mentor_id);

        let profile = self
            .store
            .mentor_profile(new.mentor_id)
            .await?
            .ok_or(BookingError::NotFound {
                kind: "Mentor",
                id: new.mentor_id,
            })?;

        let session = create_booking(new, &profile, Utc::now());
        self.store.insert_session(&session).await?;

        Ok(session)
    }

    pub async fn request_reschedule(
        &self,
        session_id: Uuid,
        by: Actor,
        new_start: DateTime<Utc>,
    ) -> BookingResult<Session> {
        info!("Reschedule requested for session {}", session_id);

        self.apply(session_id, SessionAction::RequestReschedule { by, new_start })
            .await
    }

    pub async fn confirm_reschedule(&self, session_id: Uuid) -> BookingResult<Session> {
        info!("Confirming reschedule for session {}", session_id);

        self.apply(session_id, SessionAction::ConfirmReschedule).await
    }

    /// Cancel on behalf of `actor_id`; the mentor cancels as the mentor,
    /// anyone else as the mentee.
    pub async fn cancel(&self, session_id: Uuid, actor_id: Uuid) -> BookingResult<Session> {
        info!("Canceling session {}", session_id);

        let session = self.load(session_id).await?;
        let by = if actor_id == session.mentor_id {
            Actor::Mentor
        } else {
            Actor::Mentee
        };

        let next = transition(&session, &SessionAction::Cancel { by }, Utc::now())?;
        self.store.update_session(&next).await?;
        Ok(next)
    }

    async fn apply(&self, session_id: Uuid, action: SessionAction) -> BookingResult<Session> {
        let session = self.load(session_id).await?;
        let next = transition(&session, &action, Utc::now())?;
        self.store.update_session(&next).await?;
        Ok(next)
    }

    async fn load(&self, session_id: Uuid) -> BookingResult<Session> {
        self.store
            .find_session(session_id)
            .await?
            .ok_or(BookingError::NotFound {
                kind: "Session",
                id: session_id,
            })
    }
}
