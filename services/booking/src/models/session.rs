//! Session model and lifecycle status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a mentoring session.
///
/// The numeric ordinal of each variant is part of the persisted contract:
/// the store keeps the ordinal, the bulk job filters compare on it, and the
/// pending/upcoming grouping is defined by it. Reordering variants would
/// silently change job semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    CreatedByMentee = 0,
    PendingByMentor = 1,
    ReschedulingByMentor = 2,
    ReschedulingByMentee = 3,
    Confirmed = 4,
    CanceledByMentor = 5,
    CanceledByMentee = 6,
    Expired = 7,
    Completed = 8,
}

/// Display grouping used by downstream consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusGroup {
    Pending,
    Upcoming,
}

impl SessionStatus {
    /// Persisted integer value of this status
    pub fn ordinal(self) -> i16 {
        self as i16
    }

    /// Status for a persisted ordinal, if it maps to a known variant
    pub fn from_ordinal(ordinal: i16) -> Option<Self> {
        match ordinal {
            0 => Some(SessionStatus::CreatedByMentee),
            1 => Some(SessionStatus::PendingByMentor),
            2 => Some(SessionStatus::ReschedulingByMentor),
            3 => Some(SessionStatus::ReschedulingByMentee),
            4 => Some(SessionStatus::Confirmed),
            5 => Some(SessionStatus::CanceledByMentor),
            6 => Some(SessionStatus::CanceledByMentee),
            7 => Some(SessionStatus::Expired),
            8 => Some(SessionStatus::Completed),
            _ => None,
        }
    }

    /// Whether the session has reached a final state and stays for history
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionStatus::CanceledByMentor
                | SessionStatus::CanceledByMentee
                | SessionStatus::Expired
                | SessionStatus::Completed
        )
    }

    /// Whether a booked session in this status blocks a candidate slot.
    /// Every status ahead of the terminal-cancel boundary blocks, Confirmed
    /// included; canceled and expired sessions do not.
    pub fn blocks_booking(self) -> bool {
        self.ordinal() < SessionStatus::CanceledByMentor.ordinal()
    }

    /// Display grouping. Everything at or past `Confirmed` counts as
    /// upcoming — including `Completed`. That is deliberate product
    /// behavior, reproduced here as an explicit policy.
    pub fn group(self) -> StatusGroup {
        if self < SessionStatus::Confirmed {
            StatusGroup::Pending
        } else {
            StatusGroup::Upcoming
        }
    }

    /// Mentor-facing status description
    pub fn mentor_label(self) -> &'static str {
        match self {
            SessionStatus::CreatedByMentee => "New booking request",
            SessionStatus::PendingByMentor => "Awaiting your response",
            SessionStatus::ReschedulingByMentor => "Waiting for the mentee to confirm the new time",
            SessionStatus::ReschedulingByMentee => "Mentee proposed a new time",
            SessionStatus::Confirmed => "Confirmed",
            SessionStatus::CanceledByMentor => "You canceled this session",
            SessionStatus::CanceledByMentee => "Canceled by the mentee",
            SessionStatus::Expired => "Expired",
            SessionStatus::Completed => "Completed",
        }
    }

    /// Mentee-facing status description
    pub fn mentee_label(self) -> &'static str {
        match self {
            SessionStatus::CreatedByMentee => "Request sent",
            SessionStatus::PendingByMentor => "Waiting for the mentor to confirm",
            SessionStatus::ReschedulingByMentor => "Mentor proposed a new time",
            SessionStatus::ReschedulingByMentee => "Waiting for the mentor to confirm the new time",
            SessionStatus::Confirmed => "Confirmed",
            SessionStatus::CanceledByMentor => "Canceled by the mentor",
            SessionStatus::CanceledByMentee => "You canceled this session",
            SessionStatus::Expired => "Expired",
            SessionStatus::Completed => "Completed",
        }
    }
}

/// Mentor-facing description for a raw persisted ordinal. Unmapped values
/// come back as the literal "Unknown" rather than failing.
pub fn mentor_label_for(ordinal: i16) -> &'static str {
    SessionStatus::from_ordinal(ordinal).map_or("Unknown", SessionStatus::mentor_label)
}

/// Mentee-facing description for a raw persisted ordinal
pub fn mentee_label_for(ordinal: i16) -> &'static str {
    SessionStatus::from_ordinal(ordinal).map_or("Unknown", SessionStatus::mentee_label)
}

/// Session entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    /// Committed schedule
    pub session_time_start: DateTime<Utc>,
    pub session_time_end: DateTime<Utc>,
    /// Proposed reschedule; present only while a reschedule is pending
    pub new_session_time_start: Option<DateTime<Utc>>,
    pub new_session_time_end: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    /// Free-text request from the mentee
    pub mentee_request: Option<String>,
    pub payment_details: Option<String>,
    pub meeting_link: Option<String>,
    /// Set once the post-session review prompt has been dispatched
    pub review_prompted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New booking request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    pub session_time_start: DateTime<Utc>,
    pub mentee_request: Option<String>,
}
