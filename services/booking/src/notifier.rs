//! Notification payloads and the delivery gateway seam
//!
//! The core prepares payloads and hands them to a `NotificationGateway`; how
//! a message actually reaches the user (email, SMS, push) is the gateway's
//! concern and out of scope here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::models::Session;

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    UpcomingSession,
    ReviewPrompt,
}

/// Prepared message handed to the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub session_id: Uuid,
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub session_start: DateTime<Utc>,
    pub message: String,
}

impl NotificationPayload {
    /// Reminder sent to the mentee ahead of a confirmed session
    pub fn upcoming(session: &Session) -> Self {
        Self {
            session_id: session.id,
            recipient_id: session.mentee_id,
            kind: NotificationKind::UpcomingSession,
            session_start: session.session_time_start,
            message: format!(
                "Your mentoring session starts at {}",
                session.session_time_start.format("%Y-%m-%d %H:%M UTC")
            ),
        }
    }

    /// Post-session review prompt for the mentee
    pub fn review_prompt(session: &Session) -> Self {
        Self {
            session_id: session.id,
            recipient_id: session.mentee_id,
            kind: NotificationKind::ReviewPrompt,
            session_start: session.session_time_start,
            message: "How was your session? Leave a review for your mentor.".to_string(),
        }
    }
}

/// Sends a prepared notification. Fire-and-forget from the caller's
/// perspective: a failure is reported back once and never retried.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> anyhow::Result<()>;
}

/// Gateway that logs payloads instead of delivering them. Used by the worker
/// binary until a real delivery channel is configured.
pub struct LogNotifier;

#[async_trait]
impl NotificationGateway for LogNotifier {
    async fn send(&self, payload: &NotificationPayload) -> anyhow::Result<()> {
        info!(
            session = %payload.session_id,
            recipient = %payload.recipient_id,
            "notification: {}",
            serde_json::to_string(payload)?
        );
        Ok(())
    }
}
