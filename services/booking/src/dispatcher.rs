//! One-shot delayed notification dispatch
//!
//! Each dispatch is an independent task: it sleeps for its delay, invokes
//! the gateway exactly once, and logs and drops any gateway failure.
//! At-most-once delivery is the explicit policy; there is no retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

use crate::notifier::{NotificationGateway, NotificationPayload};

/// Schedules one-shot, per-session timed notification dispatches.
///
/// Task handles are kept in a registry keyed by session id so a cancellation
/// path can be added later; none is wired today, so a dispatch cannot be
/// withdrawn once scheduled, even if the session is canceled in the
/// meantime.
#[derive(Clone)]
pub struct DelayedDispatcher {
    gateway: Arc<dyn NotificationGateway>,
    pending: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
}

impl DelayedDispatcher {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self {
            gateway,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm a one-shot timer that fires the gateway after `delay`
    pub fn schedule(&self, payload: NotificationPayload, delay: Duration) {
        let session_id = payload.session_id;
        let gateway = Arc::clone(&self.gateway);
        let pending = Arc::clone(&self.pending);

        info!(
            session = %session_id,
            delay_secs = delay.as_secs(),
            "scheduling notification dispatch"
        );

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            if let Err(err) = gateway.send(&payload).await {
                // at-most-once: log and drop, never retry
                error!(session = %session_id, "notification dispatch failed: {err:#}");
            }
            if let Ok(mut pending) = pending.lock() {
                pending.remove(&session_id);
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            pending.retain(|_, task| !task.is_finished());
            pending.insert(session_id, handle);
        }
    }

    /// Number of dispatches scheduled and not yet fired
    pub fn outstanding(&self) -> usize {
        self.pending
            .lock()
            .map(|pending| pending.values().filter(|task| !task.is_finished()).count())
            .unwrap_or(0)
    }
}
