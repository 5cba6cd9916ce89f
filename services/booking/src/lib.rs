//! MentorLink booking core
//!
//! The scheduling and availability heart of the booking platform: computing
//! bookable time slots from recurring weekly availability windows, the
//! session lifecycle state machine, and the background jobs that recalculate
//! session state and fire time-precise reminders ahead of upcoming sessions.

pub mod availability;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod jobs;
pub mod models;
pub mod notifier;
pub mod repositories;
pub mod scheduler;
pub mod state_machine;
pub mod store;
pub mod validation;
