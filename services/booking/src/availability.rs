//! Availability engine
//!
//! Turns recurring weekly availability windows into concrete, bookable time
//! slots: lazy slot generation per window, conflict filtering against booked
//! sessions, and the calculator that orchestrates both across a date range.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{BookingError, BookingResult};
use crate::models::{Availability, Session, TimeSlot, weekday_name};
use crate::store::BookingStore;

/// Minutes between consecutive candidate slot starts
pub const SLOT_STEP_MINUTES: i64 = 30;
/// Fixed session length in minutes
pub const SESSION_DURATION_MINUTES: i64 = 60;

pub fn slot_step() -> Duration {
    Duration::minutes(SLOT_STEP_MINUTES)
}

pub fn session_duration() -> Duration {
    Duration::minutes(SESSION_DURATION_MINUTES)
}

/// Lazy, finite, restartable sequence of candidate slots for one availability
/// window on a concrete date.
///
/// Starts at `time_from`, advances by the slot step, and stops once a
/// candidate's end would reach `time_to + session duration`. The last slot's
/// start may therefore fall before `time_to` while its end extends past it.
#[derive(Debug, Clone)]
pub struct SlotIter {
    next_start: DateTime<Utc>,
    hard_stop: DateTime<Utc>,
    step: Duration,
    duration: Duration,
}

/// Candidate slots for `window` on `date`. Calling this again yields a fresh
/// sequence; generation has no side effects.
pub fn slot_candidates(
    window: &Availability,
    date: NaiveDate,
    step: Duration,
    duration: Duration,
) -> SlotIter {
    SlotIter {
        next_start: date.and_time(window.time_from).and_utc(),
        hard_stop: date.and_time(window.time_to).and_utc() + duration,
        step,
        duration,
    }
}

impl Iterator for SlotIter {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<TimeSlot> {
        let end_time = self.next_start + self.duration;
        if end_time >= self.hard_stop {
            return None;
        }

        let slot = TimeSlot {
            start_time: self.next_start,
            end_time,
        };
        self.next_start += self.step;
        Some(slot)
    }
}

/// Remove candidate slots that temporally overlap any active booking.
/// Canceled and expired sessions do not block. Input order is preserved.
pub fn filter_conflicts<'a, I>(slots: I, booked: &'a [Session]) -> impl Iterator<Item = TimeSlot> + 'a
where
    I: Iterator<Item = TimeSlot> + 'a,
{
    slots.filter(move |slot| {
        !booked.iter().any(|session| {
            session.status.blocks_booking()
                && slot.end_time > session.session_time_start
                && slot.start_time < session.session_time_end
        })
    })
}

/// A calendar day on which a user has at least one availability window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableDay {
    pub date: NaiveDate,
    pub weekday: &'static str,
}

/// Computes bookable days and slots for a user from their weekly
/// availability set and their booked sessions.
#[derive(Clone)]
pub struct AvailabilityCalculator {
    store: Arc<dyn BookingStore>,
    step: Duration,
    duration: Duration,
}

impl AvailabilityCalculator {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            store,
            step: slot_step(),
            duration: session_duration(),
        }
    }

    /// Every calendar day in `[from, to]` whose weekday matches at least one
    /// of the user's availability windows, in date order.
    pub async fn available_weekdays(
        &self,
        user_id: uuid::Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> BookingResult<Vec<AvailableDay>> {
        let availabilities = self.store.availabilities_for(user_id).await?;
        let weekdays: HashSet<Weekday> = availabilities.iter().map(|a| a.weekday).collect();

        let mut days = Vec::new();
        let mut day = from;
        while day <= to {
            if weekdays.contains(&day.weekday()) {
                days.push(AvailableDay {
                    date: day,
                    weekday: weekday_name(day.weekday()),
                });
            }
            day = day.succ_opt().ok_or_else(|| {
                BookingError::InvalidInput("date range exceeds the supported calendar".to_string())
            })?;
        }

        Ok(days)
    }

    /// Bookable slots for a mentor on a single day, in window-then-time
    /// order. Slots from different windows are concatenated as-is: a mentor
    /// with overlapping availability entries sees overlapping slots emitted
    /// by each window, and no deduplication is applied here.
    pub async fn available_slots(
        &self,
        mentor_id: uuid::Uuid,
        date: NaiveDate,
    ) -> BookingResult<Vec<TimeSlot>> {
        let availabilities = self.store.availabilities_for(mentor_id).await?;

        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::minutes(24 * 60 - 1);
        let booked = self
            .store
            .booked_sessions_for(mentor_id, day_start, day_end)
            .await?;

        let mut candidates = Vec::new();
        for window in availabilities.iter().filter(|a| a.weekday == date.weekday()) {
            candidates.extend(slot_candidates(window, date, self.step, self.duration));
        }

        Ok(filter_conflicts(candidates.into_iter(), &booked).collect())
    }
}
