//! Availability window and time slot models

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};

/// Recurring weekly interval during which a mentor can be booked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weekday: Weekday,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
}

impl Availability {
    /// Build a window, enforcing `time_from < time_to` within the day.
    /// Upstream data does not guarantee this, so it is checked here.
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        weekday: Weekday,
        time_from: NaiveTime,
        time_to: NaiveTime,
    ) -> BookingResult<Self> {
        if time_from >= time_to {
            return Err(BookingError::InvalidInput(format!(
                "Availability window must start before it ends, got {time_from}..{time_to}"
            )));
        }

        Ok(Self {
            id,
            user_id,
            weekday,
            time_from,
            time_to,
        })
    }
}

/// Concrete, dated candidate booking interval derived from an availability
/// window. Computed on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Full English name of a weekday, as exposed to the handler layer
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
