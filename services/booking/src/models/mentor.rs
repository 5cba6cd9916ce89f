//! Mentor profile model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of a mentor's profile the booking core needs: the meeting link
/// and the listed prices, both copied into a session when it is booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorProfile {
    pub user_id: Uuid,
    pub meeting_link: Option<String>,
    pub prices: Vec<String>,
}

impl MentorProfile {
    /// First listed price, the one committed into a new booking
    pub fn first_price(&self) -> Option<&str> {
        self.prices.first().map(String::as_str)
    }
}
