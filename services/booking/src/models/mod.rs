//! Booking service models

pub mod auth_session;
pub mod availability;
pub mod mentor;
pub mod session;

// Re-export for convenience
pub use auth_session::AuthSession;
pub use availability::{Availability, TimeSlot, weekday_name};
pub use mentor::MentorProfile;
pub use session::{
    NewBooking, Session, SessionStatus, StatusGroup, mentee_label_for, mentor_label_for,
};
