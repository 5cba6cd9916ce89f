//! Repository implementations of the store contract

pub mod booking;

pub use self::booking::PgBookingStore;
