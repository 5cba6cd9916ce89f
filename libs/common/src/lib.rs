//! Common library for the MentorLink booking platform
//!
//! This crate provides shared infrastructure used across the MentorLink
//! services: PostgreSQL connection pooling and the database error taxonomy.

pub mod database;
pub mod error;
