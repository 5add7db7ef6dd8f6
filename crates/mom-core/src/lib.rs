//! mom-core
//!
//! Pure domain types for minutes-of-meeting generation: placeholder keys,
//! replacement values and the meeting form that produces them.
//! No document or filesystem dependency.

pub mod error;
pub mod models;
