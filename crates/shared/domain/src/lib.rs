//! # Domain Models
//!
//! Pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, no storage, no logic beyond defaults and parsing.

pub mod config;
pub mod constants;
