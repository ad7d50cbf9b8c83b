//! Handler modules for grind-api.
//!
//! Each module groups the HTTP handlers for one resource family.

pub mod analytics;
pub mod enhance;
pub mod problems;
pub mod tags;
