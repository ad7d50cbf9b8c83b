//! # grind-core
//!
//! Core types, traits, and abstractions for the grind library.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other grind crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use tags::*;
pub use traits::*;
