//! trigon-common — Shared types, errors, and parameters used across all Trigon crates.

pub mod claim;
pub mod ents;
pub mod error;
pub mod evidence;
pub mod notice;
pub mod params;

// Re-export commonly used types
pub use error::{Error, Result};
