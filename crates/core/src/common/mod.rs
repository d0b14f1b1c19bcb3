//! Common types and constants shared by the harness and the generator.
//!
//! 1. **Constants:** Earth radius, radian factor, artifact names and tool placeholders.
//! 2. **Error Handling:** The crate-wide [`Error`](error::Error) and `Result` alias.

/// Constants used across the crate.
pub mod constants;

/// Error type and result alias.
pub mod error;

pub use constants::{DEG_TO_RAD, EARTH_RADIUS_KM};
pub use error::{Error, Result};
