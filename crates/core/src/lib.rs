//! Decoder round-trip harness and haversine ground-truth generator.
//!
//! This crate holds the logic behind the `perfaware` command line. It provides:
//! 1. **Reference distance:** The haversine great-circle function every artifact is computed with.
//! 2. **Dataset:** Seeded coordinate-pair generation, ground-truth artifact I/O, and verification.
//! 3. **Process layer:** Blocking invocation of external tools with explicit outcomes.
//! 4. **Listing runner:** Assemble, decode, reassemble and compare one test listing.
//! 5. **Driver:** Cleanup, build step, and ordered execution of the listing catalog.

/// Shared constants and the crate error type.
pub mod common;
/// Harness configuration (tool specs, catalog, failure policy).
pub mod config;
/// Coordinate-pair generation, artifact I/O and ground-truth verification.
pub mod dataset;
/// Harness driver: cleanup, build, and catalog execution.
pub mod driver;
/// Reference haversine distance.
pub mod haversine;
/// Listing runner: one round trip through assembler and decoder.
pub mod listing;
/// External process invocation.
pub mod process;
/// Per-case and per-run results and their console rendering.
pub mod report;

/// Crate error and result types.
pub use crate::common::error::{Error, Result};
/// Root harness configuration; use `HarnessConfig::default()` or load from JSON.
pub use crate::config::HarnessConfig;
/// Drives a full harness run over a catalog.
pub use crate::driver::HarnessDriver;
/// Runs external commands; `SystemRunner` is the production implementation.
pub use crate::process::{CommandRunner, SystemRunner};
