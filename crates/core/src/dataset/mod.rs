//! Haversine dataset pipeline.
//!
//! 1. **Generation:** [`generator`] samples coordinate pairs under a [`Distribution`].
//! 2. **Artifacts:** [`artifacts`] writes and reads the binary ground truth and the JSON pairs.
//! 3. **Verification:** [`verify`] recomputes distances and reports deviations.

/// Binary ground-truth and JSON pair document I/O.
pub mod artifacts;
/// Seeded coordinate-pair generation.
pub mod generator;
/// Coordinate pair and cluster records.
pub mod pair;
/// Ground-truth verification.
pub mod verify;

pub use artifacts::{ArtifactPaths, PairsDocument};
pub use generator::{Dataset, Distribution, Generator, GeneratorParams};
pub use pair::{ClusterBounds, CoordinatePair};
pub use verify::{Mismatch, VerifyReport};
