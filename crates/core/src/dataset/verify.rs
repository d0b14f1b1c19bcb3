//! Ground-truth verification.
//!
//! Recomputes the reference distance of every pair and compares it against the
//! stored `f32` record. Stored values are single precision, so the comparison
//! uses an absolute tolerance rather than equality.

use std::path::Path;

use tracing::warn;

use crate::common::error::{Error, Result};
use crate::dataset::artifacts::{read_ground_truth, read_pairs_json};
use crate::dataset::pair::CoordinatePair;

/// A pair whose recomputed distance is outside the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    /// Pair index.
    pub index: usize,
    /// Recomputed distance.
    pub computed: f64,
    /// Distance stored in the ground truth.
    pub expected: f32,
}

/// Outcome of verifying a dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VerifyReport {
    /// Number of pairs checked.
    pub count: usize,
    /// Mean of the recomputed distances; zero for an empty dataset.
    pub mean: f64,
    /// Pairs outside the tolerance, in index order.
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    /// True when no pair deviated.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Checks `distances` against `pairs`.
pub fn verify(pairs: &[CoordinatePair], distances: &[f32], tolerance: f64) -> Result<VerifyReport> {
    if pairs.len() != distances.len() {
        return Err(Error::CountMismatch {
            pairs: pairs.len(),
            distances: distances.len(),
        });
    }
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(Error::InvalidArgument(format!(
            "tolerance must be a non-negative number, got {tolerance}"
        )));
    }

    let mut report = VerifyReport {
        count: pairs.len(),
        ..VerifyReport::default()
    };
    let mut sum = 0.0;

    for (index, (pair, &expected)) in pairs.iter().zip(distances).enumerate() {
        let computed = pair.distance();
        if (computed - f64::from(expected)).abs() > tolerance {
            warn!(index, computed, expected, "distance outside tolerance");
            report.mismatches.push(Mismatch {
                index,
                computed,
                expected,
            });
        }
        sum += computed;
    }

    if report.count > 0 {
        report.mean = sum / report.count as f64;
    }
    Ok(report)
}

/// Reads both artifacts and verifies them.
pub fn verify_files(pairs_path: &Path, ground_truth_path: &Path, tolerance: f64) -> Result<VerifyReport> {
    let document = read_pairs_json(pairs_path)?;
    let distances = read_ground_truth(ground_truth_path)?;
    verify(&document.pairs, &distances, tolerance)
}
