//! Ground-truth artifact I/O.
//!
//! A dataset is persisted as two files that must agree in count and order:
//! 1. **Ground truth** (`results.bin`): one little-endian `f32` distance per pair, no header.
//! 2. **Pairs** (`data.json`): `{"pairs": [{"x0", "y0", "x1", "y1"}, ...]}`, plus
//!    `"clusters"` when the dataset was generated in cluster mode.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::constants::{GROUND_TRUTH_FILE, PAIRS_FILE};
use crate::common::error::{Error, Result};
use crate::dataset::generator::Dataset;
use crate::dataset::pair::{ClusterBounds, CoordinatePair};

const RECORD_BYTES: usize = std::mem::size_of::<f32>();

/// JSON companion document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairsDocument {
    /// Pairs in ground-truth order.
    pub pairs: Vec<CoordinatePair>,
    /// Cluster sub-ranges, present only for cluster-mode datasets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterBounds>,
}

/// Locations of the two artifacts of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Binary ground-truth file.
    pub ground_truth: PathBuf,
    /// JSON pairs document.
    pub pairs: PathBuf,
}

impl ArtifactPaths {
    /// Default artifact names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            ground_truth: dir.join(GROUND_TRUTH_FILE),
            pairs: dir.join(PAIRS_FILE),
        }
    }
}

/// Writes `distances` as packed little-endian `f32` records, overwriting `path`.
pub fn write_ground_truth(path: &Path, distances: &[f32]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    for d in distances {
        out.write_all(&d.to_le_bytes())
            .map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))
}

/// Reads a ground-truth file written by [`write_ground_truth`].
pub fn read_ground_truth(path: &Path) -> Result<Vec<f32>> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    if bytes.len() % RECORD_BYTES != 0 {
        return Err(Error::TruncatedGroundTruth {
            path: path.to_path_buf(),
            len: bytes.len() as u64,
        });
    }
    Ok(bytes
        .chunks_exact(RECORD_BYTES)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Writes `document` as JSON, overwriting `path`.
pub fn write_pairs_json(path: &Path, document: &PairsDocument) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, document).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.flush().map_err(|e| Error::io(path, e))
}

/// Reads a JSON pairs document.
pub fn read_pairs_json(path: &Path) -> Result<PairsDocument> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes both artifacts of `dataset` to `paths`.
pub fn write_dataset(paths: &ArtifactPaths, dataset: &Dataset) -> Result<()> {
    if dataset.pairs.len() != dataset.distances.len() {
        return Err(Error::CountMismatch {
            pairs: dataset.pairs.len(),
            distances: dataset.distances.len(),
        });
    }

    write_ground_truth(&paths.ground_truth, &dataset.distances)?;
    write_pairs_json(
        &paths.pairs,
        &PairsDocument {
            pairs: dataset.pairs.clone(),
            clusters: dataset.clusters.clone(),
        },
    )?;

    info!(
        records = dataset.distances.len(),
        ground_truth = %paths.ground_truth.display(),
        pairs = %paths.pairs.display(),
        "dataset written"
    );
    Ok(())
}
