//! Seeded coordinate-pair generation.
//!
//! The generator is fully deterministic: the same [`GeneratorParams`] always
//! produce the same pairs, distances and therefore byte-identical artifacts.
//! Randomness comes from `ChaCha8Rng`, whose stream is fixed across platforms
//! and `rand` releases.
//!
//! Two distributions are supported:
//! 1. **Normal:** every coordinate drawn uniformly over the globe, rounded to 4 decimals.
//! 2. **Cluster:** pairs split over [`CLUSTER_COUNT`] clusters, each confined to a random sub-range.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::constants::{CLUSTER_COUNT, COORDINATE_DECIMALS};
use crate::common::error::{Error, Result};
use crate::dataset::pair::{ClusterBounds, CoordinatePair, LATITUDE_RANGE, LONGITUDE_RANGE};

/// Spatial distribution of generated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Uniform scatter over the whole globe.
    #[default]
    Normal,
    /// Points concentrated in a few random sub-regions.
    Cluster,
}

impl Distribution {
    /// Name used on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Cluster => "cluster",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Distribution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Self::Normal),
            "cluster" => Ok(Self::Cluster),
            other => Err(Error::InvalidArgument(format!(
                "unknown mode `{other}` (expected `normal` or `cluster`)"
            ))),
        }
    }
}

/// Inputs of one generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorParams {
    /// Number of coordinate pairs; must be at least 1.
    pub count: usize,
    /// RNG seed.
    pub seed: u64,
    /// Distribution policy.
    pub distribution: Distribution,
}

/// Generated pairs with their reference distances.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Pairs in generation order.
    pub pairs: Vec<CoordinatePair>,
    /// `distances[i]` is the reference distance of `pairs[i]`.
    pub distances: Vec<f32>,
    /// Cluster sub-ranges; empty in normal mode.
    pub clusters: Vec<ClusterBounds>,
    /// Arithmetic mean of the distances, accumulated in `f64`.
    pub mean: f64,
}

/// Deterministic pair generator.
#[derive(Debug)]
pub struct Generator {
    params: GeneratorParams,
    rng: ChaCha8Rng,
}

impl Generator {
    /// Creates a generator, rejecting a zero pair count.
    pub fn new(params: GeneratorParams) -> Result<Self> {
        if params.count == 0 {
            return Err(Error::InvalidArgument(
                "pair count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            params,
            rng: ChaCha8Rng::seed_from_u64(params.seed),
        })
    }

    /// Parameters this generator was built with.
    pub const fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Consumes the generator and produces the dataset.
    pub fn generate(mut self) -> Dataset {
        debug!(
            count = self.params.count,
            seed = self.params.seed,
            mode = %self.params.distribution,
            "generating coordinate pairs"
        );

        let (pairs, clusters) = match self.params.distribution {
            Distribution::Normal => (self.normal_pairs(), Vec::new()),
            Distribution::Cluster => self.cluster_pairs(),
        };

        let mut sum = 0.0;
        let distances = pairs
            .iter()
            .map(|pair| {
                let d = pair.distance();
                sum += d;
                d as f32
            })
            .collect::<Vec<_>>();
        let mean = sum / pairs.len() as f64;

        Dataset {
            pairs,
            distances,
            clusters,
            mean,
        }
    }

    fn normal_pairs(&mut self) -> Vec<CoordinatePair> {
        (0..self.params.count)
            .map(|_| {
                let (lon, lat) = (LONGITUDE_RANGE, LATITUDE_RANGE);
                CoordinatePair {
                    x0: round_coordinate(self.rng.random_range(lon.0..=lon.1)),
                    y0: round_coordinate(self.rng.random_range(lat.0..=lat.1)),
                    x1: round_coordinate(self.rng.random_range(lon.0..=lon.1)),
                    y1: round_coordinate(self.rng.random_range(lat.0..=lat.1)),
                }
            })
            .collect()
    }

    /// Every member of a cluster is sampled inside that cluster's sub-range.
    /// The `count % CLUSTER_COUNT` remainder goes one pair each to the first clusters.
    fn cluster_pairs(&mut self) -> (Vec<CoordinatePair>, Vec<ClusterBounds>) {
        let count = self.params.count;
        let per_cluster = count / CLUSTER_COUNT;
        let remainder = count % CLUSTER_COUNT;

        let mut pairs = Vec::with_capacity(count);
        let mut clusters = Vec::with_capacity(CLUSTER_COUNT);

        for index in 0..CLUSTER_COUNT {
            let (x_min, x_max) = self.sub_range(LONGITUDE_RANGE);
            let (y_min, y_max) = self.sub_range(LATITUDE_RANGE);
            let members = per_cluster + usize::from(index < remainder);

            let bounds = ClusterBounds {
                x_min,
                x_max,
                y_min,
                y_max,
                first: pairs.len(),
                count: members,
            };

            for _ in 0..members {
                pairs.push(CoordinatePair {
                    x0: self.rng.random_range(x_min..=x_max),
                    y0: self.rng.random_range(y_min..=y_max),
                    x1: self.rng.random_range(x_min..=x_max),
                    y1: self.rng.random_range(y_min..=y_max),
                });
            }
            clusters.push(bounds);
        }

        (pairs, clusters)
    }

    fn sub_range(&mut self, (low, high): (f64, f64)) -> (f64, f64) {
        let a = self.rng.random_range(low..=high);
        let b = self.rng.random_range(low..=high);
        if a <= b { (a, b) } else { (b, a) }
    }
}

fn round_coordinate(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

/// Generates a dataset in one call.
pub fn generate(params: GeneratorParams) -> Result<Dataset> {
    Ok(Generator::new(params)?.generate())
}
