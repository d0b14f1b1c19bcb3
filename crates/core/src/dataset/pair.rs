//! Records persisted in the JSON companion document.

use serde::{Deserialize, Serialize};

use crate::common::constants::EARTH_RADIUS_KM;
use crate::haversine::reference_haversine;

/// Longitude range in degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Latitude range in degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Two points on the globe: `(x0, y0)` and `(x1, y1)` as longitude/latitude degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePair {
    /// Longitude of the first point.
    pub x0: f64,
    /// Latitude of the first point.
    pub y0: f64,
    /// Longitude of the second point.
    pub x1: f64,
    /// Latitude of the second point.
    pub y1: f64,
}

impl CoordinatePair {
    /// Reference distance in kilometers between the two points.
    pub fn distance(&self) -> f64 {
        reference_haversine(self.x0, self.y0, self.x1, self.y1, EARTH_RADIUS_KM)
    }

    /// True when every coordinate lies in its canonical geographic range.
    pub fn in_canonical_range(&self) -> bool {
        let lon = |v: f64| (LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&v);
        let lat = |v: f64| (LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&v);
        lon(self.x0) && lon(self.x1) && lat(self.y0) && lat(self.y1)
    }
}

/// Sub-range one cluster's points are drawn from, and the pairs it owns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterBounds {
    /// Minimum longitude.
    pub x_min: f64,
    /// Maximum longitude.
    pub x_max: f64,
    /// Minimum latitude.
    pub y_min: f64,
    /// Maximum latitude.
    pub y_max: f64,
    /// Index of the cluster's first pair.
    pub first: usize,
    /// Number of pairs in the cluster.
    pub count: usize,
}

impl ClusterBounds {
    /// True when both points of `pair` lie inside this sub-range.
    pub fn contains(&self, pair: &CoordinatePair) -> bool {
        let lon = |v: f64| (self.x_min..=self.x_max).contains(&v);
        let lat = |v: f64| (self.y_min..=self.y_max).contains(&v);
        lon(pair.x0) && lon(pair.x1) && lat(pair.y0) && lat(pair.y1)
    }

    /// Pair indices owned by this cluster.
    pub const fn members(&self) -> std::ops::Range<usize> {
        self.first..self.first + self.count
    }
}
