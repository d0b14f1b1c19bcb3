//! Reference great-circle distance.
//!
//! All ground-truth values are produced and checked with [`reference_haversine`].
//! The radian factor is [`DEG_TO_RAD`], whose precision is part of the on-disk
//! format: changing it alters stored distances at the last significant digits.

use crate::common::constants::DEG_TO_RAD;

#[inline]
fn square(x: f64) -> f64 {
    x * x
}

#[inline]
fn deg_to_rad(deg: f64) -> f64 {
    DEG_TO_RAD * deg
}

/// Haversine distance between `(x0, y0)` and `(x1, y1)`, in the unit of `earth_radius`.
///
/// `x` values are longitudes and `y` values latitudes, both in degrees.
/// The result is non-negative for any finite input.
pub fn reference_haversine(x0: f64, y0: f64, x1: f64, y1: f64, earth_radius: f64) -> f64 {
    let d_lat = deg_to_rad(y1 - y0);
    let d_lon = deg_to_rad(x1 - x0);
    let lat1 = deg_to_rad(y0);
    let lat2 = deg_to_rad(y1);

    let a = square((d_lat / 2.0).sin()) + lat1.cos() * lat2.cos() * square((d_lon / 2.0).sin());
    let c = 2.0 * a.sqrt().asin();

    earth_radius * c
}
