//! # Reference Distance Tests
//!
//! Great arcs along the equator and a meridian have a closed form
//! (`radius * degrees * DEG_TO_RAD`), which pins both the formula and the
//! radian factor.

use perfaware_core::common::constants::{DEG_TO_RAD, EARTH_RADIUS_KM};
use perfaware_core::haversine::reference_haversine;
use rstest::rstest;
use std::f64::consts::PI;

fn arc(degrees: f64) -> f64 {
    EARTH_RADIUS_KM * degrees * DEG_TO_RAD
}

#[rstest]
#[case::equator_quarter(0.0, 0.0, 90.0, 0.0, 90.0)]
#[case::equator_west(-45.0, 0.0, 45.0, 0.0, 90.0)]
#[case::meridian_to_pole(0.0, 0.0, 0.0, 90.0, 90.0)]
#[case::meridian_south(30.0, -60.0, 30.0, 15.0, 75.0)]
#[case::short_hop(10.0, 0.0, 11.0, 0.0, 1.0)]
fn test_great_arcs_match_closed_form(
    #[case] x0: f64,
    #[case] y0: f64,
    #[case] x1: f64,
    #[case] y1: f64,
    #[case] degrees: f64,
) {
    let d = reference_haversine(x0, y0, x1, y1, EARTH_RADIUS_KM);
    let expected = arc(degrees);
    assert!(
        (d - expected).abs() < 1e-6,
        "distance {d} vs closed form {expected}"
    );
}

#[test]
fn test_coincident_points_are_zero() {
    assert_eq!(reference_haversine(-122.4, 37.8, -122.4, 37.8, EARTH_RADIUS_KM), 0.0);
}

#[test]
fn test_scales_linearly_with_radius() {
    let unit = reference_haversine(-71.06, 42.36, 2.35, 48.86, 1.0);
    let earth = reference_haversine(-71.06, 42.36, 2.35, 48.86, EARTH_RADIUS_KM);
    assert!((earth - unit * EARTH_RADIUS_KM).abs() < 1e-9);
}

#[test]
fn test_boston_to_paris_is_about_5500_km() {
    let d = reference_haversine(-71.06, 42.36, 2.35, 48.86, EARTH_RADIUS_KM);
    assert!((5400.0..5600.0).contains(&d), "got {d}");
}

#[test]
fn test_never_exceeds_half_circumference() {
    let half = PI * EARTH_RADIUS_KM;
    for &(x0, y0, x1, y1) in &[
        (-180.0, -90.0, 180.0, 90.0),
        (0.0, 0.0, 180.0, 0.0),
        (-179.9, 89.9, 0.1, -89.9),
    ] {
        let d = reference_haversine(x0, y0, x1, y1, EARTH_RADIUS_KM);
        assert!(d.is_finite() && d >= 0.0 && d <= half + 1e-6, "got {d}");
    }
}

#[test]
fn test_radian_factor_is_the_truncated_constant() {
    assert_eq!(DEG_TO_RAD, 0.01745329238);
    assert_ne!(DEG_TO_RAD, PI / 180.0);
    assert!((DEG_TO_RAD - PI / 180.0).abs() < 1e-9);
}
