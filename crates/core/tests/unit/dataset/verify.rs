//! # Verification Tests

use crate::common::harness::TestContext;
use perfaware_core::Error;
use perfaware_core::common::constants::VERIFY_TOLERANCE_KM;
use perfaware_core::dataset::artifacts::{ArtifactPaths, write_dataset, write_ground_truth};
use perfaware_core::dataset::generator::{Dataset, Distribution, GeneratorParams, generate};
use perfaware_core::dataset::verify::{verify, verify_files};

fn dataset(count: usize) -> Dataset {
    generate(GeneratorParams {
        count,
        seed: 1234,
        distribution: Distribution::Normal,
    })
    .unwrap()
}

#[test]
fn test_fresh_dataset_verifies_clean() {
    let data = dataset(100);
    let report = verify(&data.pairs, &data.distances, VERIFY_TOLERANCE_KM).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.count, 100);
    assert!((report.mean - data.mean).abs() < 1e-6);
}

#[test]
fn test_tampered_distance_is_reported() {
    let data = dataset(10);
    let mut distances = data.distances.clone();
    distances[3] += 1.0;

    let report = verify(&data.pairs, &distances, VERIFY_TOLERANCE_KM).unwrap();
    assert_eq!(report.mismatches.len(), 1);
    let m = report.mismatches[0];
    assert_eq!(m.index, 3);
    assert_eq!(m.expected, distances[3]);
    assert!((m.computed - f64::from(data.distances[3])).abs() < 0.01);
}

#[test]
fn test_count_mismatch_is_an_error() {
    let data = dataset(4);
    let err = verify(&data.pairs, &data.distances[..3], VERIFY_TOLERANCE_KM).unwrap_err();
    assert!(matches!(err, Error::CountMismatch { pairs: 4, distances: 3 }));
}

#[test]
fn test_negative_tolerance_is_rejected() {
    let data = dataset(1);
    assert!(matches!(
        verify(&data.pairs, &data.distances, -1.0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_empty_dataset_has_zero_mean() {
    let report = verify(&[], &[], VERIFY_TOLERANCE_KM).unwrap();
    assert_eq!(report.count, 0);
    assert_eq!(report.mean, 0.0);
}

#[test]
fn test_files_verify_after_writing() {
    let ctx = TestContext::new();
    let paths = ArtifactPaths::in_dir(ctx.workdir());
    write_dataset(&paths, &dataset(20)).unwrap();

    let report = verify_files(&paths.pairs, &paths.ground_truth, VERIFY_TOLERANCE_KM).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.count, 20);
}

#[test]
fn test_short_ground_truth_file_is_a_count_mismatch() {
    let ctx = TestContext::new();
    let paths = ArtifactPaths::in_dir(ctx.workdir());
    let data = dataset(5);
    write_dataset(&paths, &data).unwrap();
    write_ground_truth(&paths.ground_truth, &data.distances[..2]).unwrap();

    let err = verify_files(&paths.pairs, &paths.ground_truth, VERIFY_TOLERANCE_KM).unwrap_err();
    assert!(matches!(err, Error::CountMismatch { pairs: 5, distances: 2 }));
}
