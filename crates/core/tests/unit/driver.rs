//! # Driver Tests
//!
//! Cleanup, the build step, catalog order and the failure policy over a
//! whole run.

use crate::common::harness::{MOV_LISTING, TestContext, print_case, sim_case};
use crate::common::mocks::toolchain::{ASSEMBLER, BUILD, DECODER, DIFF, FakeToolchain};
use perfaware_core::config::{FailurePolicy, HarnessConfig};
use perfaware_core::{Error, HarnessDriver};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;

fn catalog_ctx() -> TestContext {
    let ctx = TestContext::new();
    let _ = ctx.add_listing("listing_0037_single_register_mov", MOV_LISTING);
    let _ = ctx.add_listing("listing_0038_many_register_mov", MOV_LISTING);
    let _ = ctx.add_listing("listing_0043_immediate_movs", MOV_LISTING);
    ctx
}

fn three_cases() -> Vec<perfaware_core::listing::ListingCase> {
    vec![
        print_case("listing-0037", "listing_0037_single_register_mov"),
        print_case("listing-0038", "listing_0038_many_register_mov"),
        sim_case("listing-0043", "listing_0043_immediate_movs"),
    ]
}

mod cleanup {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removes_matching_files_only() {
        let ctx = TestContext::new();
        let stale_a = ctx.write("listing_0037_single_register_mov-disassembly", b"old");
        let stale_b = ctx.write("listing_0037_single_register_mov-disassembly.asm", b"old");
        let keep = ctx.write("notes.txt", b"keep");
        fs::create_dir(ctx.path("listing_dir")).unwrap();

        let driver = HarnessDriver::new(ctx.fake_config(Vec::new()), FakeToolchain::new()).unwrap();
        let removed = driver.cleanup().unwrap();

        let mut expected = vec![stale_a.clone(), stale_b.clone()];
        expected.sort();
        assert_eq!(removed, expected);
        assert!(!stale_a.exists() && !stale_b.exists());
        assert!(keep.exists());
        assert!(ctx.path("listing_dir").is_dir());
        assert!(ctx.path("listings").is_dir());
    }

    #[test]
    fn test_is_idempotent() {
        let ctx = TestContext::new();
        let _ = ctx.write("listing_a", b"x");
        let driver = HarnessDriver::new(ctx.fake_config(Vec::new()), FakeToolchain::new()).unwrap();

        assert_eq!(driver.cleanup().unwrap().len(), 1);
        assert!(driver.cleanup().unwrap().is_empty());
    }

    #[test]
    fn test_never_deletes_catalog_sources() {
        let ctx = TestContext::new();
        let source = ctx.write("listing_0039_more_movs.asm", MOV_LISTING.as_bytes());
        let stale = ctx.write("listing_0039_more_movs", b"old binary");

        let mut config = ctx.fake_config(vec![print_case("listing-0039", "listing_0039_more_movs")]);
        config.listings_dir = PathBuf::from(".");
        let driver = HarnessDriver::new(config, FakeToolchain::new()).unwrap();

        assert_eq!(driver.cleanup().unwrap(), vec![stale]);
        assert!(source.exists());
    }

    #[test]
    fn test_relative_workdir_is_made_absolute() {
        let ctx = TestContext::new();
        let mut config = ctx.fake_config(Vec::new());
        config.workdir = PathBuf::from("target/harness-out");
        let driver = HarnessDriver::new(config, FakeToolchain::new()).unwrap();

        let workdir = &driver.config().workdir;
        assert!(workdir.is_absolute());
        assert!(workdir.ends_with("target/harness-out"));
    }

    #[test]
    fn test_missing_workdir_is_an_io_error() {
        let ctx = TestContext::new();
        let mut config = ctx.fake_config(Vec::new());
        config.workdir = ctx.path("gone");
        let driver = HarnessDriver::new(config, FakeToolchain::new()).unwrap();
        assert!(matches!(driver.cleanup(), Err(Error::Io { .. })));
    }
}

mod run {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_runs_once_before_the_catalog_in_order() {
        let ctx = catalog_ctx();
        let mut driver = HarnessDriver::new(ctx.fake_config(three_cases()), FakeToolchain::new()).unwrap();

        let summary = driver.run().unwrap();

        assert!(summary.all_passed(), "{summary}");
        assert_eq!(summary.passed_count(), 3);
        let names: Vec<&str> = summary.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["listing-0037", "listing-0038", "listing-0043"]);
        assert!(summary.build.as_ref().is_some_and(|b| !b.failed()));

        let tools = driver.into_runner();
        assert_eq!(
            tools.programs(),
            [
                BUILD, ASSEMBLER, DECODER, ASSEMBLER, DIFF, ASSEMBLER, DECODER, ASSEMBLER, DIFF,
                ASSEMBLER, DECODER
            ]
        );
    }

    #[test]
    fn test_stale_artifacts_from_a_previous_run_are_removed_first() {
        let ctx = catalog_ctx();
        let config = ctx.fake_config(three_cases());
        let mut first = HarnessDriver::new(config.clone(), FakeToolchain::new()).unwrap();
        let _ = first.run().unwrap();

        let mut second = HarnessDriver::new(config, FakeToolchain::new()).unwrap();
        let summary = second.run().unwrap();
        // Two print cases leave a disassembly source and binary each.
        assert_eq!(summary.removed.len(), 4);
        assert!(summary.all_passed());
    }

    #[test]
    fn test_disabled_build_is_skipped() {
        let ctx = catalog_ctx();
        let mut config = ctx.fake_config(three_cases());
        config.build = None;
        let mut driver = HarnessDriver::new(config, FakeToolchain::new()).unwrap();

        let summary = driver.run().unwrap();
        assert_eq!(summary.build, None);
        assert!(!driver.into_runner().programs().contains(&BUILD));
    }

    #[test]
    fn test_continue_policy_runs_every_case_and_reports_failure() {
        let ctx = catalog_ctx();
        let mut driver =
            HarnessDriver::new(ctx.fake_config(three_cases()), FakeToolchain::new().corrupting()).unwrap();

        let summary = driver.run().unwrap();

        assert!(!summary.all_passed());
        assert_eq!(summary.reports.len(), 3);
        // Sim mode does not compare, so only the print cases fail.
        let verdicts: Vec<bool> = summary.reports.iter().map(|r| r.passed()).collect();
        assert_eq!(verdicts, [false, false, true]);
        assert!(summary.to_string().ends_with("TOTAL: 1 passed, 2 failed (0 stale files removed)"));
    }

    #[test]
    fn test_failed_build_fails_the_run_under_continue() {
        let ctx = catalog_ctx();
        let mut driver =
            HarnessDriver::new(ctx.fake_config(three_cases()), FakeToolchain::new().failing(BUILD)).unwrap();

        let summary = driver.run().unwrap();
        assert_eq!(summary.passed_count(), 3);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_abort_policy_stops_at_the_first_failure() {
        let ctx = catalog_ctx();
        let mut config = ctx.fake_config(three_cases());
        config.failure_policy = FailurePolicy::Abort;
        let mut driver = HarnessDriver::new(config, FakeToolchain::new().failing(DECODER)).unwrap();

        let err = driver.run().unwrap_err();
        assert!(matches!(
            err,
            Error::StepFailed { ref case, ref step, .. } if case == "listing-0037" && step == "decode"
        ));
        assert_eq!(driver.into_runner().programs(), [BUILD, ASSEMBLER, DECODER]);
    }

    #[test]
    fn test_abort_on_failed_build_runs_no_listing() {
        let ctx = catalog_ctx();
        let mut config = ctx.fake_config(three_cases());
        config.failure_policy = FailurePolicy::Abort;
        let mut driver = HarnessDriver::new(config, FakeToolchain::new().missing(BUILD)).unwrap();

        assert!(matches!(driver.run(), Err(Error::Spawn { .. })));
        assert_eq!(driver.into_runner().programs(), [BUILD]);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let ctx = catalog_ctx();
        let config = ctx.fake_config(vec![
            print_case("same", "listing_0037_single_register_mov"),
            print_case("same", "listing_0038_many_register_mov"),
        ]);
        assert!(matches!(
            HarnessDriver::new(config, FakeToolchain::new()),
            Err(Error::Config(_))
        ));
    }
}

#[rstest]
#[case("listing*", "listing_0037", true)]
#[case("listing*", "listing", true)]
#[case("listing*", "my_listing", false)]
#[case("*.asm", "a.asm", true)]
#[case("*.asm", "a.asm.bak", false)]
#[case("listing_00??", "listing_0037", true)]
#[case("listing_00??", "listing_003", false)]
#[case("*-disassembly*", "listing_0037-disassembly.asm", true)]
#[case("a*b*c", "abbbc", true)]
#[case("a*b*c", "acb", false)]
#[case("*", "", true)]
#[case("", "x", false)]
#[case("listing_003[78]", "listing_0038", true)]
#[case("listing_003[78]", "listing_0039", false)]
fn test_cleanup_patterns(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
    let config = HarnessConfig {
        cleanup_pattern: pattern.to_string(),
        ..HarnessConfig::default()
    };
    let glob = config.cleanup_glob().unwrap();
    assert_eq!(glob.matches(name), expected, "{pattern} vs {name}");
}
