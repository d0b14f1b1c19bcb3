//! perfaware command line.
//!
//! This binary provides a single entry point for the three workflows:
//! 1. **generate:** Produce a seeded haversine dataset (`results.bin` + `data.json`).
//! 2. **verify:** Recompute a dataset's distances and compare them with its ground truth.
//! 3. **harness:** Run the decoder round-trip harness over the listing catalog.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use perfaware_core::common::constants::VERIFY_TOLERANCE_KM;
use perfaware_core::config::FailurePolicy;
use perfaware_core::dataset::artifacts::{self, ArtifactPaths};
use perfaware_core::dataset::generator::{Distribution, Generator, GeneratorParams};
use perfaware_core::dataset::verify;
use perfaware_core::{Error, HarnessConfig, HarnessDriver, Result};

#[derive(Parser, Debug)]
#[command(
    name = "perfaware",
    author,
    version,
    about = "Decoder round-trip harness and haversine ground-truth generator",
    long_about = "Generate and verify haversine ground truth, or run the decoder round-trip harness.\n\nExamples:\n  perfaware generate 10000 42 normal\n  perfaware generate 8 7 cluster --out-dir data\n  perfaware verify --data data.json --results results.bin\n  perfaware harness --config harness.json"
)]
struct Cli {
    /// Log progress to stderr (repeat for debug output). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate coordinate pairs and their reference distances.
    Generate {
        /// Number of coordinate pairs.
        #[arg(value_name = "PAIR COUNT")]
        count: usize,

        /// RNG seed.
        seed: u64,

        /// Distribution: `normal` or `cluster`.
        mode: Distribution,

        /// Directory receiving `results.bin` and `data.json`.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Check a dataset's ground truth against recomputed distances.
    Verify {
        /// JSON pairs document.
        #[arg(long, default_value = "data.json")]
        data: PathBuf,

        /// Binary ground-truth file.
        #[arg(long, default_value = "results.bin")]
        results: PathBuf,

        /// Allowed absolute deviation in kilometers.
        #[arg(long, default_value_t = VERIFY_TOLERANCE_KM)]
        tolerance: f64,
    },

    /// Run the decoder round-trip harness.
    Harness(HarnessArgs),
}

#[derive(Args, Debug)]
struct HarnessArgs {
    /// JSON harness configuration; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the working directory (artifacts, cleanup, and where tools run).
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Stop at the first failed step instead of continuing.
    #[arg(long)]
    abort_on_failure: bool,

    /// Skip the build step.
    #[arg(long)]
    no_build: bool,

    /// Do not echo tool output.
    #[arg(short, long)]
    quiet: bool,

    /// Print the effective configuration as JSON and exit without running.
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Generate {
            count,
            seed,
            mode,
            out_dir,
        } => cmd_generate(count, seed, mode, out_dir),
        Commands::Verify {
            data,
            results,
            tolerance,
        } => cmd_verify(&data, &results, tolerance),
        Commands::Harness(args) => cmd_harness(args),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("[!] {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr subscriber; stdout stays reserved for results and tool output.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Generates a dataset and prints its mean distance.
///
/// Parameters are validated before any file is created.
fn cmd_generate(count: usize, seed: u64, distribution: Distribution, out_dir: PathBuf) -> Result<bool> {
    let generator = Generator::new(GeneratorParams {
        count,
        seed,
        distribution,
    })?;
    info!(count, seed, mode = %distribution, "generating dataset");
    let dataset = generator.generate();

    let paths = ArtifactPaths::in_dir(&out_dir);
    artifacts::write_dataset(&paths, &dataset)?;

    println!("result: {}", dataset.mean);
    Ok(true)
}

/// Verifies a dataset, printing every out-of-tolerance pair and the mean.
fn cmd_verify(data: &Path, results: &Path, tolerance: f64) -> Result<bool> {
    let report = verify::verify_files(data, results, tolerance)?;

    println!("pairs: {}", report.count);
    for m in &report.mismatches {
        println!(
            "index: {} ; distance: {} ; expected: {}",
            m.index, m.computed, m.expected
        );
    }
    println!("result: {}", report.mean);
    Ok(report.is_clean())
}

/// Runs the harness and prints the summary; `Ok(false)` when any case failed.
fn cmd_harness(args: HarnessArgs) -> Result<bool> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(workdir) = args.workdir {
        config.workdir = workdir;
    }
    if args.abort_on_failure {
        config.failure_policy = FailurePolicy::Abort;
    }
    if args.no_build {
        config.build = None;
    }
    if args.quiet {
        config.echo_output = false;
    }

    if args.print_config {
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| Error::Config(format!("cannot serialize configuration: {e}")))?;
        println!("{json}");
        return Ok(true);
    }
    debug!(workdir = %config.workdir.display(), cases = config.catalog.len(), "harness configured");

    let mut driver = HarnessDriver::with_system_runner(config)?;
    let summary = driver.run()?;

    println!();
    println!("{summary}");
    Ok(summary.all_passed())
}
