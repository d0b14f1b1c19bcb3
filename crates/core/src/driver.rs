//! Harness driver.
//!
//! A run performs, in order:
//! 1. **Cleanup:** removes stale files in the working directory matching the cleanup pattern.
//! 2. **Build:** runs the configured build step once.
//! 3. **Catalog:** runs every listing through the [`ListingRunner`] in catalog order.
//!
//! The driver never decides pass/fail on its own; the returned
//! [`HarnessSummary`] carries every outcome.

use std::collections::HashSet;
use std::fs;
use std::path::{self, Path, PathBuf};

use tracing::{debug, info};

use crate::common::error::{Error, Result};
use crate::config::HarnessConfig;
use crate::listing::{ListingPaths, ListingRunner, run_step};
use crate::process::{CommandRunner, Invocation, SystemRunner};
use crate::report::{HarnessSummary, Step};

/// Orchestrates a full harness run.
#[derive(Debug)]
pub struct HarnessDriver<R: CommandRunner> {
    config: HarnessConfig,
    runner: R,
}

impl<R: CommandRunner> HarnessDriver<R> {
    /// Creates a driver after validating `config`.
    ///
    /// The working directory is made absolute so artifact paths handed to
    /// tools stay valid whatever directory the tools run in.
    pub fn new(mut config: HarnessConfig, runner: R) -> Result<Self> {
        config.validate()?;
        config.workdir = absolute(&config.workdir)?;
        Ok(Self { config, runner })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Consumes the driver, returning its runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Runs cleanup, the build step and the whole catalog.
    pub fn run(&mut self) -> Result<HarnessSummary> {
        let mut summary = HarnessSummary::default();

        self.announce("deleting all old listing files");
        summary.removed = self.cleanup()?;
        info!(removed = summary.removed.len(), "cleanup done");

        if let Some(build) = &self.config.build {
            self.announce("building the decoder");
            let invocation = Invocation::new(&build.program, build.render(&[]));
            let record = run_step(
                &mut self.runner,
                self.config.failure_policy,
                Step::Build.as_str(),
                Step::Build,
                &invocation,
            )?;
            summary.build = Some(record);
        }

        self.announce("running all listings");
        for case in &self.config.catalog {
            let report = ListingRunner::new(&self.config, &mut self.runner).run(case)?;
            info!(case = %report.name, passed = report.passed(), "listing finished");
            summary.reports.push(report);
        }

        Ok(summary)
    }

    /// Deletes regular files in the working directory whose names match the
    /// cleanup pattern. Catalog sources are never deleted.
    pub fn cleanup(&self) -> Result<Vec<PathBuf>> {
        let workdir = &self.config.workdir;
        let pattern = self.config.cleanup_glob()?;
        let protected = self.protected_sources();

        let entries = fs::read_dir(workdir).map_err(|e| Error::io(workdir, e))?;
        let mut removed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(workdir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !pattern.matches(name) {
                continue;
            }
            if canonical(&path).is_some_and(|p| protected.contains(&p)) {
                debug!(path = %path.display(), "keeping catalog source");
                continue;
            }

            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
            debug!(path = %path.display(), "removed");
            removed.push(path);
        }
        removed.sort();
        Ok(removed)
    }

    fn protected_sources(&self) -> HashSet<PathBuf> {
        self.config
            .catalog
            .iter()
            .filter_map(|case| ListingPaths::resolve(&self.config, case).ok())
            .filter_map(|paths| canonical(&paths.source))
            .collect()
    }

    fn announce(&self, phase: &str) {
        info!("{phase}");
        if self.config.echo_output {
            println!("{phase}");
        }
    }
}

impl HarnessDriver<SystemRunner> {
    /// Creates a driver whose tools run inside the configured working directory.
    pub fn with_system_runner(config: HarnessConfig) -> Result<Self> {
        let runner = SystemRunner::new(config.echo_output).in_dir(absolute(&config.workdir)?);
        Self::new(config, runner)
    }
}

fn absolute(dir: &Path) -> Result<PathBuf> {
    path::absolute(dir).map_err(|e| Error::io(dir, e))
}

fn canonical(path: &Path) -> Option<PathBuf> {
    fs::canonicalize(path).ok()
}
