//! Harness results.
//!
//! A run produces one [`ListingReport`] per catalog entry, collected into a
//! [`HarnessSummary`]. Both render to the console transcript via `Display`.

use std::fmt;
use std::path::PathBuf;

use crate::listing::ExecutionMode;
use crate::process::RunOutcome;

/// Steps of a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// The one-time build of the decoder.
    Build,
    /// Assembling the original listing.
    Assemble,
    /// Running the decoder on the original binary.
    Decode,
    /// Assembling the captured disassembly.
    Reassemble,
    /// Running the external diff tool.
    Diff,
}

impl Step {
    /// Lowercase step name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Assemble => "assemble",
            Self::Decode => "decode",
            Self::Reassemble => "reassemble",
            Self::Diff => "diff",
        }
    }

    /// Whether a non-zero exit of this step counts as a failure.
    ///
    /// The diff tool exits non-zero whenever the files differ, which is a
    /// comparison result rather than a broken step.
    pub const fn exit_code_matters(self) -> bool {
        !matches!(self, Self::Diff)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened when a step was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// The process ran to completion (with any exit code).
    Ran(RunOutcome),
    /// The process could not be started.
    NotRun(String),
}

/// One attempted step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Which step.
    pub step: Step,
    /// Its status.
    pub status: StepStatus,
}

impl StepRecord {
    /// True when the step could not start, or exited non-zero where that matters.
    pub fn failed(&self) -> bool {
        match &self.status {
            StepStatus::Ran(outcome) => self.step.exit_code_matters() && !outcome.success(),
            StepStatus::NotRun(_) => true,
        }
    }

    /// The process outcome, if it ran.
    pub const fn outcome(&self) -> Option<&RunOutcome> {
        match &self.status {
            StepStatus::Ran(outcome) => Some(outcome),
            StepStatus::NotRun(_) => None,
        }
    }
}

/// Byte-level comparison of the original and reassembled binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Both binaries are byte-identical.
    Identical {
        /// Binary length.
        len: usize,
    },
    /// The binaries differ.
    Differs {
        /// Offset of the first differing byte (or the shorter length).
        first_difference: usize,
        /// Length of the original binary.
        original_len: usize,
        /// Length of the reassembled binary.
        reassembled_len: usize,
    },
    /// A binary to compare does not exist.
    Missing {
        /// The absent file.
        path: PathBuf,
    },
}

impl Comparison {
    /// Compares two byte buffers.
    pub fn of(original: &[u8], reassembled: &[u8]) -> Self {
        if original == reassembled {
            return Self::Identical {
                len: original.len(),
            };
        }
        let first_difference = original
            .iter()
            .zip(reassembled)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| original.len().min(reassembled.len()));
        Self::Differs {
            first_difference,
            original_len: original.len(),
            reassembled_len: reassembled.len(),
        }
    }

    /// True for [`Comparison::Identical`].
    pub const fn is_identical(&self) -> bool {
        matches!(self, Self::Identical { .. })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical { len } => write!(f, "identical ({len} bytes)"),
            Self::Differs {
                first_difference,
                original_len,
                reassembled_len,
            } => write!(
                f,
                "differs at byte {first_difference} (original {original_len} bytes, reassembled {reassembled_len} bytes)"
            ),
            Self::Missing { path } => write!(f, "missing {}", path.display()),
        }
    }
}

/// Everything recorded for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingReport {
    /// Case display name.
    pub name: String,
    /// Mode the case ran in.
    pub mode: ExecutionMode,
    /// Steps in execution order.
    pub steps: Vec<StepRecord>,
    /// Round-trip comparison; `None` in simulate mode.
    pub comparison: Option<Comparison>,
}

impl ListingReport {
    /// Empty report for a case about to run.
    pub fn new(name: impl Into<String>, mode: ExecutionMode) -> Self {
        Self {
            name: name.into(),
            mode,
            steps: Vec::new(),
            comparison: None,
        }
    }

    /// Record of `step`, if it was attempted.
    pub fn step(&self, step: Step) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.step == step)
    }

    /// Steps that failed.
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|r| r.failed())
    }

    /// True when every step succeeded and, in print mode, the round trip is identical.
    pub fn passed(&self) -> bool {
        self.failed_steps().next().is_none()
            && match self.mode {
                ExecutionMode::Print => self.comparison.as_ref().is_some_and(Comparison::is_identical),
                ExecutionMode::Sim => true,
            }
    }
}

impl fmt::Display for ListingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed() { "PASS" } else { "FAIL" };
        write!(f, "  {verdict}  {:<24} {:<6}", self.name, self.mode.as_str())?;
        match &self.comparison {
            Some(comparison) => write!(f, " {comparison}")?,
            None => f.write_str(" simulated")?,
        }
        let failed: Vec<&str> = self.failed_steps().map(|r| r.step.as_str()).collect();
        if !failed.is_empty() {
            write!(f, " [failed: {}]", failed.join(", "))?;
        }
        Ok(())
    }
}

/// Result of a full harness run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarnessSummary {
    /// Files deleted during cleanup.
    pub removed: Vec<PathBuf>,
    /// The build step, if configured.
    pub build: Option<StepRecord>,
    /// Reports in catalog order.
    pub reports: Vec<ListingReport>,
}

impl HarnessSummary {
    /// True when the build succeeded (or was skipped) and every case passed.
    pub fn all_passed(&self) -> bool {
        !self.build.as_ref().is_some_and(StepRecord::failed)
            && self.reports.iter().all(ListingReport::passed)
    }

    /// Number of passing cases.
    pub fn passed_count(&self) -> usize {
        self.reports.iter().filter(|r| r.passed()).count()
    }
}

impl fmt::Display for HarnessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "  Round-trip summary")?;
        writeln!(f, "==========================================================")?;
        if let Some(build) = &self.build {
            let verdict = if build.failed() { "FAIL" } else { "OK" };
            writeln!(f, "  {verdict:<4}  build")?;
        }
        for report in &self.reports {
            writeln!(f, "{report}")?;
        }
        writeln!(f, "----------------------------------------------------------")?;
        write!(
            f,
            "  TOTAL: {} passed, {} failed ({} stale files removed)",
            self.passed_count(),
            self.reports.len() - self.passed_count(),
            self.removed.len()
        )
    }
}
