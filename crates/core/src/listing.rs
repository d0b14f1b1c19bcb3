//! Listing runner.
//!
//! Takes one catalog entry through the round trip:
//! 1. **Assemble:** `<listing>.asm` becomes the original binary `<listing>`.
//! 2. **Decode:** the decoder runs once on that binary with the mode flag; its
//!    stdout is echoed and captured in the same invocation.
//! 3. **Reassemble** (print mode): the captured text is written to
//!    `<workdir>/<name>-disassembly.asm` and assembled.
//! 4. **Compare** (print mode): the two binaries are compared in-process and
//!    with the configured diff tool.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::common::constants::{ASM_EXTENSION, DISASSEMBLY_SUFFIX, placeholders};
use crate::common::error::{Error, Result};
use crate::config::{FailurePolicy, HarnessConfig, ToolSpec};
use crate::process::{CommandRunner, Invocation, RunOutcome};
use crate::report::{Comparison, ListingReport, Step, StepRecord, StepStatus};

/// How the decoder is exercised for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Print disassembly to stdout; the output is reassembled and compared.
    #[default]
    Print,
    /// Simulate only; output is observed but not compared.
    Sim,
}

impl ExecutionMode {
    /// Decoder flag selecting this mode.
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Print => "--print",
            Self::Sim => "--sim",
        }
    }

    /// Lowercase mode name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Sim => "sim",
        }
    }

    /// Whether the decoder output is reassembled and compared.
    pub const fn round_trips(self) -> bool {
        matches!(self, Self::Print)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCase {
    /// Display name.
    pub name: String,
    /// Listing path without the `.asm` extension.
    pub path: PathBuf,
    /// Execution mode.
    #[serde(default)]
    pub mode: ExecutionMode,
}

impl ListingCase {
    /// Creates a catalog entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, mode: ExecutionMode) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mode,
        }
    }
}

/// Files involved in one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPaths {
    /// `<listing>.asm`
    pub source: PathBuf,
    /// `<listing>`, the original binary.
    pub binary: PathBuf,
    /// `<workdir>/<name>-disassembly.asm`
    pub disassembly_source: PathBuf,
    /// `<workdir>/<name>-disassembly`
    pub disassembly_binary: PathBuf,
}

impl ListingPaths {
    /// Derives every artifact path of `case` under `config`.
    pub fn resolve(config: &HarnessConfig, case: &ListingCase) -> Result<Self> {
        let binary = config.listing_path(case);
        let file_name = binary.file_name().ok_or_else(|| {
            Error::Config(format!(
                "catalog entry `{}` has no file name in `{}`",
                case.name,
                case.path.display()
            ))
        })?;

        let mut disassembly_name = file_name.to_os_string();
        disassembly_name.push(DISASSEMBLY_SUFFIX);
        let disassembly_binary = config.workdir.join(&disassembly_name);

        Ok(Self {
            source: with_asm_extension(&binary),
            disassembly_source: with_asm_extension(&disassembly_binary),
            disassembly_binary,
            binary,
        })
    }
}

/// Appends `.asm` without touching any dot already in the name.
fn with_asm_extension(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ASM_EXTENSION);
    PathBuf::from(name)
}

/// Compares two binaries on disk.
pub fn compare_files(original: &Path, reassembled: &Path) -> Result<Comparison> {
    let read = |path: &Path| match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    };

    let Some(left) = read(original)? else {
        return Ok(Comparison::Missing {
            path: original.to_path_buf(),
        });
    };
    let Some(right) = read(reassembled)? else {
        return Ok(Comparison::Missing {
            path: reassembled.to_path_buf(),
        });
    };
    Ok(Comparison::of(&left, &right))
}

/// Runs single catalog entries against a [`CommandRunner`].
#[derive(Debug)]
pub struct ListingRunner<'a, R: CommandRunner> {
    config: &'a HarnessConfig,
    runner: &'a mut R,
}

impl<'a, R: CommandRunner> ListingRunner<'a, R> {
    /// Creates a runner borrowing the configuration and process runner.
    pub const fn new(config: &'a HarnessConfig, runner: &'a mut R) -> Self {
        Self { config, runner }
    }

    /// Runs `case` through the round trip.
    ///
    /// Under [`FailurePolicy::Abort`] the first failed step returns an error.
    /// Under [`FailurePolicy::Continue`] failures are recorded in the report and
    /// the remaining steps still run.
    pub fn run(&mut self, case: &ListingCase) -> Result<ListingReport> {
        let config = self.config;
        let paths = ListingPaths::resolve(config, case)?;
        let mut report = ListingReport::new(&case.name, case.mode);

        info!(case = %case.name, mode = case.mode.as_str(), "running listing");
        if config.echo_output {
            println!("{}", case.name);
        }

        let source = paths.source.to_string_lossy();
        let binary = paths.binary.to_string_lossy();
        let _ = self.step(
            &mut report,
            Step::Assemble,
            &config.assembler,
            &[(placeholders::INPUT, &*source), (placeholders::OUTPUT, &*binary)],
        )?;

        let decoded = self.step(
            &mut report,
            Step::Decode,
            &config.decoder,
            &[
                (placeholders::MODE, case.mode.flag()),
                (placeholders::BINARY, &*binary),
            ],
        )?;

        if !case.mode.round_trips() {
            return Ok(report);
        }

        let Some(decoded) = decoded else {
            report.comparison = Some(Comparison::Missing {
                path: paths.disassembly_source,
            });
            return Ok(report);
        };

        fs::write(&paths.disassembly_source, &decoded.stdout)
            .map_err(|e| Error::io(&paths.disassembly_source, e))?;

        let disassembly_source = paths.disassembly_source.to_string_lossy();
        let disassembly_binary = paths.disassembly_binary.to_string_lossy();
        let _ = self.step(
            &mut report,
            Step::Reassemble,
            &config.assembler,
            &[
                (placeholders::INPUT, &*disassembly_source),
                (placeholders::OUTPUT, &*disassembly_binary),
            ],
        )?;

        let comparison = compare_files(&paths.binary, &paths.disassembly_binary)?;
        info!(case = %case.name, result = %comparison, "round trip compared");
        report.comparison = Some(comparison);

        let _ = self.step(
            &mut report,
            Step::Diff,
            &config.diff,
            &[
                (placeholders::ORIGINAL, &*binary),
                (placeholders::REASSEMBLED, &*disassembly_binary),
            ],
        )?;

        Ok(report)
    }

    /// Runs one tool, records it in `report` and applies the failure policy.
    fn step(
        &mut self,
        report: &mut ListingReport,
        step: Step,
        tool: &ToolSpec,
        substitutions: &[(&str, &str)],
    ) -> Result<Option<RunOutcome>> {
        let invocation = Invocation::new(&tool.program, tool.render(substitutions));
        let record = run_step(
            &mut *self.runner,
            self.config.failure_policy,
            &report.name,
            step,
            &invocation,
        )?;
        let outcome = record.outcome().cloned();
        report.steps.push(record);
        Ok(outcome)
    }
}

/// Runs `invocation` as `step` of `case` and applies `policy`.
///
/// Returns the record to store, or an error when the step failed under
/// [`FailurePolicy::Abort`].
pub fn run_step<R: CommandRunner + ?Sized>(
    runner: &mut R,
    policy: FailurePolicy,
    case: &str,
    step: Step,
    invocation: &Invocation,
) -> Result<StepRecord> {
    let record = match runner.run(invocation) {
        Ok(outcome) => StepRecord {
            step,
            status: StepStatus::Ran(outcome),
        },
        Err(err) => {
            warn!(case, step = step.as_str(), error = %err, "step could not run");
            if policy == FailurePolicy::Abort {
                return Err(err);
            }
            return Ok(StepRecord {
                step,
                status: StepStatus::NotRun(err.to_string()),
            });
        }
    };

    if record.failed() {
        let code = record.outcome().and_then(|o| o.code);
        warn!(case, step = step.as_str(), ?code, command = %invocation, "step failed");
        if policy == FailurePolicy::Abort {
            return Err(Error::StepFailed {
                case: case.to_string(),
                step: step.as_str().to_string(),
                code,
            });
        }
    }
    Ok(record)
}
