//! Configuration for the round-trip harness.
//!
//! This module defines the structures that parameterize a harness run. It provides:
//! 1. **Defaults:** Tool command lines, cleanup pattern and the built-in listing catalog.
//! 2. **Structures:** [`HarnessConfig`] and [`ToolSpec`], deserializable from JSON.
//! 3. **Policy:** [`FailurePolicy`], deciding whether a failed step aborts the run.
//!
//! Every field is optional in JSON; omitted fields take the defaults below.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::common::constants::placeholders;
use crate::common::error::{Error, Result};
use crate::listing::{ExecutionMode, ListingCase};

/// Default configuration values.
mod defaults {
    /// Working directory for artifacts and tool invocations.
    pub const WORKDIR: &str = ".";

    /// Directory relative listing paths are resolved against.
    pub const LISTINGS_DIR: &str = "../../part1";

    /// Files matching this pattern are deleted before a run.
    pub const CLEANUP_PATTERN: &str = "listing*";

    /// Assembler program.
    pub const ASSEMBLER: &str = "nasm";

    /// Decoder/simulator executable produced by the build step.
    pub const DECODER: &str = "./build/sim86";

    /// Byte-wise comparison tool.
    #[cfg(not(windows))]
    pub const DIFF: &str = "cmp";
    #[cfg(windows)]
    pub const DIFF: &str = "fc";

    /// Flag selecting byte-wise output of the comparison tool.
    #[cfg(not(windows))]
    pub const DIFF_FLAG: &str = "-l";
    #[cfg(windows)]
    pub const DIFF_FLAG: &str = "/b";

    /// Build script producing the decoder.
    #[cfg(not(windows))]
    pub const BUILD: &str = "./build.sh";
    #[cfg(windows)]
    pub const BUILD: &str = "build.bat";

    /// Built-in catalog: `(name, listing file stem, mode is print)`.
    pub const CATALOG: &[(&str, &str, bool)] = &[
        ("listing-0037", "listing_0037_single_register_mov", true),
        ("listing-0038", "listing_0038_many_register_mov", true),
        ("listing-0039", "listing_0039_more_movs", true),
        ("listing-0043", "listing_0043_immediate_movs", false),
        ("listing-0044", "listing_0044_register_movs", false),
    ];
}

/// What the harness does when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and keep going.
    #[default]
    Continue,
    /// Stop the run at the first failed step.
    Abort,
}

/// An external program and its argument template.
///
/// Arguments may contain placeholders such as `{input}` or `{binary}`; they are
/// substituted by [`ToolSpec::render`] right before the tool is run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Program name (looked up on `PATH`) or path.
    pub program: String,
    /// Argument template.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolSpec {
    /// Creates a tool spec from a program and argument template.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Substitutes `substitutions` (placeholder, value) into every argument.
    pub fn render(&self, substitutions: &[(&str, &str)]) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                substitutions
                    .iter()
                    .fold(arg.clone(), |acc, (key, value)| acc.replace(key, value))
            })
            .collect()
    }

    fn default_assembler() -> Self {
        Self::new(
            defaults::ASSEMBLER,
            [placeholders::INPUT, "-o", placeholders::OUTPUT],
        )
    }

    fn default_decoder() -> Self {
        Self::new(defaults::DECODER, [placeholders::MODE, placeholders::BINARY])
    }

    fn default_diff() -> Self {
        Self::new(
            defaults::DIFF,
            [
                defaults::DIFF_FLAG,
                placeholders::ORIGINAL,
                placeholders::REASSEMBLED,
            ],
        )
    }

    fn default_build() -> Option<Self> {
        Some(Self::new(defaults::BUILD, Vec::<String>::new()))
    }
}

/// Root configuration of a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Directory artifacts are written to and tools run in. Program paths
    /// such as `./build.sh` are resolved against it.
    #[serde(default = "HarnessConfig::default_workdir")]
    pub workdir: PathBuf,

    /// Base directory for relative listing paths, itself relative to `workdir`.
    #[serde(default = "HarnessConfig::default_listings_dir")]
    pub listings_dir: PathBuf,

    /// Glob (`*`, `?`, `[...]`) of files in `workdir` removed before the run.
    #[serde(default = "HarnessConfig::default_cleanup_pattern")]
    pub cleanup_pattern: String,

    /// Assembler; placeholders `{input}` and `{output}`.
    #[serde(default = "ToolSpec::default_assembler")]
    pub assembler: ToolSpec,

    /// Decoder/simulator; placeholders `{mode}` and `{binary}`.
    #[serde(default = "ToolSpec::default_decoder")]
    pub decoder: ToolSpec,

    /// Byte-wise diff; placeholders `{original}` and `{reassembled}`.
    #[serde(default = "ToolSpec::default_diff")]
    pub diff: ToolSpec,

    /// Build step run once before the catalog; `null` disables it.
    #[serde(default = "ToolSpec::default_build")]
    pub build: Option<ToolSpec>,

    /// Echo tool output to the console while capturing it.
    #[serde(default = "HarnessConfig::default_echo_output")]
    pub echo_output: bool,

    /// Behavior on a failed step.
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Ordered list of listings to run.
    #[serde(default = "HarnessConfig::default_catalog")]
    pub catalog: Vec<ListingCase>,
}

impl HarnessConfig {
    fn default_workdir() -> PathBuf {
        PathBuf::from(defaults::WORKDIR)
    }

    fn default_listings_dir() -> PathBuf {
        PathBuf::from(defaults::LISTINGS_DIR)
    }

    fn default_cleanup_pattern() -> String {
        defaults::CLEANUP_PATTERN.to_string()
    }

    const fn default_echo_output() -> bool {
        true
    }

    /// The built-in catalog: three disassembly listings followed by two simulate listings.
    pub fn default_catalog() -> Vec<ListingCase> {
        defaults::CATALOG
            .iter()
            .map(|&(name, stem, print)| {
                let mode = if print {
                    ExecutionMode::Print
                } else {
                    ExecutionMode::Sim
                };
                ListingCase::new(name, stem, mode)
            })
            .collect()
    }

    /// Parses a JSON configuration and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid harness configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks tool programs, the cleanup pattern and catalog names.
    pub fn validate(&self) -> Result<()> {
        let tools = [
            ("assembler", Some(&self.assembler)),
            ("decoder", Some(&self.decoder)),
            ("diff", Some(&self.diff)),
            ("build", self.build.as_ref()),
        ];
        for (role, tool) in tools {
            if tool.is_some_and(|t| t.program.trim().is_empty()) {
                return Err(Error::Config(format!("{role} program is empty")));
            }
        }

        if self.cleanup_pattern.trim().is_empty() {
            return Err(Error::Config("cleanup pattern is empty".to_string()));
        }
        let _ = self.cleanup_glob()?;

        let mut seen = HashSet::new();
        for case in &self.catalog {
            if case.name.trim().is_empty() {
                return Err(Error::Config(format!(
                    "catalog entry `{}` has an empty name",
                    case.path.display()
                )));
            }
            if !seen.insert(case.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate catalog entry `{}`",
                    case.name
                )));
            }
        }
        Ok(())
    }

    /// Compiles the cleanup pattern.
    pub fn cleanup_glob(&self) -> Result<Pattern> {
        Pattern::new(&self.cleanup_pattern).map_err(|e| {
            Error::Config(format!(
                "invalid cleanup pattern `{}`: {e}",
                self.cleanup_pattern
            ))
        })
    }

    /// Path of `case`'s listing (without extension) as seen from the process.
    pub fn listing_path(&self, case: &ListingCase) -> PathBuf {
        self.workdir.join(&self.listings_dir).join(&case.path)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workdir: Self::default_workdir(),
            listings_dir: Self::default_listings_dir(),
            cleanup_pattern: Self::default_cleanup_pattern(),
            assembler: ToolSpec::default_assembler(),
            decoder: ToolSpec::default_decoder(),
            diff: ToolSpec::default_diff(),
            build: ToolSpec::default_build(),
            echo_output: Self::default_echo_output(),
            failure_policy: FailurePolicy::default(),
            catalog: Self::default_catalog(),
        }
    }
}
