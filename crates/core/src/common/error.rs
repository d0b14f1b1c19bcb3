//! Error definitions.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants fall
//! into two groups:
//! 1. **Input validation:** Bad generator parameters, malformed artifacts or configuration.
//! 2. **External processes:** Tools that cannot be found or spawned, and steps that fail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the harness, the generator and the verifier.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied parameter is out of range or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A filesystem operation on `path` failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A JSON document could not be read or written.
    #[error("{}: {source}", path.display())]
    Json {
        /// Document path.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The ground-truth file length is not a whole number of `f32` records.
    #[error("{}: length {len} is not a multiple of 4 bytes", path.display())]
    TruncatedGroundTruth {
        /// Ground-truth path.
        path: PathBuf,
        /// Observed length in bytes.
        len: u64,
    },

    /// The two artifacts disagree on the number of records.
    #[error("artifact count mismatch: {pairs} pairs but {distances} distances")]
    CountMismatch {
        /// Pairs in the JSON document.
        pairs: usize,
        /// Records in the ground-truth file.
        distances: usize,
    },

    /// An external program could not be located on `PATH`.
    #[error("tool `{program}` not found: {source}")]
    ToolNotFound {
        /// Program as configured.
        program: String,
        /// Lookup failure.
        #[source]
        source: which::Error,
    },

    /// An external program was found but could not be started or read.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program as configured.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A harness step failed while the abort policy was in effect.
    #[error("{case}: {step} step failed ({})", describe_code(.code.as_ref()))]
    StepFailed {
        /// Case (or `build`) the step belongs to.
        case: String,
        /// Step name.
        step: String,
        /// Exit code, `None` when the process never ran or was killed.
        code: Option<i32>,
    },

    /// The harness configuration is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

fn describe_code(code: Option<&i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"))
}

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
