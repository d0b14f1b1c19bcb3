//! External process invocation.
//!
//! Every tool the harness drives (assembler, decoder, diff, build step) goes
//! through a [`CommandRunner`]. A run blocks until the child exits and returns a
//! [`RunOutcome`] carrying the exit code, both captured streams and the elapsed
//! time; deciding whether a failure matters is left to the caller.
//!
//! [`SystemRunner`] spawns real processes, optionally inside a fixed working
//! directory. With echo enabled it tees the child's
//! stdout and stderr to the console while capturing them, so a single
//! invocation serves both the operator and the comparison.

use std::borrow::Cow;
use std::env;
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::common::error::{Error, Result};

/// A fully rendered command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program as configured.
    pub program: String,
    /// Arguments with placeholders already substituted.
    pub args: Vec<String>,
}

impl Invocation {
    /// Creates an invocation.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of one completed process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// The command that ran.
    pub invocation: Invocation,
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Wall-clock time from spawn to exit.
    pub duration: Duration,
}

impl RunOutcome {
    /// True when the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Standard output decoded lossily as UTF-8.
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Standard error decoded lossily as UTF-8.
    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Runs external commands to completion.
pub trait CommandRunner {
    /// Runs `invocation` and waits for it.
    ///
    /// Returns `Err` only when the process could not be started or its output
    /// could not be read; a non-zero exit is reported through [`RunOutcome::code`].
    fn run(&mut self, invocation: &Invocation) -> Result<RunOutcome>;
}

/// [`CommandRunner`] spawning real processes.
///
/// Without a directory, children inherit the current directory of this process.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    echo: bool,
    dir: Option<PathBuf>,
}

impl SystemRunner {
    /// Creates a runner; `echo` tees child output to the console.
    pub const fn new(echo: bool) -> Self {
        Self { echo, dir: None }
    }

    /// Runs every child in `dir`. Programs given as relative paths
    /// (`./build.sh`) are resolved against it as well.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Working directory of spawned children, if fixed.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn resolve(&self, program: &str) -> Result<PathBuf> {
        let found = match &self.dir {
            Some(dir) => which::which_in(program, env::var_os("PATH"), dir),
            None => which::which(program),
        };
        found.map_err(|source| Error::ToolNotFound {
            program: program.to_string(),
            source,
        })
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<RunOutcome> {
        let program = self.resolve(&invocation.program)?;
        let spawn_err = |source: io::Error| Error::Spawn {
            program: invocation.program.clone(),
            source,
        };

        let mut command = Command::new(&program);
        let _ = command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.dir {
            let _ = command.current_dir(dir);
        }

        debug!(command = %invocation, dir = ?self.dir, "spawning");
        let start = Instant::now();
        let mut child = command.spawn().map_err(spawn_err)?;

        let mut child_out = child
            .stdout
            .take()
            .ok_or_else(|| spawn_err(io::Error::other("stdout was not piped")))?;
        let mut child_err = child
            .stderr
            .take()
            .ok_or_else(|| spawn_err(io::Error::other("stderr was not piped")))?;

        let echo = self.echo;
        let (stdout, stderr) = thread::scope(|s| {
            let err_reader = s.spawn(move || tee(&mut child_err, echo.then(io::stderr)));
            let stdout = tee(&mut child_out, echo.then(io::stdout));
            let stderr = err_reader
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stderr reader panicked")));
            (stdout, stderr)
        });
        let stdout = stdout.map_err(spawn_err)?;
        let stderr = stderr.map_err(spawn_err)?;

        let status = child.wait().map_err(spawn_err)?;
        let duration = start.elapsed();

        debug!(
            command = %invocation,
            code = ?status.code(),
            elapsed_ms = duration.as_millis(),
            "finished"
        );

        Ok(RunOutcome {
            invocation: invocation.clone(),
            code: status.code(),
            stdout,
            stderr,
            duration,
        })
    }
}

/// Reads `reader` to the end, copying each chunk to `sink` as it arrives.
fn tee<R: Read, W: Write>(reader: &mut R, mut sink: Option<W>) -> io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        captured.extend_from_slice(&buf[..n]);
        if let Some(sink) = sink.as_mut() {
            sink.write_all(&buf[..n])?;
            sink.flush()?;
        }
    }
    Ok(captured)
}
