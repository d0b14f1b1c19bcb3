use mockall::mock;
use perfaware_core::process::{CommandRunner, Invocation, RunOutcome};
use perfaware_core::Result;
use std::time::Duration;

mock! {
    pub Runner {}
    impl CommandRunner for Runner {
        fn run(&mut self, invocation: &Invocation) -> Result<RunOutcome>;
    }
}

/// Outcome of `invocation` with the given exit code and stdout.
pub fn outcome(invocation: &Invocation, code: i32, stdout: &[u8]) -> RunOutcome {
    RunOutcome {
        invocation: invocation.clone(),
        code: Some(code),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
        duration: Duration::from_millis(1),
    }
}
