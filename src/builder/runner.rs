//! Running one external tool invocation.

use std::io;
use std::process::ExitStatus;

use crate::builder::plan::BuildStage;
use crate::core::Environment;
use crate::util::process::ProcessBuilder;

/// How a tool invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Exit code zero.
    Success,
    /// Any other exit code.
    Failure { exit_code: i32 },
    /// No exit code at all (killed by a signal).
    Terminated,
}

impl StageOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => StageOutcome::Success,
            Some(exit_code) => StageOutcome::Failure { exit_code },
            None => StageOutcome::Terminated,
        }
    }

    pub fn is_success(self) -> bool {
        self == StageOutcome::Success
    }
}

/// Launches tool invocations, one at a time.
///
/// `Err` is reserved for invocations that could not be started; a tool that
/// ran and failed is an `Ok` outcome.
pub trait StageRunner {
    fn run(&mut self, invocation: &BuildStage, env: &Environment) -> io::Result<StageOutcome>;
}

impl<R: StageRunner + ?Sized> StageRunner for &mut R {
    fn run(&mut self, invocation: &BuildStage, env: &Environment) -> io::Result<StageOutcome> {
        (**self).run(invocation, env)
    }
}

/// Runs invocations as real subprocesses wired to this process's terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        ProcessRunner
    }
}

impl StageRunner for ProcessRunner {
    fn run(&mut self, invocation: &BuildStage, env: &Environment) -> io::Result<StageOutcome> {
        let status = ProcessBuilder::new(&invocation.program)
            .args(&invocation.args)
            .cwd(&invocation.cwd)
            .env_clear_and_set(env.clone())
            .status()?;

        Ok(StageOutcome::from_status(status))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_process_runner_outcomes() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::ambient();
        let mut runner = ProcessRunner::new();

        let ok = BuildStage::new("sh", tmp.path()).args(["-c", "exit 0"]);
        assert_eq!(runner.run(&ok, &env).unwrap(), StageOutcome::Success);

        let failed = BuildStage::new("sh", tmp.path()).args(["-c", "exit 3"]);
        assert_eq!(
            runner.run(&failed, &env).unwrap(),
            StageOutcome::Failure { exit_code: 3 }
        );

        let killed = BuildStage::new("sh", tmp.path()).args(["-c", "kill -9 $$"]);
        assert_eq!(runner.run(&killed, &env).unwrap(), StageOutcome::Terminated);
    }

    #[test]
    fn test_process_runner_launch_failure() {
        let tmp = TempDir::new().unwrap();
        let missing = BuildStage::new(tmp.path().join("configure"), tmp.path());

        let err = ProcessRunner::new()
            .run(&missing, &Environment::ambient())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_process_runner_runs_in_cwd() {
        let tmp = TempDir::new().unwrap();
        let invocation = BuildStage::new("sh", tmp.path()).args(["-c", "touch ran-here"]);

        let outcome = ProcessRunner::new()
            .run(&invocation, &Environment::ambient())
            .unwrap();

        assert!(outcome.is_success());
        assert!(tmp.path().join("ran-here").exists());
    }
}
