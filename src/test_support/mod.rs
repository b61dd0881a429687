//! Test utilities and fakes for unit tests.
//!
//! [`RecordingRunner`] stands in for real process execution: it records every
//! invocation it is handed, together with the fully composed environment,
//! and returns scripted outcomes.
//!
//! # Example
//!
//! ```rust,ignore
//! use seshat_build::test_support::{test_layout, test_platform, RecordingRunner};
//!
//! #[test]
//! fn test_example() {
//!     let (_tmp, layout) = test_layout();
//!     let plan = BuildPlan::new(&test_platform(OsFamily::OtherUnix, Arch::X64), &layout);
//!
//!     let mut runner = RecordingRunner::new().fail_at(1, 2);
//!     // Drive the plan through a BuildExecutor...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use crate::builder::plan::BuildStage;
use crate::builder::runner::{StageOutcome, StageRunner};
use crate::core::Environment;
use crate::util::process::display_command;

pub use fixtures::*;

/// One invocation seen by a [`RecordingRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// The composed environment the process would have received
    pub env: Environment,
}

impl RecordedCall {
    /// The command line, as [`BuildStage::display_command`] renders it.
    pub fn command(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

/// What to do on a given call.
#[derive(Debug, Clone, Copy)]
enum Scripted {
    Outcome(StageOutcome),
    LaunchFailure,
}

/// Fake [`StageRunner`] that records invocations and returns scripted outcomes.
///
/// Calls are numbered from zero in the order they arrive. Unscripted calls
/// succeed.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    script: HashMap<usize, Scripted>,
    calls: Vec<RecordedCall>,
}

impl RecordingRunner {
    /// Create a runner where every call succeeds.
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Make call `index` exit with `exit_code`.
    pub fn fail_at(self, index: usize, exit_code: i32) -> Self {
        self.outcome_at(index, StageOutcome::Failure { exit_code })
    }

    /// Make call `index` end with `outcome`.
    pub fn outcome_at(mut self, index: usize, outcome: StageOutcome) -> Self {
        self.script.insert(index, Scripted::Outcome(outcome));
        self
    }

    /// Make call `index` fail to launch.
    pub fn launch_failure_at(mut self, index: usize) -> Self {
        self.script.insert(index, Scripted::LaunchFailure);
        self
    }

    /// Every call seen so far.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Command lines of every call seen so far.
    pub fn commands(&self) -> Vec<String> {
        self.calls.iter().map(RecordedCall::command).collect()
    }
}

impl StageRunner for RecordingRunner {
    fn run(&mut self, invocation: &BuildStage, env: &Environment) -> io::Result<StageOutcome> {
        let index = self.calls.len();
        self.calls.push(RecordedCall {
            program: invocation.program.clone(),
            args: invocation.args.clone(),
            cwd: invocation.cwd.clone(),
            env: env.clone(),
        });

        match self.script.get(&index) {
            Some(Scripted::Outcome(outcome)) => Ok(*outcome),
            Some(Scripted::LaunchFailure) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", invocation.program.display()),
            )),
            None => Ok(StageOutcome::Success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_script() {
        let mut runner = RecordingRunner::new()
            .fail_at(1, 9)
            .launch_failure_at(2);
        let env = Environment::new().with("A", "1");
        let make = BuildStage::new("make", "/src");

        assert_eq!(runner.run(&make, &env).unwrap(), StageOutcome::Success);
        assert_eq!(
            runner.run(&make, &env).unwrap(),
            StageOutcome::Failure { exit_code: 9 }
        );
        assert!(runner.run(&make, &env).is_err());

        assert_eq!(runner.calls().len(), 3);
        assert_eq!(runner.calls()[0].env.get("A"), Some("1"));
        assert_eq!(runner.commands()[0], "make");
    }
}
