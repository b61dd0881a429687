//! Build executor.
//!
//! Drives a [`BuildPlan`] through a [`StageRunner`], one step at a time. The
//! first failure of any kind stops the run; nothing after it is attempted.

use std::time::Instant;

use crate::builder::environment::EnvironmentComposer;
use crate::builder::error::BuildError;
use crate::builder::plan::{BuildPlan, BuildStage, Stage, Step};
use crate::builder::runner::{StageOutcome, StageRunner};
use crate::builder::stager::stage_artifacts;
use crate::util::fs::ensure_dir;

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    /// Running the stage at this index
    Running(usize),
    /// The stage at this index failed, with the tool's exit code when it
    /// ran and returned one
    Failed(usize, Option<i32>),
    Succeeded,
}

/// Executes build plans stage by stage.
pub struct BuildExecutor<R> {
    runner: R,
    composer: EnvironmentComposer,
    state: PipelineState,
}

impl<R: StageRunner> BuildExecutor<R> {
    /// Create a new build executor.
    pub fn new(runner: R, composer: EnvironmentComposer) -> Self {
        BuildExecutor {
            runner,
            composer,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run every stage in order, stopping at the first failure.
    pub fn execute(&mut self, plan: &BuildPlan) -> Result<(), BuildError> {
        let total = plan.stages.len();

        for (index, stage) in plan.stages.iter().enumerate() {
            self.state = PipelineState::Running(index);
            tracing::info!("Running {} [{}/{}]", stage.kind, index + 1, total);

            let start = Instant::now();
            if let Err(err) = self.execute_stage(stage) {
                self.state = PipelineState::Failed(index, err.exit_code());
                return Err(err);
            }
            tracing::debug!(
                "{} finished in {:.2}s",
                stage.kind,
                start.elapsed().as_secs_f64()
            );
        }

        self.state = PipelineState::Succeeded;
        Ok(())
    }

    fn execute_stage(&mut self, stage: &Stage) -> Result<(), BuildError> {
        for step in &stage.steps {
            match step {
                Step::CreateDir { path } => {
                    ensure_dir(path).map_err(|source| BuildError::CreateDir {
                        stage: stage.kind,
                        path: path.clone(),
                        source,
                    })?;
                }
                Step::Run(invocation) => self.run_invocation(stage, invocation)?,
                Step::StageArtifacts { artifacts } => {
                    stage_artifacts(artifacts).map_err(|err| BuildError::Staging {
                        stage: stage.kind,
                        from: err.from,
                        to: err.to,
                        source: err.source,
                    })?;
                }
            }
        }
        Ok(())
    }

    fn run_invocation(&mut self, stage: &Stage, invocation: &BuildStage) -> Result<(), BuildError> {
        tracing::info!(
            "Building in {}: {}",
            invocation.cwd.display(),
            invocation.display_command()
        );
        if !invocation.env.is_empty() {
            tracing::debug!("with env {:?}", invocation.env);
        }

        let env = self.composer.compose(&invocation.env);
        let outcome = self
            .runner
            .run(invocation, &env)
            .map_err(|source| BuildError::Launch {
                stage: stage.kind,
                program: invocation.program.clone(),
                source,
            })?;

        match outcome {
            StageOutcome::Success => Ok(()),
            StageOutcome::Failure { exit_code } => Err(BuildError::NonZeroExit {
                stage: stage.kind,
                program: invocation.program.clone(),
                code: exit_code,
            }),
            StageOutcome::Terminated => Err(BuildError::Terminated {
                stage: stage.kind,
                program: invocation.program.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::builder::plan::StageKind;
    use crate::core::{Arch, Environment, OsFamily};
    use crate::test_support::{test_layout, test_platform, RecordingRunner};

    fn composer() -> EnvironmentComposer {
        EnvironmentComposer::new(&Environment::new(), &Environment::new())
    }

    /// Create the files nmake would have produced for SQLCipher on Windows.
    fn fake_sqlcipher_outputs(layout: &crate::core::ModuleLayout) {
        let bld = layout.sqlcipher_src().join("bld");
        fs::create_dir_all(&bld).unwrap();
        fs::write(bld.join("libsqlite3.lib"), "lib").unwrap();
        fs::write(bld.join("sqlite3.h"), "header").unwrap();
    }

    #[test]
    fn test_all_stages_succeed_in_order() {
        let (_tmp, layout) = test_layout();
        fake_sqlcipher_outputs(&layout);
        let plan = BuildPlan::new(&test_platform(OsFamily::Windows, Arch::X64), &layout);

        let mut runner = RecordingRunner::new();
        let mut executor = BuildExecutor::new(&mut runner, composer());
        executor.execute(&plan).unwrap();
        assert_eq!(executor.state(), PipelineState::Succeeded);

        let commands = runner.commands();
        assert_eq!(commands.len(), 5);
        assert!(commands[0].starts_with("perl Configure"));
        assert_eq!(commands[1], "nmake build_libs");
        assert_eq!(commands[2], "nmake install_dev");
        assert!(commands[3].starts_with("nmake /f"));
        assert!(commands[4].ends_with("build --release"));

        assert!(layout.dep_lib_dir().join("sqlcipher.lib").is_file());
        assert!(layout.dep_include_dir().join("sqlcipher.h").is_file());
    }

    #[test]
    fn test_failure_stops_pipeline() {
        // (failing invocation index, index of the stage it belongs to)
        let cases = [(0, 0), (2, 0), (3, 1), (4, 2)];

        for (fail_at, stage_index) in cases {
            let (_tmp, layout) = test_layout();
            fake_sqlcipher_outputs(&layout);
            let plan = BuildPlan::new(&test_platform(OsFamily::Windows, Arch::X64), &layout);

            let mut runner = RecordingRunner::new().fail_at(fail_at, 42);
            let mut executor = BuildExecutor::new(&mut runner, composer());
            let err = executor.execute(&plan).unwrap_err();

            assert!(matches!(err, BuildError::NonZeroExit { code: 42, .. }));
            assert_eq!(err.stage(), plan.stages[stage_index].kind);
            assert_eq!(
                executor.state(),
                PipelineState::Failed(stage_index, Some(42))
            );
            assert_eq!(runner.calls().len(), fail_at + 1);
        }
    }

    #[test]
    fn test_unix_failure_skips_module() {
        let (_tmp, layout) = test_layout();
        let plan = BuildPlan::new(&test_platform(OsFamily::OtherUnix, Arch::X64), &layout);

        let mut runner = RecordingRunner::new().fail_at(1, 2);
        let err = BuildExecutor::new(&mut runner, composer())
            .execute(&plan)
            .unwrap_err();

        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.stage(), StageKind::SqlCipherUnix);
        assert_eq!(
            runner.commands(),
            vec![
                plan.stages[0].invocations().next().unwrap().display_command(),
                "make".to_string(),
            ]
        );
    }

    #[test]
    fn test_launch_failure_is_distinct() {
        let (_tmp, layout) = test_layout();
        let plan = BuildPlan::new(&test_platform(OsFamily::MacOs, Arch::Arm64), &layout);

        let mut runner = RecordingRunner::new().launch_failure_at(0);
        let mut executor = BuildExecutor::new(&mut runner, composer());
        let err = executor.execute(&plan).unwrap_err();

        assert!(err.is_launch_failure());
        assert_eq!(err.exit_code(), None);
        assert_eq!(executor.state(), PipelineState::Failed(0, None));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_terminated_tool_fails() {
        let (_tmp, layout) = test_layout();
        let plan = BuildPlan::new(&test_platform(OsFamily::OtherUnix, Arch::X64), &layout);

        let mut runner = RecordingRunner::new().outcome_at(3, StageOutcome::Terminated);
        let err = BuildExecutor::new(&mut runner, composer())
            .execute(&plan)
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::Terminated {
                stage: StageKind::Module,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_artifact_stops_before_module() {
        let (_tmp, layout) = test_layout();
        let bld = layout.sqlcipher_src().join("bld");
        fs::create_dir_all(&bld).unwrap();
        fs::write(bld.join("libsqlite3.lib"), "lib").unwrap();

        let plan = BuildPlan::new(&test_platform(OsFamily::Windows, Arch::X64), &layout);
        let mut runner = RecordingRunner::new();
        let mut executor = BuildExecutor::new(&mut runner, composer());
        let err = executor.execute(&plan).unwrap_err();

        assert!(matches!(
            err,
            BuildError::Staging {
                stage: StageKind::SqlCipherWindows,
                ..
            }
        ));
        assert_eq!(executor.state(), PipelineState::Failed(1, None));
        assert_eq!(runner.calls().len(), 4);
        assert!(!runner.commands().iter().any(|c| c.contains("--release")));
    }

    #[test]
    fn test_create_dir_before_nmake() {
        let (_tmp, layout) = test_layout();
        let plan = BuildPlan::new(&test_platform(OsFamily::Windows, Arch::X64), &layout);
        let bld = layout.sqlcipher_src().join("bld");
        assert!(!bld.exists());

        let mut runner = RecordingRunner::new();
        let _ = BuildExecutor::new(&mut runner, composer()).execute(&plan);

        assert!(bld.is_dir());
    }

    #[test]
    fn test_each_invocation_gets_its_own_env() {
        let (_tmp, layout) = test_layout();
        fake_sqlcipher_outputs(&layout);
        let platform = test_platform(OsFamily::Windows, Arch::X64);
        let plan = BuildPlan::new(&platform, &layout);

        let ambient = Environment::new().with("PATH", "C:\\Windows");
        let composer = EnvironmentComposer::new(&ambient, &platform.base_env());
        let mut runner = RecordingRunner::new();
        BuildExecutor::new(&mut runner, composer)
            .execute(&plan)
            .unwrap();

        let calls = runner.calls();
        let configure_env = &calls[0].env;
        assert_eq!(configure_env.get("PATH"), Some("C:\\Windows"));
        assert!(!configure_env.contains_key("LTLIBS"));
        assert!(!configure_env.contains_key("SQLCIPHER_STATIC"));

        assert_eq!(calls[3].env.get("LTLIBS"), Some("libcrypto.lib"));
        assert!(!calls[3].env.contains_key("RUSTFLAGS"));

        let module_env = &calls[4].env;
        assert_eq!(module_env.get("SQLCIPHER_STATIC"), Some("1"));
        assert!(module_env.contains_key("RUSTFLAGS"));
        assert!(!module_env.contains_key("LTLIBS"));
    }
}
