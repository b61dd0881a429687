//! The `build` operation: compile the native dependencies, then the module.

use std::time::{Duration, Instant};

use crate::builder::{
    BuildError, BuildExecutor, BuildPlan, EnvironmentComposer, ProcessRunner, StageRunner,
};
use crate::core::{ModuleLayout, PlatformEnvironment};

/// Summary of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// Number of stages run
    pub stages: usize,
    /// Wall-clock time for the whole pipeline
    pub duration: Duration,
}

/// Build everything for `platform` using real subprocesses.
///
/// Subprocess output goes straight to this process's terminal. Returns the
/// first failure unchanged; no later stage runs after it.
pub fn build(
    platform: &PlatformEnvironment,
    layout: &ModuleLayout,
) -> Result<BuildSummary, BuildError> {
    let plan = BuildPlan::new(platform, layout);
    build_with(&plan, ProcessRunner::new(), EnvironmentComposer::for_host(platform))
}

/// Run an already computed plan through `runner`.
pub fn build_with<R: StageRunner>(
    plan: &BuildPlan,
    runner: R,
    composer: EnvironmentComposer,
) -> Result<BuildSummary, BuildError> {
    let start = Instant::now();

    BuildExecutor::new(runner, composer).execute(plan)?;

    Ok(BuildSummary {
        stages: plan.stages.len(),
        duration: start.elapsed(),
    })
}
