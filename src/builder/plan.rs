//! Build plan generation.
//!
//! A [`BuildPlan`] is the ordered list of stages for one host. The order is
//! chosen once, from the platform alone, when the plan is created. Stages are
//! pure descriptions; building a plan has no side effects.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::stages;
use crate::core::{Environment, ModuleLayout, PlatformEnvironment};
use crate::util::process::display_command;

/// Identifies a stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StageKind {
    #[serde(rename = "build-openssl")]
    OpenSsl,
    #[serde(rename = "build-sqlcipher-windows")]
    SqlCipherWindows,
    #[serde(rename = "build-sqlcipher-unix")]
    SqlCipherUnix,
    #[serde(rename = "build-module")]
    Module,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::OpenSsl => "build-openssl",
            StageKind::SqlCipherWindows => "build-sqlcipher-windows",
            StageKind::SqlCipherUnix => "build-sqlcipher-unix",
            StageKind::Module => "build-module",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStage {
    /// Executable name (resolved via PATH) or path
    pub program: PathBuf,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Variables layered over the inherited environment for this invocation only
    pub env: Environment,
}

impl BuildStage {
    /// Create an invocation of `program` in `cwd`.
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        BuildStage {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Environment::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add a stage override.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.set(key.into(), value.into());
        self
    }

    /// Render the command line for logs.
    pub fn display_command(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

/// A file copied from a tool's native output name to the name later stages expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedArtifact {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl StagedArtifact {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        StagedArtifact {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A step inside a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Create a directory (and its parents) before a tool runs in it
    CreateDir { path: PathBuf },
    /// Run an external tool
    Run(BuildStage),
    /// Copy outputs into the dependency prefix
    StageArtifacts { artifacts: Vec<StagedArtifact> },
}

/// A named, tightly coupled sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub kind: StageKind,
    pub steps: Vec<Step>,
}

impl Stage {
    /// Create an empty stage.
    pub fn new(kind: StageKind) -> Self {
        Stage {
            kind,
            steps: Vec::new(),
        }
    }

    /// Create `path` before the following steps run.
    pub fn create_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.steps.push(Step::CreateDir { path: path.into() });
        self
    }

    /// Append a tool invocation.
    pub fn run(mut self, invocation: BuildStage) -> Self {
        self.steps.push(Step::Run(invocation));
        self
    }

    /// Append an artifact staging step.
    pub fn stage_artifacts(mut self, artifacts: Vec<StagedArtifact>) -> Self {
        self.steps.push(Step::StageArtifacts { artifacts });
        self
    }

    /// Tool invocations in this stage, in order.
    pub fn invocations(&self) -> impl Iterator<Item = &BuildStage> {
        self.steps.iter().filter_map(|step| match step {
            Step::Run(invocation) => Some(invocation),
            _ => None,
        })
    }
}

/// The closed set of stage sequences, one per platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineVariant {
    /// OpenSSL, then SQLCipher with nmake, then the module
    Windows,
    /// SQLCipher with autoconf, then the module
    Unix,
}

impl PipelineVariant {
    /// Select the variant for a platform.
    pub fn for_platform(platform: &PlatformEnvironment) -> Self {
        if platform.is_windows() {
            PipelineVariant::Windows
        } else {
            PipelineVariant::Unix
        }
    }

    /// Stage order for this variant.
    pub fn stage_kinds(self) -> &'static [StageKind] {
        match self {
            PipelineVariant::Windows => &[
                StageKind::OpenSsl,
                StageKind::SqlCipherWindows,
                StageKind::Module,
            ],
            PipelineVariant::Unix => &[StageKind::SqlCipherUnix, StageKind::Module],
        }
    }
}

/// A complete, ordered build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Which stage sequence was selected
    pub variant: PipelineVariant,

    /// Stages in execution order
    pub stages: Vec<Stage>,
}

impl BuildPlan {
    /// Compute the plan for a platform and layout.
    pub fn new(platform: &PlatformEnvironment, layout: &ModuleLayout) -> Self {
        let variant = PipelineVariant::for_platform(platform);

        let stages = variant
            .stage_kinds()
            .iter()
            .map(|&kind| stages::define(kind, platform, layout))
            .collect();

        BuildPlan { variant, stages }
    }

    /// Stage kinds in execution order.
    pub fn kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind).collect()
    }

    /// Look up a stage by kind.
    pub fn stage(&self, kind: StageKind) -> Option<&Stage> {
        self.stages.iter().find(|s| s.kind == kind)
    }

    /// Every program the plan launches, in first-use order, without duplicates.
    pub fn programs(&self) -> Vec<&Path> {
        let mut programs: Vec<&Path> = Vec::new();
        for invocation in self.stages.iter().flat_map(|s| s.invocations()) {
            if !programs.contains(&invocation.program.as_path()) {
                programs.push(&invocation.program);
            }
        }
        programs
    }
}
