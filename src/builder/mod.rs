//! Stage pipeline.
//!
//! This module describes the build stages for each platform and drives them
//! through external tools, one at a time.

pub mod environment;
pub mod error;
pub mod executor;
pub mod plan;
pub mod runner;
pub mod stager;
pub mod stages;

pub use environment::EnvironmentComposer;
pub use error::BuildError;
pub use executor::{BuildExecutor, PipelineState};
pub use plan::{BuildPlan, BuildStage, PipelineVariant, Stage, StageKind, StagedArtifact, Step};
pub use runner::{ProcessRunner, StageOutcome, StageRunner};
pub use stager::{stage_artifacts, StagingError};
