//! Pipeline error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::builder::plan::StageKind;

/// The first failure of a pipeline run.
///
/// Every variant aborts the pipeline; no later stage is attempted.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The tool could not be found or started.
    #[error("{stage}: failed to launch `{}`", program.display())]
    Launch {
        stage: StageKind,
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tool ran and reported failure.
    #[error("{stage}: `{}` exited with code {code}", program.display())]
    NonZeroExit {
        stage: StageKind,
        program: PathBuf,
        code: i32,
    },

    /// The tool ended without an exit code (killed by a signal).
    #[error("{stage}: `{}` was terminated by a signal", program.display())]
    Terminated { stage: StageKind, program: PathBuf },

    /// A produced file could not be copied to where later stages expect it.
    #[error("{stage}: failed to stage `{}` as `{}`", from.display(), to.display())]
    Staging {
        stage: StageKind,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A working directory could not be created.
    #[error("{stage}: failed to create directory `{}`", path.display())]
    CreateDir {
        stage: StageKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// The stage that failed.
    pub fn stage(&self) -> StageKind {
        match self {
            BuildError::Launch { stage, .. }
            | BuildError::NonZeroExit { stage, .. }
            | BuildError::Terminated { stage, .. }
            | BuildError::Staging { stage, .. }
            | BuildError::CreateDir { stage, .. } => *stage,
        }
    }

    /// The failing tool's exit code, if it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildError::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the tool could not be started at all.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, BuildError::Launch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_only_for_nonzero_exit() {
        let failed = BuildError::NonZeroExit {
            stage: StageKind::SqlCipherUnix,
            program: PathBuf::from("make"),
            code: 2,
        };
        assert_eq!(failed.exit_code(), Some(2));
        assert!(!failed.is_launch_failure());
        assert_eq!(
            failed.to_string(),
            "build-sqlcipher-unix: `make` exited with code 2"
        );

        let launch = BuildError::Launch {
            stage: StageKind::OpenSsl,
            program: PathBuf::from("perl"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(launch.exit_code(), None);
        assert!(launch.is_launch_failure());
        assert_eq!(launch.stage(), StageKind::OpenSsl);
    }
}
