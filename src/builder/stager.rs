//! Copying tool outputs to the names later stages expect.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::builder::plan::StagedArtifact;
use crate::util::fs::copy_file;

#[derive(Debug, Error)]
#[error("failed to copy `{}` to `{}`", from.display(), to.display())]
pub struct StagingError {
    pub from: PathBuf,
    pub to: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Copy every artifact to its destination.
///
/// All sources are checked before anything is copied, so a missing output
/// leaves the destination untouched. A failed copy part-way through may
/// leave earlier copies in place.
pub fn stage_artifacts(artifacts: &[StagedArtifact]) -> Result<(), StagingError> {
    if let Some(missing) = artifacts.iter().find(|a| !a.from.is_file()) {
        return Err(StagingError {
            from: missing.from.clone(),
            to: missing.to.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "source file does not exist"),
        });
    }

    for artifact in artifacts {
        tracing::debug!(
            "staging {} -> {}",
            artifact.from.display(),
            artifact.to.display()
        );
        copy_file(&artifact.from, &artifact.to).map_err(|source| StagingError {
            from: artifact.from.clone(),
            to: artifact.to.clone(),
            source,
        })?;
    }

    Ok(())
}
