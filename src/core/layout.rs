//! Filesystem layout of a native module build.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Directory name of the vendored OpenSSL tree.
pub const OPENSSL_SRC_DIR: &str = "openssl-1.1.1d";

/// Directory name of the vendored SQLCipher tree.
pub const SQLCIPHER_SRC_DIR: &str = "sqlcipher-4.3.0";

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout path `{field}` must be absolute, got `{}`", path.display())]
    NotAbsolute { field: &'static str, path: PathBuf },
}

/// Where sources live, where dependencies install, and where the module builds.
///
/// All paths are absolute. A layout is fixed for the duration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleLayout {
    /// Root holding the vendored dependency source trees
    work_dir: PathBuf,

    /// Install prefix for built dependencies (`lib/` and `include/` below it)
    dep_prefix: PathBuf,

    /// Directory the native module is built in
    module_dir: PathBuf,

    /// Directory holding locally installed build tool executables
    bin_dir: PathBuf,
}

impl ModuleLayout {
    /// Create a layout, rejecting relative paths.
    pub fn new(
        work_dir: impl Into<PathBuf>,
        dep_prefix: impl Into<PathBuf>,
        module_dir: impl Into<PathBuf>,
        bin_dir: impl Into<PathBuf>,
    ) -> Result<Self, LayoutError> {
        Ok(ModuleLayout {
            work_dir: absolute("work_dir", work_dir.into())?,
            dep_prefix: absolute("dep_prefix", dep_prefix.into())?,
            module_dir: absolute("module_dir", module_dir.into())?,
            bin_dir: absolute("bin_dir", bin_dir.into())?,
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn dep_prefix(&self) -> &Path {
        &self.dep_prefix
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// `<dep_prefix>/lib`
    pub fn dep_lib_dir(&self) -> PathBuf {
        self.dep_prefix.join("lib")
    }

    /// `<dep_prefix>/include`
    pub fn dep_include_dir(&self) -> PathBuf {
        self.dep_prefix.join("include")
    }

    pub fn openssl_src(&self) -> PathBuf {
        self.work_dir.join(OPENSSL_SRC_DIR)
    }

    pub fn sqlcipher_src(&self) -> PathBuf {
        self.work_dir.join(SQLCIPHER_SRC_DIR)
    }
}

fn absolute(field: &'static str, path: PathBuf) -> Result<PathBuf, LayoutError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Err(LayoutError::NotAbsolute { field, path })
    }
}
