//! Global context for seshat-build operations.
//!
//! Provides centralized access to the project root, merged configuration,
//! and the platform and layout derived from them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::{Arch, ModuleLayout, OsFamily, PlatformEnvironment};
use crate::util::config::{
    global_config_path, load_config, load_config_required, Config, PROJECT_CONFIG_NAME,
};

/// Global context.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Absolute project root; relative layout paths resolve against it
    root: PathBuf,

    /// Project config file in use
    project_config: PathBuf,

    /// Merged configuration
    config: Config,
}

impl GlobalContext {
    /// Create a context with an explicit root and/or project config file.
    ///
    /// A relative `root` resolves against the current directory. An explicit
    /// `project_config` must exist; the default `<root>/seshat-build.toml`
    /// may be absent.
    pub fn with_root(root: Option<&Path>, project_config: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let root = match root {
            Some(root) => cwd.join(root),
            None => cwd.clone(),
        };

        let global = global_config_path();
        let (project_config, config) = match project_config {
            Some(path) => {
                let path = cwd.join(path);
                let config = load_config_required(global.as_deref(), &path)?;
                (path, config)
            }
            None => {
                let path = root.join(PROJECT_CONFIG_NAME);
                let config = load_config(global.as_deref(), &path);
                (path, config)
            }
        };

        Ok(GlobalContext {
            root,
            project_config,
            config,
        })
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> &Path {
        &self.project_config
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Describe the current host, with an optional architecture override.
    ///
    /// `arch` (from the command line) beats `target.arch` from the config.
    /// On a host without a known node architecture one of the two must be
    /// given.
    pub fn host_platform(&self, arch: Option<Arch>) -> Result<PlatformEnvironment> {
        let arch = resolve_arch(arch.or(self.config.arch()?), Arch::host())?;
        Ok(PlatformEnvironment::host(self.config.runtime_target(), arch))
    }

    /// Describe a possibly simulated platform for inspection.
    pub fn platform(&self, os: Option<OsFamily>, arch: Option<Arch>) -> Result<PlatformEnvironment> {
        let host = self.host_platform(arch)?;
        match os {
            Some(os) => Ok(host.with_os(os)),
            None => Ok(host),
        }
    }

    /// Resolve the module layout against the project root.
    pub fn layout(&self) -> Result<ModuleLayout> {
        self.config.module_layout(&self.root)
    }
}

/// Pick the requested architecture, else the detected one.
fn resolve_arch(requested: Option<Arch>, detected: Option<Arch>) -> Result<Arch> {
    match requested.or(detected) {
        Some(arch) => Ok(arch),
        None => bail!(
            "unsupported host architecture `{}`; pass --arch or set `target.arch` in {}",
            std::env::consts::ARCH,
            PROJECT_CONFIG_NAME
        ),
    }
}
