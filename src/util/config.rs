//! Configuration file support.
//!
//! Two configuration file locations are merged:
//! - Global: `~/.seshat-build/config.toml` - User-wide defaults
//! - Project: `seshat-build.toml` in the project root - Project overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Arch, ModuleLayout, RuntimeTarget};

/// Project configuration file name.
pub const PROJECT_CONFIG_NAME: &str = "seshat-build.toml";

/// Default root for vendored dependency sources, relative to the project.
pub const DEFAULT_WORK_DIR: &str = ".hak/matrix-seshat";

/// Configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runtime the module is built against
    pub runtime: RuntimeConfig,

    /// Filesystem layout
    pub layout: LayoutConfig,

    /// Target overrides
    pub target: TargetConfig,
}

/// Runtime settings, fed to node-gyp through the base environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime name (default: electron)
    pub name: Option<String>,

    /// Runtime version to fetch headers for
    pub version: Option<String>,

    /// Header download mirror
    pub dist_url: Option<String>,
}

/// Layout settings. Relative paths resolve against the project root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Root holding vendored sources (default: .hak/matrix-seshat)
    pub work_dir: Option<PathBuf>,

    /// Dependency install prefix (default: <work_dir>/opt)
    pub dep_prefix: Option<PathBuf>,

    /// Module build directory (default: <work_dir>/build)
    pub module_dir: Option<PathBuf>,

    /// Build tool executables (default: <module_dir>/node_modules/.bin)
    pub bin_dir: Option<PathBuf>,
}

/// Target settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Target architecture (x64, ia32, arm64)
    pub arch: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Runtime settings
        if other.runtime.name.is_some() {
            self.runtime.name = other.runtime.name;
        }
        if other.runtime.version.is_some() {
            self.runtime.version = other.runtime.version;
        }
        if other.runtime.dist_url.is_some() {
            self.runtime.dist_url = other.runtime.dist_url;
        }

        // Layout settings
        if other.layout.work_dir.is_some() {
            self.layout.work_dir = other.layout.work_dir;
        }
        if other.layout.dep_prefix.is_some() {
            self.layout.dep_prefix = other.layout.dep_prefix;
        }
        if other.layout.module_dir.is_some() {
            self.layout.module_dir = other.layout.module_dir;
        }
        if other.layout.bin_dir.is_some() {
            self.layout.bin_dir = other.layout.bin_dir;
        }

        // Target settings
        if other.target.arch.is_some() {
            self.target.arch = other.target.arch;
        }
    }

    /// The runtime target, with defaults filled in.
    pub fn runtime_target(&self) -> RuntimeTarget {
        let defaults = RuntimeTarget::default();
        RuntimeTarget {
            name: self.runtime.name.clone().unwrap_or(defaults.name),
            version: self.runtime.version.clone(),
            dist_url: self.runtime.dist_url.clone().unwrap_or(defaults.dist_url),
        }
    }

    /// Parse the configured architecture, if any.
    pub fn arch(&self) -> Result<Option<Arch>> {
        self.target
            .arch
            .as_deref()
            .map(|s| s.parse::<Arch>())
            .transpose()
            .context("invalid `target.arch` in config")
    }

    /// Resolve the layout against the project root.
    pub fn module_layout(&self, root: &Path) -> Result<ModuleLayout> {
        let resolve = |p: &Path| root.join(p);

        let work_dir = resolve(
            self.layout
                .work_dir
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_WORK_DIR)),
        );
        let dep_prefix = self
            .layout
            .dep_prefix
            .as_deref()
            .map(resolve)
            .unwrap_or_else(|| work_dir.join("opt"));
        let module_dir = self
            .layout
            .module_dir
            .as_deref()
            .map(resolve)
            .unwrap_or_else(|| work_dir.join("build"));
        let bin_dir = self
            .layout
            .bin_dir
            .as_deref()
            .map(resolve)
            .unwrap_or_else(|| module_dir.join("node_modules").join(".bin"));

        ModuleLayout::new(work_dir, dep_prefix, module_dir, bin_dir)
            .context("invalid module layout")
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (seshat-build.toml)
/// 2. Global config (~/.seshat-build/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = load_global_config(global_path);

    // Project config overrides global
    config.merge(Config::load_or_default(project_path));

    config
}

/// Like [`load_config`], for a project config named on the command line.
///
/// The file must exist and parse.
pub fn load_config_required(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    if !project_path.is_file() {
        bail!("config file not found: {}", project_path.display());
    }

    let mut config = load_global_config(global_path);
    config.merge(Config::load(project_path)?);

    Ok(config)
}

fn load_global_config(global_path: Option<&Path>) -> Config {
    global_path
        .map(Config::load_or_default)
        .unwrap_or_default()
}

/// Get the global config directory (~/.seshat-build).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".seshat-build"))
}

/// Get the global config path (~/.seshat-build/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}
