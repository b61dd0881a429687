//! Host platform facts and the base toolchain environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::env::Environment;
use crate::core::ParseError;

/// Default headers mirror used by node-gyp when building against Electron.
pub const DEFAULT_DIST_URL: &str = "https://electronjs.org/headers";

/// Operating system family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    /// Linux, the BSDs and anything else with a POSIX toolchain.
    #[serde(rename = "unix")]
    OtherUnix,
}

impl OsFamily {
    /// Detect the family of the compiling target.
    pub fn host() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else {
            OsFamily::OtherUnix
        }
    }

    pub fn is_windows(self) -> bool {
        self == OsFamily::Windows
    }

    /// Apple-family hosts get CommonCrypto and the Security framework.
    pub fn is_apple(self) -> bool {
        self == OsFamily::MacOs
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::MacOs => "macos",
            OsFamily::OtherUnix => "unix",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win32" => Ok(OsFamily::Windows),
            "macos" | "darwin" | "mac" => Ok(OsFamily::MacOs),
            "unix" | "linux" | "freebsd" | "openbsd" | "netbsd" => Ok(OsFamily::OtherUnix),
            _ => Err(ParseError::new("platform", s, "windows, macos, linux")),
        }
    }
}

/// CPU architecture, named the way node and node-gyp name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Ia32,
    X64,
    Arm64,
}

impl Arch {
    /// Detect the architecture of the compiling target.
    ///
    /// `None` when node has no prebuilt headers for it here.
    pub fn host() -> Option<Self> {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    /// Map a `std::env::consts::ARCH` name to the node name.
    pub fn from_rust_arch(arch: &str) -> Option<Self> {
        match arch {
            "x86" => Some(Arch::Ia32),
            "x86_64" => Some(Arch::X64),
            "aarch64" => Some(Arch::Arm64),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Ia32 => "ia32",
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ia32" | "x86" | "i686" => Ok(Arch::Ia32),
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            _ => Err(ParseError::new("arch", s, "x64, ia32, arm64")),
        }
    }
}

/// The JavaScript runtime the native module is built against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeTarget {
    /// Runtime name (`electron` or `node`)
    pub name: String,

    /// Runtime version the module's headers are fetched for
    pub version: Option<String>,

    /// Where node-gyp downloads runtime headers from
    pub dist_url: String,
}

impl Default for RuntimeTarget {
    fn default() -> Self {
        RuntimeTarget {
            name: "electron".to_string(),
            version: None,
            dist_url: DEFAULT_DIST_URL.to_string(),
        }
    }
}

/// Read-only facts about the host a pipeline runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformEnvironment {
    os: OsFamily,
    arch: Arch,
    runtime: RuntimeTarget,
    gyp_dev_dir: Option<PathBuf>,
}

impl PlatformEnvironment {
    /// Describe an arbitrary platform.
    pub fn new(os: OsFamily, arch: Arch, runtime: RuntimeTarget) -> Self {
        PlatformEnvironment {
            os,
            arch,
            runtime,
            gyp_dev_dir: None,
        }
    }

    /// Describe the current host, building for `arch`.
    pub fn host(runtime: RuntimeTarget, arch: Arch) -> Self {
        let gyp_dev_dir =
            directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".electron-gyp"));

        PlatformEnvironment {
            os: OsFamily::host(),
            arch,
            runtime,
            gyp_dev_dir,
        }
    }

    /// Describe the same host as if it ran `os`.
    pub fn with_os(mut self, os: OsFamily) -> Self {
        self.os = os;
        self
    }

    /// Set the node-gyp header cache directory.
    pub fn with_gyp_dev_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.gyp_dev_dir = Some(dir.into());
        self
    }

    pub fn os(&self) -> OsFamily {
        self.os
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn runtime(&self) -> &RuntimeTarget {
        &self.runtime
    }

    pub fn is_windows(&self) -> bool {
        self.os.is_windows()
    }

    pub fn is_apple(&self) -> bool {
        self.os.is_apple()
    }

    /// File name of a node_modules/.bin shim on this platform.
    pub fn bin_shim_name(&self, tool: &str) -> String {
        if self.is_windows() {
            format!("{}.cmd", tool)
        } else {
            tool.to_string()
        }
    }

    /// Variables node-gyp reads to select the runtime headers and target.
    pub fn base_env(&self) -> Environment {
        let mut env = Environment::new();

        if let Some(ref version) = self.runtime.version {
            env.set("npm_config_target", version);
        }
        env.set("npm_config_arch", self.arch.as_str());
        env.set("npm_config_target_arch", self.arch.as_str());
        env.set("npm_config_disturl", &self.runtime.dist_url);
        env.set("npm_config_runtime", &self.runtime.name);
        env.set("npm_config_build_from_source", "true");
        if let Some(ref dev_dir) = self.gyp_dev_dir {
            env.set("npm_config_devdir", dev_dir.display().to_string());
        }

        env
    }
}
