//! The native module itself, always built last.

use crate::builder::plan::{BuildStage, Stage, StageKind};
use crate::core::{ModuleLayout, PlatformEnvironment};

/// Rust flags forcing a static CRT and pulling in the libcrypto built earlier.
pub const WINDOWS_RUSTFLAGS: &str = "-Ctarget-feature=+crt-static -Clink-args=libcrypto.lib";

/// Run `neon build --release` against the statically built SQLCipher.
pub fn build_module(platform: &PlatformEnvironment, layout: &ModuleLayout) -> Stage {
    let neon = layout.bin_dir().join(platform.bin_shim_name("neon"));

    let mut invocation = BuildStage::new(neon, layout.module_dir())
        .args(["build", "--release"])
        .env("SQLCIPHER_STATIC", "1")
        .env("SQLCIPHER_LIB_DIR", layout.dep_lib_dir().display().to_string())
        .env(
            "SQLCIPHER_INCLUDE_DIR",
            layout.dep_include_dir().display().to_string(),
        );

    if platform.is_windows() {
        invocation = invocation.env("RUSTFLAGS", WINDOWS_RUSTFLAGS);
    }

    Stage::new(StageKind::Module).run(invocation)
}
