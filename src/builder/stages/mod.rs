//! Stage definitions.
//!
//! Each definition is a pure function of the platform and layout. None of
//! them touch the filesystem or the process environment.

mod module;
mod openssl;
mod sqlcipher;

pub use module::build_module;
pub use openssl::{build_openssl, openssl_target, OPENSSL_DISABLED_FEATURES};
pub use sqlcipher::{build_sqlcipher_unix, build_sqlcipher_windows};

use crate::builder::plan::{Stage, StageKind};
use crate::core::{ModuleLayout, PlatformEnvironment};

/// Compile flag enabling SQLCipher's encryption codec.
pub const SQLITE_CODEC_DEFINE: &str = "-DSQLITE_HAS_CODEC";

/// Build the stage for `kind`.
pub fn define(kind: StageKind, platform: &PlatformEnvironment, layout: &ModuleLayout) -> Stage {
    match kind {
        StageKind::OpenSsl => build_openssl(platform, layout),
        StageKind::SqlCipherWindows => build_sqlcipher_windows(platform, layout),
        StageKind::SqlCipherUnix => build_sqlcipher_unix(platform, layout),
        StageKind::Module => build_module(platform, layout),
    }
}

/// The platform make tool.
pub fn make_tool(platform: &PlatformEnvironment) -> &'static str {
    if platform.is_windows() {
        "nmake"
    } else {
        "make"
    }
}
