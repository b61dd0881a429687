//! SQLCipher, built with nmake on Windows and autoconf elsewhere.

use std::path::Path;

use crate::builder::plan::{BuildStage, Stage, StageKind, StagedArtifact};
use crate::builder::stages::{make_tool, SQLITE_CODEC_DEFINE};
use crate::core::{ModuleLayout, PlatformEnvironment};

/// Static library name the module build links against on Windows.
pub const WINDOWS_LIB_NAME: &str = "sqlcipher.lib";

/// Header name the module build includes on Windows.
pub const WINDOWS_HEADER_NAME: &str = "sqlcipher.h";

/// Build `libsqlite3.lib` against the prefix's libcrypto, then stage it and
/// its header into the prefix under the names the module build expects.
pub fn build_sqlcipher_windows(platform: &PlatformEnvironment, layout: &ModuleLayout) -> Stage {
    let build_dir = layout.sqlcipher_src().join("bld");
    let makefile = Path::new("..").join("Makefile.msc");

    let nmake = BuildStage::new(make_tool(platform), &build_dir)
        .arg("/f")
        .arg(makefile.display().to_string())
        .arg("libsqlite3.lib")
        .arg("TOP=..")
        .env(
            "CCOPTS",
            format!(
                "{} -I{}",
                SQLITE_CODEC_DEFINE,
                layout.dep_include_dir().display()
            ),
        )
        .env(
            "LTLIBPATHS",
            format!("/LIBPATH:{}", layout.dep_lib_dir().display()),
        )
        .env("LTLIBS", "libcrypto.lib");

    let artifacts = vec![
        StagedArtifact::new(
            build_dir.join("libsqlite3.lib"),
            layout.dep_lib_dir().join(WINDOWS_LIB_NAME),
        ),
        StagedArtifact::new(
            build_dir.join("sqlite3.h"),
            layout.dep_include_dir().join(WINDOWS_HEADER_NAME),
        ),
    ];

    Stage::new(StageKind::SqlCipherWindows)
        .create_dir(&build_dir)
        .run(nmake)
        .stage_artifacts(artifacts)
}

/// Configure a static, codec-enabled SQLCipher and install it into the prefix.
///
/// Apple hosts use CommonCrypto instead of OpenSSL, which needs the Security
/// and Foundation frameworks at link time.
pub fn build_sqlcipher_unix(platform: &PlatformEnvironment, layout: &ModuleLayout) -> Stage {
    let src = layout.sqlcipher_src();
    let make = make_tool(platform);

    let mut configure = BuildStage::new(src.join("configure"), &src)
        .arg(format!("--prefix={}", layout.dep_prefix().display()))
        .arg("--enable-tempstore=yes")
        .arg("--enable-shared=no");

    if platform.is_apple() {
        configure = configure.arg("--with-crypto-lib=commoncrypto");
    }
    configure = configure.arg(format!("CFLAGS={}", SQLITE_CODEC_DEFINE));
    if platform.is_apple() {
        configure = configure.arg("LDFLAGS=-framework Security -framework Foundation");
    }

    Stage::new(StageKind::SqlCipherUnix)
        .run(configure)
        .run(BuildStage::new(make, &src))
        .run(BuildStage::new(make, &src).arg("install"))
}
