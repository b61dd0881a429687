//! OpenSSL, built for Windows only.

use crate::builder::plan::{BuildStage, Stage, StageKind};
use crate::builder::stages::make_tool;
use crate::core::{Arch, ModuleLayout, PlatformEnvironment};

/// Subsystems switched off at configure time.
///
/// SQLCipher needs a small slice of libcrypto and links it statically.
pub const OPENSSL_DISABLED_FEATURES: &[&str] = &[
    "no-afalgeng",
    "no-capieng",
    "no-cms",
    "no-ct",
    "no-deprecated",
    "no-dgram",
    "no-dso",
    "no-ec",
    "no-ec2m",
    "no-gost",
    "no-nextprotoneg",
    "no-ocsp",
    "no-sock",
    "no-srp",
    "no-srtp",
    "no-tests",
    "no-ssl",
    "no-tls",
    "no-dtls",
    "no-shared",
    "no-aria",
    "no-camellia",
    "no-cast",
    "no-chacha",
    "no-cmac",
    "no-des",
    "no-dh",
    "no-dsa",
    "no-ecdh",
    "no-ecdsa",
    "no-idea",
    "no-md4",
    "no-mdc2",
    "no-ocb",
    "no-poly1305",
    "no-rc2",
    "no-rc4",
    "no-rmd160",
    "no-scrypt",
    "no-seed",
    "no-siphash",
    "no-sm2",
    "no-sm3",
    "no-sm4",
    "no-whirlpool",
];

/// OpenSSL `Configure` target name for an MSVC build.
pub fn openssl_target(arch: Arch) -> &'static str {
    match arch {
        Arch::X64 => "VC-WIN64A",
        Arch::Arm64 => "VC-WIN64-ARM",
        Arch::Ia32 => "VC-WIN32",
    }
}

/// Configure, build and install libcrypto into the dependency prefix.
pub fn build_openssl(platform: &PlatformEnvironment, layout: &ModuleLayout) -> Stage {
    let src = layout.openssl_src();
    let make = make_tool(platform);

    let configure = BuildStage::new("perl", &src)
        .arg("Configure")
        .arg(format!("--prefix={}", layout.dep_prefix().display()))
        .args(OPENSSL_DISABLED_FEATURES.iter().copied())
        .arg(openssl_target(platform.arch()));

    Stage::new(StageKind::OpenSsl)
        .run(configure)
        .run(BuildStage::new(make, &src).arg("build_libs"))
        .run(BuildStage::new(make, &src).arg("install_dev"))
}
