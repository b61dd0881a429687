//! Platform and layout fixtures.

use std::path::Path;

use tempfile::TempDir;

use crate::core::{Arch, ModuleLayout, OsFamily, PlatformEnvironment, RuntimeTarget};

/// A simulated host building against a pinned Electron version.
pub fn test_platform(os: OsFamily, arch: Arch) -> PlatformEnvironment {
    let runtime = RuntimeTarget {
        version: Some("9.0.5".to_string()),
        ..RuntimeTarget::default()
    };
    PlatformEnvironment::new(os, arch, runtime)
}

/// A layout rooted in a fresh temporary directory.
///
/// The `TempDir` must be kept alive for as long as the layout is used.
pub fn test_layout() -> (TempDir, ModuleLayout) {
    let tmp = TempDir::new().unwrap();
    let layout = layout_in(tmp.path());
    (tmp, layout)
}

/// The conventional `.hak` layout under `root`.
pub fn layout_in(root: &Path) -> ModuleLayout {
    let work = root.join(".hak").join("matrix-seshat");
    ModuleLayout::new(
        &work,
        work.join("opt"),
        work.join("build"),
        work.join("build").join("node_modules").join(".bin"),
    )
    .unwrap()
}
