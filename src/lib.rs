//! seshat-build - builds the matrix-seshat native module and its vendored
//! native dependencies.
//!
//! The pipeline compiles SQLCipher (and, on Windows, OpenSSL) into a
//! dependency prefix, then builds the module against it. Stages run one at a
//! time, strictly in order, and the first failure stops the run.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and fakes for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording stage runner and fixtures for
/// simulated platforms and layouts.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildError, BuildPlan, StageKind};
pub use core::{ModuleLayout, PlatformEnvironment};
pub use ops::build;
pub use util::context::GlobalContext;
