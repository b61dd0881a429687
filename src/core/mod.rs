//! Core value types for a seshat build.
//!
//! - Host platform facts ([`PlatformEnvironment`])
//! - Filesystem layout of the build ([`ModuleLayout`])
//! - Environment variable mappings ([`Environment`])

pub mod env;
pub mod layout;
pub mod platform;

use thiserror::Error;

pub use env::Environment;
pub use layout::{LayoutError, ModuleLayout};
pub use platform::{Arch, OsFamily, PlatformEnvironment, RuntimeTarget};

/// A platform or architecture name that could not be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} '{value}'; expected one of: {expected}")]
pub struct ParseError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        ParseError {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
