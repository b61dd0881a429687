//! High-level operations.
//!
//! This module contains the implementation of seshat-build commands.

pub mod doctor;
pub mod seshat_build;

pub use doctor::{doctor, format_report, CheckResult, DoctorReport};
pub use seshat_build::{build, build_with, BuildSummary};
