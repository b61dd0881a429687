//! Preflight checks for a pipeline.
//!
//! The `doctor` command verifies, without running any stage, that:
//!
//! - every tool the selected pipeline launches can be found
//! - the vendored source trees are in place
//! - the module build directory exists

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::{BuildPlan, PipelineVariant};
use crate::core::{ModuleLayout, PlatformEnvironment};
use crate::util::process::find_executable;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool or directory (if applicable)
    pub path: Option<PathBuf>,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
        }
    }

    /// Set the path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Summary of all preflight checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Environment information
    pub environment: BTreeMap<String, String>,
}

impl DoctorReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        DoctorReport::default()
    }

    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }
}

/// Check that the pipeline for `platform` could start.
pub fn doctor(platform: &PlatformEnvironment, layout: &ModuleLayout) -> DoctorReport {
    let plan = BuildPlan::new(platform, layout);
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("platform".to_string(), platform.os().to_string());
    report
        .environment
        .insert("arch".to_string(), platform.arch().to_string());
    report
        .environment
        .insert("runtime".to_string(), platform.runtime().name.clone());

    for program in plan.programs() {
        report.add(check_tool(program));
    }

    for (name, dir) in required_dirs(plan.variant, layout) {
        report.add(check_dir(name, &dir));
    }

    report
}

/// Directories that must exist before the first stage runs.
fn required_dirs(variant: PipelineVariant, layout: &ModuleLayout) -> Vec<(&'static str, PathBuf)> {
    let mut dirs = Vec::new();
    if variant == PipelineVariant::Windows {
        dirs.push(("OpenSSL sources", layout.openssl_src()));
    }
    dirs.push(("SQLCipher sources", layout.sqlcipher_src()));
    dirs.push(("Module build directory", layout.module_dir().to_path_buf()));
    dirs
}

fn check_tool(program: &Path) -> CheckResult {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    match find_executable(program) {
        Some(path) => CheckResult::pass(&name, format!("Found {}", name)).with_path(path),
        None => CheckResult::fail(&name, format!("`{}` not found", program.display()))
            .with_path(program.to_path_buf()),
    }
}

fn check_dir(name: &str, dir: &Path) -> CheckResult {
    if dir.is_dir() {
        CheckResult::pass(name, "present").with_path(dir.to_path_buf())
    } else {
        CheckResult::fail(name, "missing").with_path(dir.to_path_buf())
    }
}

/// Format a doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str("Seshat Build Doctor\n");
    output.push_str("===================\n\n");

    if verbose {
        output.push_str("Environment:\n");
        for (key, value) in &report.environment {
            output.push_str(&format!("  {}: {}\n", key, value));
        }
        output.push('\n');
    }

    output.push_str("Checks:\n");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        output.push_str(&format!("  {} {}\n", status, check.name));

        if verbose || !check.passed {
            output.push_str(&format!("      {}\n", check.message));
            if let Some(path) = &check.path {
                output.push_str(&format!("      Path: {}\n", path.display()));
            }
        }
    }

    output.push_str(&format!(
        "\nSummary: {} passed, {} failed\n",
        report.passed_count(),
        report.failed_count()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::core::{Arch, OsFamily};
    use crate::test_support::{test_layout, test_platform};

    #[test]
    fn test_doctor_reports_missing_sources() {
        let (_tmp, layout) = test_layout();
        let report = doctor(&test_platform(OsFamily::OtherUnix, Arch::X64), &layout);

        let sources = report
            .checks
            .iter()
            .find(|c| c.name == "SQLCipher sources")
            .unwrap();
        assert!(!sources.passed);
        assert!(!report.all_passed());
        assert!(!report.checks.iter().any(|c| c.name == "OpenSSL sources"));
    }

    #[test]
    fn test_doctor_checks_windows_tools() {
        let (_tmp, layout) = test_layout();
        let report = doctor(&test_platform(OsFamily::Windows, Arch::X64), &layout);

        let names: Vec<_> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "perl",
                "nmake",
                "neon.cmd",
                "OpenSSL sources",
                "SQLCipher sources",
                "Module build directory"
            ]
        );
        assert_eq!(report.environment["platform"], "windows");
    }

    #[cfg(unix)]
    #[test]
    fn test_doctor_finds_configure_script() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, layout) = test_layout();
        fs::create_dir_all(layout.sqlcipher_src()).unwrap();
        let configure = layout.sqlcipher_src().join("configure");
        fs::write(&configure, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&configure, fs::Permissions::from_mode(0o755)).unwrap();

        let report = doctor(&test_platform(OsFamily::OtherUnix, Arch::X64), &layout);

        let check = report.checks.iter().find(|c| c.name == "configure").unwrap();
        assert!(check.passed);
        assert!(report
            .checks
            .iter()
            .find(|c| c.name == "SQLCipher sources")
            .unwrap()
            .passed);
    }

    #[test]
    fn test_format_report() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("make", "Found make"));
        report.add(CheckResult::fail("neon", "`neon` not found"));

        let output = format_report(&report, false);
        assert!(output.contains("[OK] make"));
        assert!(output.contains("[!!] neon"));
        assert!(output.contains("`neon` not found"));
        assert!(output.contains("Summary: 1 passed, 1 failed"));
    }
}
