//! `seshat-build doctor` command

use anyhow::Result;

use crate::cli::DoctorArgs;
use seshat_build::ops::{doctor, format_report};
use seshat_build::GlobalContext;

pub fn execute(args: DoctorArgs, ctx: &GlobalContext, verbose: bool) -> Result<()> {
    let platform = ctx.host_platform(args.arch)?;
    let layout = ctx.layout()?;

    let report = doctor(&platform, &layout);

    // Print the formatted report
    print!("{}", format_report(&report, verbose));

    // Exit with error code if any check failed
    if !report.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
