//! `seshat-build build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use seshat_build::ops::build;
use seshat_build::GlobalContext;

pub fn execute(args: BuildArgs, ctx: &GlobalContext) -> Result<()> {
    let platform = ctx.host_platform(args.arch)?;
    let layout = ctx.layout()?;

    tracing::debug!(
        "building for {} {} with dependency prefix {}",
        platform.os(),
        platform.arch(),
        layout.dep_prefix().display()
    );

    let summary = build(&platform, &layout)?;

    eprintln!(
        "    Finished {} stage(s) in {:.2}s",
        summary.stages,
        summary.duration.as_secs_f64()
    );

    Ok(())
}
