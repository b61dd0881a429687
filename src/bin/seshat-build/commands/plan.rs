//! `seshat-build plan` command

use anyhow::Result;

use crate::cli::PlanArgs;
use seshat_build::builder::{BuildPlan, Step};
use seshat_build::GlobalContext;

pub fn execute(args: PlanArgs, ctx: &GlobalContext) -> Result<()> {
    let platform = ctx.platform(args.platform, args.arch)?;
    let layout = ctx.layout()?;

    let plan = BuildPlan::new(&platform, &layout);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for stage in &plan.stages {
        println!("{}", stage.kind);
        for step in &stage.steps {
            match step {
                Step::CreateDir { path } => println!("    mkdir {}", path.display()),
                Step::Run(invocation) => {
                    println!("    cd {}", invocation.cwd.display());
                    for (key, value) in invocation.env.iter() {
                        println!(
                            "    {}={}",
                            key.to_string_lossy(),
                            value.to_string_lossy()
                        );
                    }
                    println!("    {}", invocation.display_command());
                }
                Step::StageArtifacts { artifacts } => {
                    for artifact in artifacts {
                        println!(
                            "    copy {} -> {}",
                            artifact.from.display(),
                            artifact.to.display()
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
