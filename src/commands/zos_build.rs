use clap::Args;
use ussdev::config;
use ussdev::log_status;
use ussdev::paths;
use ussdev::remote::Remote;
use ussdev::zos_build::{ZosBuild, ZosBuildReport};

use super::CmdResult;

#[derive(Args)]
pub struct ZosBuildArgs {
    /// Show what would be uploaded, built and downloaded without contacting z/OS
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ZosBuildArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ZosBuildReport> {
    let loaded = config::load(&global.project_dir)?;
    let workflow = ZosBuild::new(&loaded.user, &loaded.project)
        .with_local_root(paths::local_root(&global.project_dir));

    if args.dry_run {
        log_status!("dry-run", "Would build in {}", workflow.zos_dir());
        return Ok((workflow.plan()?, 0));
    }

    let remote = Remote::from_user_config(&loaded.user)?;
    log_status!(
        "zos-build",
        "Using {} transport for {}",
        remote.name(),
        workflow.zos_dir()
    );

    let report = workflow.run(&remote, &remote)?;
    Ok((report, 0))
}
