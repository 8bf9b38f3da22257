use clap::{Args, Subcommand};
use serde::Serialize;
use ussdev::config::{self, ProjectConfig, UserConfig};
use ussdev::zos_build::remote_dir;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show both configuration files and the resolved z/OS directory
    Show,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigShowOutput {
    pub command: String,
    pub project_dir: String,
    pub user_config_path: String,
    pub project_config_path: String,
    pub zos_dir: String,
    pub user: UserConfig,
    pub project: ProjectConfig,
}

pub fn run(args: ConfigArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ConfigShowOutput> {
    match args.command {
        ConfigCommand::Show => show(global),
    }
}

fn show(global: &crate::commands::GlobalArgs) -> CmdResult<ConfigShowOutput> {
    let loaded = config::load(&global.project_dir)?;

    Ok((
        ConfigShowOutput {
            command: "config.show".to_string(),
            project_dir: loaded.project_dir.to_string_lossy().to_string(),
            user_config_path: loaded.user_path.to_string_lossy().to_string(),
            project_config_path: loaded.project_path.to_string_lossy().to_string(),
            zos_dir: remote_dir(&loaded.user, &loaded.project),
            user: loaded.user,
            project: loaded.project,
        },
        0,
    ))
}
