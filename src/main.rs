use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, zos_build};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "ussdev")]
#[command(version = VERSION)]
#[command(about = "Build native z/OS code on z/OS UNIX System Services")]
struct Cli {
    /// Directory holding zowe-api.json and user-zowe-api.json
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build z/OS source on z/OS UNIX
    #[command(name = "zos-build", visible_alias = "zosbuild")]
    ZosBuild(zos_build::ZosBuildArgs),
    /// Inspect the loaded configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        project_dir: cli.project_dir,
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("[ussdev] {}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
