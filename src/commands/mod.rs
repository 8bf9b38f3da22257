use std::path::PathBuf;

pub type CmdResult<T> = ussdev::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub(crate) project_dir: PathBuf,
}

pub mod config;
pub mod zos_build;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (ussdev::Result<serde_json::Value>, i32) {
    crate::tty::status("ussdev is working...");

    match command {
        crate::Commands::ZosBuild(args) => dispatch!(args, global, zos_build),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
