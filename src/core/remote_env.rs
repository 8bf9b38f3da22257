//! Default z/OS UNIX environment for remote commands.
//!
//! USS shells need file tagging and automatic conversion enabled for
//! ASCII sources uploaded from a workstation to build cleanly.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::shell;

/// Environment overrides passed alongside a remote command.
pub type EnvVars = BTreeMap<String, String>;

pub const DEFAULT_ENV: &[(&str, &str)] = &[
    ("_BPXK_AUTOCVT", "ON"),
    ("_CEE_RUNOPTS", "FILETAG(AUTOCVT,AUTOTAG) POSIX(ON)"),
    ("_TAG_REDIR_ERR", "txt"),
    ("_TAG_REDIR_IN", "txt"),
    ("_TAG_REDIR_OUT", "txt"),
];

/// Merge overrides onto the default environment. Overrides win.
pub fn merged(overrides: &EnvVars) -> EnvVars {
    let mut env: EnvVars = DEFAULT_ENV
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    for (name, value) in overrides {
        env.insert(name.clone(), value.clone());
    }

    env
}

/// Build the shell line executed on z/OS for `command`.
///
/// `export <defaults+overrides> && [cd '<cwd>' &&] <command>`
pub fn command_line(command: &str, cwd: Option<&str>, overrides: &EnvVars) -> Result<String> {
    let env = merged(overrides);
    let exports = shell::export_vars(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

    let body = match cwd {
        Some(dir) => shell::cd_and(dir, command)?,
        None => command.trim().to_string(),
    };

    Ok(match exports {
        Some(exports) => format!("{} && {}", exports, body),
        None => body,
    })
}
