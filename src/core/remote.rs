//! Collaborator contracts for reaching z/OS, and the transport that backs them.

use crate::config::{Transport, UserConfig};
use crate::error::{Error, Result};
use crate::remote_env::EnvVars;
use crate::ssh::SshClient;
use crate::utils::command::CommandOutput;
use crate::zowe::ZoweCli;

/// Runs shell commands on z/OS UNIX.
///
/// Implementations apply the default USS environment, then `env`, then change
/// into `cwd` when given. A non-zero exit or a connection failure is an error.
pub trait RemoteShell {
    fn run(&self, command: &str, cwd: Option<&str>, env: &EnvVars) -> Result<CommandOutput>;
}

/// Moves files between the workstation and z/OS UNIX.
pub trait FileTransfer {
    fn upload(&self, local_path: &str, remote_path: &str) -> Result<()>;
    fn download(&self, remote_path: &str, local_path: &str, binary: bool) -> Result<()>;
}

/// Transport selected by `UserConfig::transport`.
pub enum Remote {
    Zowe(ZoweCli),
    Ssh(SshClient),
}

impl Remote {
    pub fn from_user_config(user: &UserConfig) -> Result<Self> {
        match user.transport {
            Transport::Zowe => Ok(Remote::Zowe(ZoweCli::new())),
            Transport::Ssh => {
                let target = user.ssh.as_ref().ok_or_else(|| {
                    Error::config_missing_key("ssh", None)
                        .with_hint("Add an \"ssh\" block to user-zowe-api.json")
                })?;
                Ok(Remote::Ssh(SshClient::from_target(target)?))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Remote::Zowe(_) => "zowe",
            Remote::Ssh(_) => "ssh",
        }
    }
}

impl RemoteShell for Remote {
    fn run(&self, command: &str, cwd: Option<&str>, env: &EnvVars) -> Result<CommandOutput> {
        match self {
            Remote::Zowe(zowe) => zowe.run(command, cwd, env),
            Remote::Ssh(ssh) => ssh.run(command, cwd, env),
        }
    }
}

impl FileTransfer for Remote {
    fn upload(&self, local_path: &str, remote_path: &str) -> Result<()> {
        match self {
            Remote::Zowe(zowe) => zowe.upload(local_path, remote_path),
            Remote::Ssh(ssh) => ssh.upload(local_path, remote_path),
        }
    }

    fn download(&self, remote_path: &str, local_path: &str, binary: bool) -> Result<()> {
        match self {
            Remote::Zowe(zowe) => zowe.download(remote_path, local_path, binary),
            Remote::Ssh(ssh) => ssh.download(remote_path, local_path, binary),
        }
    }
}
