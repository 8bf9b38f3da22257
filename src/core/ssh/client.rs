use crate::config::SshTarget;
use crate::error::{Error, Result, TransferFailedDetails};
use crate::remote::{FileTransfer, RemoteShell};
use crate::remote_env::{self, EnvVars};
use crate::shell;
use crate::utils::command::{run_captured, CommandOutput};
use std::path::Path;

/// OpenSSH-backed transport: `ssh` for commands, `scp` for files.
pub struct SshClient {
    pub host: String,
    pub user: String,
    pub port: u16,
    pub identity_file: Option<String>,
}

impl SshClient {
    pub fn from_target(target: &SshTarget) -> Result<Self> {
        let identity_file = match &target.identity_file {
            Some(path) if !path.is_empty() => {
                let expanded = shellexpand::tilde(path).to_string();
                if !Path::new(&expanded).exists() {
                    return Err(Error::ssh_identity_file_not_found(expanded));
                }
                Some(expanded)
            }
            _ => None,
        };

        Ok(Self {
            host: target.host.clone(),
            user: target.user.clone(),
            port: target.port,
            identity_file,
        })
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    pub fn build_ssh_args(&self, command: &str) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(identity_file) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity_file.clone());
        }

        if self.port != 22 {
            args.push("-p".to_string());
            args.push(self.port.to_string());
        }

        // No password prompts.
        args.push("-o".to_string());
        args.push("BatchMode=yes".to_string());

        args.push(self.destination());
        args.push(command.to_string());

        args
    }

    /// scp connection options. scp uses `-P` (uppercase) for the port.
    fn build_scp_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        args.push("-O".to_string()); // Legacy SCP protocol so remote paths go through the shell
        args.push("-o".to_string());
        args.push("BatchMode=yes".to_string());

        if let Some(identity_file) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity_file.clone());
        }

        if self.port != 22 {
            args.push("-P".to_string());
            args.push(self.port.to_string());
        }

        args
    }

    pub fn upload_args(&self, local_path: &str, remote_path: &str) -> Vec<String> {
        let mut args = self.build_scp_args();
        if Path::new(local_path).is_dir() {
            args.push("-r".to_string());
        }
        args.push(local_path.to_string());
        args.push(format!(
            "{}:{}",
            self.destination(),
            shell::quote_path(remote_path)
        ));
        args
    }

    pub fn download_args(&self, remote_path: &str, local_path: &str) -> Vec<String> {
        let mut args = self.build_scp_args();
        args.push(format!(
            "{}:{}",
            self.destination(),
            shell::quote_path(remote_path)
        ));
        args.push(local_path.to_string());
        args
    }

    pub fn execute(&self, command: &str) -> Result<CommandOutput> {
        run_captured("ssh", &self.build_ssh_args(command), "ssh")
    }
}

impl RemoteShell for SshClient {
    fn run(&self, command: &str, cwd: Option<&str>, env: &EnvVars) -> Result<CommandOutput> {
        let line = remote_env::command_line(command, cwd, env)?;
        log_status!("ssh", "{}: {}", self.host, command);
        self.execute(&line)?
            .into_remote_result(&line, Some(&self.host))
    }
}

impl FileTransfer for SshClient {
    fn upload(&self, local_path: &str, remote_path: &str) -> Result<()> {
        let output = run_captured("scp", &self.upload_args(local_path, remote_path), "scp upload")?;
        if output.success {
            return Ok(());
        }

        Err(Error::transfer_upload_failed(TransferFailedDetails {
            source: local_path.to_string(),
            destination: remote_path.to_string(),
            exit_code: output.exit_code,
            stderr: output.error_text(),
        }))
    }

    // scp copies bytes unchanged, so binary and text downloads are identical.
    fn download(&self, remote_path: &str, local_path: &str, _binary: bool) -> Result<()> {
        if let Some(parent) = Path::new(local_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::internal_io(
                        e.to_string(),
                        Some(format!("create directory {}", parent.display())),
                    )
                })?;
            }
        }

        let output = run_captured(
            "scp",
            &self.download_args(remote_path, local_path),
            "scp download",
        )?;
        if output.success {
            return Ok(());
        }

        Err(Error::transfer_download_failed(TransferFailedDetails {
            source: remote_path.to_string(),
            destination: local_path.to_string(),
            exit_code: output.exit_code,
            stderr: output.error_text(),
        }))
    }
}
