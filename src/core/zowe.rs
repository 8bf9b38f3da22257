//! Zowe CLI transport.
//!
//! Every call spawns `zowe` with an argument vector; nothing passes through a
//! local shell. Remote commands go through `zos-uss issue ssh` and files
//! through the z/OSMF `files` command group, using the default Zowe profiles.

use crate::error::{Error, Result, TransferFailedDetails};
use crate::remote::{FileTransfer, RemoteShell};
use crate::remote_env::{self, EnvVars};
use crate::utils::command::{run_captured, CommandOutput};
use std::path::Path;

#[cfg(windows)]
const ZOWE_PROGRAM: &str = "zowe.cmd";
#[cfg(not(windows))]
const ZOWE_PROGRAM: &str = "zowe";

pub struct ZoweCli {
    pub program: String,
}

impl ZoweCli {
    pub fn new() -> Self {
        Self {
            program: ZOWE_PROGRAM.to_string(),
        }
    }

    pub fn issue_ssh_args(line: &str) -> Vec<String> {
        vec![
            "zos-uss".to_string(),
            "issue".to_string(),
            "ssh".to_string(),
            line.to_string(),
        ]
    }

    /// Directories go through `dir-to-uss --recursive`, everything else `file-to-uss`.
    pub fn upload_args(local_path: &str, remote_path: &str, is_dir: bool) -> Vec<String> {
        let mut args = vec!["files".to_string(), "upload".to_string()];
        if is_dir {
            args.push("dir-to-uss".to_string());
        } else {
            args.push("file-to-uss".to_string());
        }
        args.push(local_path.to_string());
        args.push(remote_path.to_string());
        if is_dir {
            args.push("--recursive".to_string());
        }
        args
    }

    pub fn download_args(remote_path: &str, local_path: &str, binary: bool) -> Vec<String> {
        let mut args = vec![
            "files".to_string(),
            "download".to_string(),
            "uss-file".to_string(),
            remote_path.to_string(),
            "-f".to_string(),
            local_path.to_string(),
        ];
        if binary {
            args.push("--binary".to_string());
        }
        args
    }

    fn zowe(&self, args: &[String], context: &str) -> Result<CommandOutput> {
        run_captured(&self.program, args, context).map_err(|e| {
            e.with_hint("Install Zowe CLI and create default zosmf and ssh profiles")
        })
    }
}

impl Default for ZoweCli {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteShell for ZoweCli {
    fn run(&self, command: &str, cwd: Option<&str>, env: &EnvVars) -> Result<CommandOutput> {
        let line = remote_env::command_line(command, cwd, env)?;
        log_status!("zowe", "issue ssh: {}", command);
        self.zowe(&Self::issue_ssh_args(&line), "zowe zos-uss issue ssh")?
            .into_remote_result(&line, None)
    }
}

impl FileTransfer for ZoweCli {
    fn upload(&self, local_path: &str, remote_path: &str) -> Result<()> {
        let is_dir = Path::new(local_path).is_dir();
        let output = self.zowe(
            &Self::upload_args(local_path, remote_path, is_dir),
            "zowe files upload",
        )?;
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

    fn download(&self, remote_path: &str, local_path: &str, binary: bool) -> Result<()> {
        let output = self.zowe(
            &Self::download_args(remote_path, local_path, binary),
            "zowe files download",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_ssh_passes_line_as_single_arg() {
        let args = ZoweCli::issue_ssh_args("cd '/u/dev/src' && make all");
        assert_eq!(
            args,
            vec!["zos-uss", "issue", "ssh", "cd '/u/dev/src' && make all"]
        );
    }

    #[test]
    fn upload_file_uses_file_to_uss() {
        let args = ZoweCli::upload_args("src/a.c", "/u/dev/src/a.c", false);
        assert_eq!(
            args,
            vec!["files", "upload", "file-to-uss", "src/a.c", "/u/dev/src/a.c"]
        );
    }

    #[test]
    fn upload_directory_is_recursive() {
        let args = ZoweCli::upload_args("src/h", "/u/dev/src/h", true);
        assert_eq!(args[2], "dir-to-uss");
        assert_eq!(args.last().map(String::as_str), Some("--recursive"));
    }

    #[test]
    fn download_binary_flag() {
        let args = ZoweCli::download_args("/u/dev/src/out.so", "./build/out.so", true);
        assert_eq!(
            args,
            vec![
                "files",
                "download",
                "uss-file",
                "/u/dev/src/out.so",
                "-f",
                "./build/out.so",
                "--binary"
            ]
        );

        let text = ZoweCli::download_args("/u/dev/src/out.txt", "out.txt", false);
        assert!(!text.contains(&"--binary".to_string()));
    }

    #[test]
    fn missing_zowe_program_is_io_error_with_hint() {
        let zowe = ZoweCli {
            program: "nonexistent_zowe_xyz".to_string(),
        };
        let err = zowe.upload("src/a.c", "/u/dev/src/a.c").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(!err.hints.is_empty());
    }
}
