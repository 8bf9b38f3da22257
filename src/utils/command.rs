//! Command execution primitives with consistent error handling.

use std::process::{Command, Output, Stdio};

use crate::error::{Error, RemoteCommandFailedDetails, Result};

/// Captured result of an external process.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn from_output(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
        }
    }

    /// Turn a failed remote command into `remote.command_failed`.
    pub fn into_remote_result(self, command: &str, host: Option<&str>) -> Result<Self> {
        if self.success {
            return Ok(self);
        }

        Err(Error::remote_command_failed(RemoteCommandFailedDetails {
            command: command.to_string(),
            exit_code: self.exit_code,
            stdout: self.stdout,
            stderr: self.stderr,
            host: host.map(str::to_string),
        }))
    }

    /// Prefers stderr, falls back to stdout if stderr is empty.
    pub fn error_text(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.trim().to_string()
        } else {
            self.stdout.trim().to_string()
        }
    }
}

/// Run a program with an argument vector and capture its output.
///
/// Spawn failures (program missing, permission denied) surface as
/// `internal.io_error`; a non-zero exit is reported through `CommandOutput`.
pub fn run_captured(program: &str, args: &[String], context: &str) -> Result<CommandOutput> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            Error::internal_io(
                format!("Failed to run {}: {}", program, e),
                Some(context.to_string()),
            )
        })?;

    Ok(CommandOutput::from_output(output))
}
