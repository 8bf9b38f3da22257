//! Build native code on z/OS UNIX.
//!
//! Sources are uploaded to `{zosTargetDir}/{zosSourcesDir}`, the project's build
//! command runs there, and the configured build outputs are downloaded back.
//! Every step blocks until its collaborator returns and the first failure
//! ends the run. Nothing is retried or rolled back.

use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use crate::config::{ProjectConfig, UserConfig};
use crate::error::{Error, Result};
use crate::local_files::{Entry, FileSystem, LocalFs};
use crate::paths;
use crate::remote::{FileTransfer, RemoteShell};
use crate::remote_env::EnvVars;
use crate::shell;

/// Receives human-readable progress while a build runs.
pub trait ProgressSink {
    fn message(&self, message: &str);

    fn success(&self, message: &str) {
        self.message(message);
    }
}

/// Writes progress to stderr via `log_status!`.
///
/// Silent when stderr is not a terminal, so redirected or CI runs show no
/// per-file progress. The returned `ZosBuildReport` still lists every transfer.
pub struct StatusLog;

impl ProgressSink for StatusLog {
    fn message(&self, message: &str) {
        log_status!("zos-build", "{}", message);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub source: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    pub command: String,
    pub cwd: String,
    pub env: EnvVars,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZosBuildReport {
    pub zos_dir: String,
    pub mkdir_command: String,
    pub uploads: Vec<TransferRecord>,
    pub build: BuildRecord,
    pub downloads: Vec<TransferRecord>,
    pub dry_run: bool,
}

/// Remote working directory: `{zosTargetDir}/{zosSourcesDir}`, unnormalized.
pub fn remote_dir(user: &UserConfig, project: &ProjectConfig) -> String {
    format!("{}/{}", user.zos_target_dir, project.zos_sources_dir)
}

/// Environment overrides for the build command. `JAVA_HOME` only when configured.
pub fn build_env(user: &UserConfig) -> EnvVars {
    let mut env = EnvVars::new();
    if let Some(java_home) = user.java_home() {
        env.insert("JAVA_HOME".to_string(), java_home.to_string());
    }
    env
}

pub fn mkdir_command(zos_dir: &str) -> String {
    format!("mkdir -p {}", shell::quote_path(zos_dir))
}

/// One build invocation over a fixed pair of configuration objects.
pub struct ZosBuild<'a> {
    user: &'a UserConfig,
    project: &'a ProjectConfig,
    local_root: Option<&'a Path>,
    fs: &'a dyn FileSystem,
    progress: &'a dyn ProgressSink,
}

impl<'a> ZosBuild<'a> {
    pub fn new(user: &'a UserConfig, project: &'a ProjectConfig) -> Self {
        Self {
            user,
            project,
            local_root: None,
            fs: &LocalFs,
            progress: &StatusLog,
        }
    }

    /// Resolve relative local paths against `root` instead of the current directory.
    pub fn with_local_root(mut self, root: Option<&'a Path>) -> Self {
        self.local_root = root;
        self
    }

    pub fn with_fs(mut self, fs: &'a dyn FileSystem) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    pub fn zos_dir(&self) -> String {
        remote_dir(self.user, self.project)
    }

    /// Run the build: mkdir, upload sources, build, download outputs.
    pub fn run(
        &self,
        executor: &dyn RemoteShell,
        transfer: &dyn FileTransfer,
    ) -> Result<ZosBuildReport> {
        let zos_dir = self.zos_dir();

        let mkdir = mkdir_command(&zos_dir);
        executor.run(&mkdir, None, &EnvVars::new())?;

        let (local_dir, entries) = self.list_sources()?;

        let mut uploads = Vec::with_capacity(entries.len());
        for entry in &entries {
            let record = upload_record(&local_dir, &zos_dir, entry);
            self.progress
                .message(&format!("Uploading {} to {}", entry.name, record.destination));
            transfer.upload(&record.source, &record.destination)?;
            uploads.push(record);
        }

        let env = build_env(self.user);
        self.progress.message("Building z/OS native code");
        let started_at = chrono::Utc::now().to_rfc3339();
        let timer = Instant::now();
        let output = executor.run(&self.project.build_command, Some(&zos_dir), &env)?;
        let build = BuildRecord {
            command: self.project.build_command.clone(),
            cwd: zos_dir.clone(),
            env,
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: Some(output.exit_code),
            started_at: Some(started_at),
            duration_ms: Some(timer.elapsed().as_millis() as u64),
        };

        let mut downloads = Vec::with_capacity(self.project.build_files.len());
        for record in self.download_records(&zos_dir) {
            self.progress.message(&format!(
                "Downloading {} to {}",
                record.source, record.destination
            ));
            transfer.download(&record.source, &record.destination, true)?;
            downloads.push(record);
        }

        self.progress.success("z/OS build completed");

        Ok(ZosBuildReport {
            zos_dir,
            mkdir_command: mkdir,
            uploads,
            build,
            downloads,
            dry_run: false,
        })
    }

    /// Report what `run` would do without touching z/OS.
    ///
    /// The local source directory is still checked and listed.
    pub fn plan(&self) -> Result<ZosBuildReport> {
        let zos_dir = self.zos_dir();
        let (local_dir, entries) = self.list_sources()?;

        let uploads: Vec<_> = entries
            .iter()
            .map(|entry| upload_record(&local_dir, &zos_dir, entry))
            .collect();

        for record in &uploads {
            log_status!("dry-run", "Would upload {} -> {}", record.source, record.destination);
        }

        let downloads = self.download_records(&zos_dir);
        for record in &downloads {
            log_status!("dry-run", "Would download {} -> {}", record.source, record.destination);
        }

        Ok(ZosBuildReport {
            mkdir_command: mkdir_command(&zos_dir),
            uploads,
            build: BuildRecord {
                command: self.project.build_command.clone(),
                cwd: zos_dir.clone(),
                env: build_env(self.user),
                stdout: String::new(),
                stderr: String::new(),
                exit_code: None,
                started_at: None,
                duration_ms: None,
            },
            downloads,
            zos_dir,
            dry_run: true,
        })
    }

    /// Check the local sources directory and list it (one level).
    fn list_sources(&self) -> Result<(String, Vec<Entry>)> {
        let local_dir = paths::resolve_local(self.local_root, &self.project.zos_sources_dir);
        let path = Path::new(&local_dir);

        if !self.fs.exists(path) {
            return Err(Error::source_dir_not_found(&local_dir));
        }
        if !self.fs.is_dir(path) {
            return Err(Error::source_not_a_directory(&local_dir));
        }

        let entries = self.fs.list(path)?;
        Ok((local_dir, entries))
    }

    fn download_records(&self, zos_dir: &str) -> Vec<TransferRecord> {
        self.project
            .build_files
            .iter()
            .map(|(remote, local)| TransferRecord {
                source: format!("{}/{}", zos_dir, remote),
                destination: paths::resolve_local(self.local_root, local),
                binary: Some(true),
            })
            .collect()
    }
}

fn upload_record(local_dir: &str, zos_dir: &str, entry: &Entry) -> TransferRecord {
    TransferRecord {
        source: format!("{}/{}", local_dir, entry.name),
        destination: format!("{}/{}", zos_dir, entry.name),
        binary: None,
    }
}
