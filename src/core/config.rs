//! Loading of the two configuration files that drive a z/OS build.
//!
//! `zowe-api.json` holds per-project settings and `user-zowe-api.json`
//! holds per-developer settings. Both are read fresh on every invocation.

use crate::error::{Error, Result};
use crate::paths;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How remote commands and file transfers reach z/OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Zowe CLI with its default z/OSMF and SSH profiles.
    #[default]
    Zowe,
    /// OpenSSH `ssh` and `scp` against the host in `UserConfig::ssh`.
    Ssh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshTarget {
    pub host: String,
    pub user: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<String>,
}

fn default_port() -> u16 {
    22
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default)]
    pub zos_target_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_home: Option<String>,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh: Option<SshTarget>,
}

impl UserConfig {
    /// `javaHome` when set to a non-empty value.
    pub fn java_home(&self) -> Option<&str> {
        self.java_home.as_deref().filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub zos_sources_dir: String,
    #[serde(default)]
    pub build_command: String,
    /// Remote file name (relative to the remote working directory) to local target path.
    #[serde(default)]
    pub build_files: BTreeMap<String, String>,
}

/// Both configuration objects plus where they came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub project_dir: PathBuf,
    pub user_path: PathBuf,
    pub project_path: PathBuf,
    pub user: UserConfig,
    pub project: ProjectConfig,
}

/// Load and validate `user-zowe-api.json` and `zowe-api.json` from `project_dir`.
pub fn load(project_dir: &Path) -> Result<LoadedConfig> {
    let project_path = paths::project_config(project_dir);
    let user_path = paths::user_config(project_dir);

    let project: ProjectConfig = read_json(&project_path)?;
    validate_project(&project, &project_path)?;

    let user: UserConfig = read_json(&user_path)?;
    validate_user(&user, &user_path)?;

    Ok(LoadedConfig {
        project_dir: project_dir.to_path_buf(),
        user_path,
        project_path,
        user,
        project,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let display = path.to_string_lossy().to_string();

    if !path.exists() {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| display.clone());
        return Err(Error::config_not_found(display)
            .with_hint(format!("Create {} in the project directory", file_name)));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("read {}", display))))?;

    serde_json::from_str(&raw).map_err(|e| Error::config_invalid_json(display, e))
}

fn validate_project(project: &ProjectConfig, path: &Path) -> Result<()> {
    require("zosSourcesDir", &project.zos_sources_dir, path)?;
    require("buildCommand", &project.build_command, path)?;

    for (remote, local) in &project.build_files {
        if remote.trim().is_empty() || local.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "buildFiles",
                Some(format!("{} -> {}", remote, local)),
                "Build file names and targets cannot be empty",
            ));
        }
    }

    Ok(())
}

fn validate_user(user: &UserConfig, path: &Path) -> Result<()> {
    require("zosTargetDir", &user.zos_target_dir, path)?;

    if user.transport == Transport::Ssh {
        let ssh = user.ssh.as_ref().ok_or_else(|| {
            Error::config_missing_key("ssh", Some(path.to_string_lossy().to_string()))
                .with_hint("The ssh transport needs {\"ssh\": {\"host\": ..., \"user\": ...}}")
        })?;

        if ssh.host.trim().is_empty() || ssh.user.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "ssh",
                Some(format!("{}@{}", ssh.user, ssh.host)),
                "Both host and user are required",
            ));
        }
    }

    Ok(())
}

fn require(key: &str, value: &str, path: &Path) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::config_missing_key(
            key,
            Some(path.to_string_lossy().to_string()),
        ));
    }
    Ok(())
}
