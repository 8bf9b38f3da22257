use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigMissingKey,
    ConfigInvalidJson,
    ConfigInvalidValue,
    ConfigNotFound,

    ValidationInvalidArgument,

    SourceDirNotFound,
    SourceNotADirectory,

    SshIdentityFileNotFound,

    RemoteCommandFailed,

    TransferUploadFailed,
    TransferDownloadFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigMissingKey => "config.missing_key",
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",
            ErrorCode::ConfigNotFound => "config.not_found",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::SourceDirNotFound => "source.dir_not_found",
            ErrorCode::SourceNotADirectory => "source.not_a_directory",

            ErrorCode::SshIdentityFileNotFound => "ssh.identity_file_not_found",

            ErrorCode::RemoteCommandFailed => "remote.command_failed",

            ErrorCode::TransferUploadFailed => "transfer.upload_failed",
            ErrorCode::TransferDownloadFailed => "transfer.download_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMissingKeyDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigNotFoundDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDirDetails {
    pub dir: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SshIdentityFileNotFoundDetails {
    pub identity_file: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFailedDetails {
    pub source: String,
    pub destination: String,
    pub exit_code: i32,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn config_missing_key(key: impl Into<String>, path: Option<String>) -> Self {
        let key = key.into();
        let details = to_details(ConfigMissingKeyDetails {
            key: key.clone(),
            path,
        });

        Self::new(
            ErrorCode::ConfigMissingKey,
            format!("Missing required configuration key '{}'", key),
            details,
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn config_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(ConfigNotFoundDetails { path: path.clone() });

        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file '{}' does not exist", path),
            details,
        )
    }

    pub fn source_dir_not_found(dir: impl Into<String>) -> Self {
        let dir = dir.into();
        let details = to_details(SourceDirDetails { dir: dir.clone() });

        Self::new(
            ErrorCode::SourceDirNotFound,
            format!("Directory '{}' does not exist", dir),
            details,
        )
        .with_hint("Check 'zosSourcesDir' in zowe-api.json")
    }

    pub fn source_not_a_directory(dir: impl Into<String>) -> Self {
        let dir = dir.into();
        let details = to_details(SourceDirDetails { dir: dir.clone() });

        Self::new(
            ErrorCode::SourceNotADirectory,
            format!("'{}' is not a directory", dir),
            details,
        )
        .with_hint("'zosSourcesDir' must point to a directory of z/OS sources")
    }

    pub fn ssh_identity_file_not_found(identity_file: impl Into<String>) -> Self {
        let details = to_details(SshIdentityFileNotFoundDetails {
            identity_file: identity_file.into(),
        });

        Self::new(
            ErrorCode::SshIdentityFileNotFound,
            "SSH identity file not found",
            details,
        )
    }

    pub fn remote_command_failed(details: RemoteCommandFailedDetails) -> Self {
        Self::new(
            ErrorCode::RemoteCommandFailed,
            "Remote command failed",
            to_details(details),
        )
    }

    pub fn transfer_upload_failed(details: TransferFailedDetails) -> Self {
        let message = format!(
            "Upload of '{}' to '{}' failed",
            details.source, details.destination
        );
        Self::new(
            ErrorCode::TransferUploadFailed,
            message,
            to_details(details),
        )
    }

    pub fn transfer_download_failed(details: TransferFailedDetails) -> Self {
        let message = format!(
            "Download of '{}' to '{}' failed",
            details.source, details.destination
        );
        Self::new(
            ErrorCode::TransferDownloadFailed,
            message,
            to_details(details),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
