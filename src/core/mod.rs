// Public modules
pub mod config;
pub mod error;
pub mod local_files;
pub mod paths;
pub mod remote;
pub mod remote_env;
pub mod ssh;
pub mod zos_build;
pub mod zowe;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
