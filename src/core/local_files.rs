use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Entry returned from directory listing. Files, directories and anything
/// else the platform lists are all included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
}

/// Trait for the local file system queries a build needs
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    /// True only for a real directory; a symlink to a directory does not count.
    fn is_dir(&self, path: &Path) -> bool;
    /// One level only, in the order the platform returns entries.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_dir())
            .unwrap_or(false)
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("list directory {}", dir.display())),
            )
        })?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::internal_io(
                    e.to_string(),
                    Some(format!("list directory {}", dir.display())),
                )
            })?;
            result.push(Entry {
                name: entry.file_name().to_string_lossy().to_string(),
            });
        }

        Ok(result)
    }
}
