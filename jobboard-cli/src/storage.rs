//! Session storage for the command line: a small JSON object on disk.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use frontend::storage::{DurableStorage, StorageError};

/// Overrides the session file location.
pub const SESSION_FILE_ENV: &str = "JOBBOARD_SESSION_FILE";

/// Where the session is kept: `$JOBBOARD_SESSION_FILE`, else the platform
/// data directory, else the working directory.
pub fn session_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SESSION_FILE_ENV).filter(|path| !path.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("", "", "jobboard")
        .map(|dirs| dirs.data_dir().join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./session.json"))
}

/// [`DurableStorage`] backed by a JSON file, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the file at `path`. A missing file is an empty storage.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read session file {}", path.display()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("corrupt session file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    fn flush(&self, key: &str) -> Result<(), StorageError> {
        let write_error = |reason: String| StorageError::Write {
            key: key.to_string(),
            reason,
        };

        let entries = self.entries.borrow();
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                    Err(write_error(err.to_string()))
                }
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| write_error(err.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(&*entries).map_err(|err| write_error(err.to_string()))?;
        fs::write(&self.path, raw).map_err(|err| write_error(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|err| write_error(err.to_string()))?;
        }
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush(key)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        self.flush(key)
    }
}
