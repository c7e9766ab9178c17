use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fypms_application::SessionStorage;
use fypms_core::{AppError, AppResult};
use tracing::warn;

/// Session storage persisted as one JSON object on disk.
#[derive(Debug)]
pub struct JsonFileSessionStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileSessionStorage {
    /// Creates storage backed by `path`; the file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> AppResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read session storage '{}': {error}",
                    self.path.display()
                )));
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "session storage file is malformed, starting empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| {
                AppError::Internal(format!(
                    "failed to create session storage directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let raw = serde_json::to_string_pretty(entries).map_err(|error| {
            AppError::Internal(format!("failed to encode session storage: {error}"))
        })?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, raw)
            .and_then(|()| fs::rename(&staging, &self.path))
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write session storage '{}': {error}",
                    self.path.display()
                ))
            })
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> AppResult<()> {
        let _guard = self
            .guard
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock session storage: {error}")))?;
        let mut entries = self.read_entries()?;
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl SessionStorage for JsonFileSessionStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self
            .guard
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock session storage: {error}")))?;
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
