use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use fypms_application::SessionStorage;
use fypms_core::{AppError, AppResult};

/// Process-local session storage.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> AppResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock session storage: {error}")))
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
