//! Authenticated identity lifecycle.
//!
//! The store starts `Unknown`, leaves it once through [`AuthSessionStore::restore`],
//! and keeps the persisted record and the standalone token key in sync.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Deserialize;
use tracing::{debug, info, warn};

use fypms_core::{AppError, AppResult, AuthIdentity, BearerToken, Role};

use crate::SessionStorage;

/// Storage key of the standalone bearer token.
pub const TOKEN_STORAGE_KEY: &str = "authToken";

/// Storage key of the combined identity record.
pub const IDENTITY_STORAGE_KEY: &str = "authUser";

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Restore has not run yet.
    Unknown,
    /// No session.
    Anonymous,
    /// A valid session.
    Authenticated(AuthIdentity),
}

impl AuthState {
    /// Returns the identity when authenticated.
    #[must_use]
    pub fn identity(&self) -> Option<&AuthIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unknown | Self::Anonymous => None,
        }
    }
}

/// Persisted record as found in storage; every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredIdentity {
    id: Option<String>,
    token: Option<String>,
    role: Option<String>,
    full_name: Option<String>,
    session: Option<String>,
}

impl StoredIdentity {
    fn into_identity(self) -> Option<AuthIdentity> {
        let role: Role = self.role?.parse().ok()?;
        let mut identity = AuthIdentity::new(self.id?, self.token?, role).ok()?;
        if let Some(full_name) = self.full_name {
            identity = identity.with_full_name(full_name);
        }
        if let Some(session) = self.session {
            identity = identity.with_session(session);
        }

        Some(identity)
    }
}

/// Process-wide session store shared by the client wrapper, forms and guard.
#[derive(Clone)]
pub struct AuthSessionStore {
    storage: Arc<dyn SessionStorage>,
    state: Arc<Mutex<AuthState>>,
    ready: Arc<AtomicBool>,
}

impl AuthSessionStore {
    /// Creates a store in the `Unknown` state.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            state: Arc::new(Mutex::new(AuthState::Unknown)),
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock_state(&self) -> AppResult<MutexGuard<'_, AuthState>> {
        self.state
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock auth state: {error}")))
    }

    /// Reads the persisted record once. A well-formed record authenticates and
    /// re-syncs the token key; anything else clears both keys. Storage trouble
    /// never fails the boot: it only yields `Anonymous`.
    pub fn restore(&self) -> AppResult<AuthState> {
        let mut state = self.lock_state()?;
        if self.is_ready() {
            debug!("auth session already restored");
            return Ok(state.clone());
        }

        let restored = match self.read_identity() {
            Some(identity) => {
                if let Err(error) = self
                    .storage
                    .set(TOKEN_STORAGE_KEY, identity.token().as_str())
                {
                    warn!(error = %error, "failed to re-sync persisted token");
                }
                info!(user_id = %identity.id(), role = %identity.role(), "auth session restored");
                AuthState::Authenticated(identity)
            }
            None => {
                let _ = self.clear_storage();
                AuthState::Anonymous
            }
        };

        *state = restored.clone();
        self.ready.store(true, Ordering::SeqCst);

        Ok(restored)
    }

    fn read_identity(&self) -> Option<AuthIdentity> {
        let raw = match self.storage.get(IDENTITY_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                warn!(error = %error, "failed to read persisted auth session");
                return None;
            }
        };

        let identity = serde_json::from_str::<StoredIdentity>(&raw)
            .ok()
            .and_then(StoredIdentity::into_identity);
        if identity.is_none() {
            warn!("discarding malformed persisted auth session");
        }

        identity
    }

    /// Returns whether restore has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> AppResult<AuthState> {
        Ok(self.lock_state()?.clone())
    }

    /// Returns the current identity.
    pub fn identity(&self) -> AppResult<Option<AuthIdentity>> {
        Ok(self.lock_state()?.identity().cloned())
    }

    /// Returns the bearer token of the current identity.
    pub fn bearer_token(&self) -> AppResult<Option<BearerToken>> {
        Ok(self
            .lock_state()?
            .identity()
            .map(|identity| identity.token().clone()))
    }

    /// Starts a session from login response fields. All three must be non-empty.
    pub fn login(&self, id: &str, token: &str, role: Role) -> AppResult<AuthIdentity> {
        let identity = AuthIdentity::new(id, token, role)?;
        self.establish(identity.clone())?;
        Ok(identity)
    }

    /// Replaces the current session with `identity` and persists it. A failed
    /// write clears both keys and leaves the store `Anonymous`.
    pub fn establish(&self, identity: AuthIdentity) -> AppResult<()> {
        let record = serde_json::to_string(&identity).map_err(|error| {
            AppError::Internal(format!("failed to encode auth session: {error}"))
        })?;

        let mut state = self.lock_state()?;
        let persisted = self
            .storage
            .set(IDENTITY_STORAGE_KEY, &record)
            .and_then(|()| {
                self.storage
                    .set(TOKEN_STORAGE_KEY, identity.token().as_str())
            });
        if let Err(error) = persisted {
            warn!(error = %error, "failed to persist auth session, rolling back");
            let _ = self.clear_storage();
            *state = AuthState::Anonymous;
            return Err(error);
        }
        info!(user_id = %identity.id(), role = %identity.role(), "auth session established");
        *state = AuthState::Authenticated(identity);

        Ok(())
    }

    /// Ends the session. Both persisted keys are always attempted; the first
    /// removal error is returned.
    pub fn logout(&self) -> AppResult<()> {
        let mut state = self.lock_state()?;
        *state = AuthState::Anonymous;
        let cleared = self.clear_storage();
        info!("auth session ended");

        cleared
    }

    /// Drops the session after the server rejected its credential. Storage is
    /// always cleared; returns `true` only for the call that moved the store
    /// from `Authenticated` to `Anonymous`.
    pub fn expire(&self) -> AppResult<bool> {
        let mut state = self.lock_state()?;
        let was_authenticated = matches!(*state, AuthState::Authenticated(_));
        if was_authenticated || self.is_ready() {
            *state = AuthState::Anonymous;
        }
        let _ = self.clear_storage();

        if was_authenticated {
            warn!("auth session expired by server");
        }

        Ok(was_authenticated)
    }

    fn clear_storage(&self) -> AppResult<()> {
        let mut first_error = None;
        for key in [IDENTITY_STORAGE_KEY, TOKEN_STORAGE_KEY] {
            if let Err(error) = self.storage.remove(key) {
                warn!(key, error = %error, "failed to clear persisted auth key");
                first_error.get_or_insert(error);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
