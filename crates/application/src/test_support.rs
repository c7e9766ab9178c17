use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use http::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::Barrier;

use fypms_core::{AppError, AppResult, Role};
use fypms_domain::Route;

use crate::{
    ApiClient, ApiRequest, ApiResponse, AuthSessionStore, Clock, HttpTransport, Navigator,
    SessionStorage,
};

fn lock_error(error: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("failed to lock test state: {error}"))
}

#[derive(Default)]
pub struct FakeStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl FakeStorage {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .iter()
                    .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                    .collect(),
            ),
        }
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl SessionStorage for FakeStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().map_err(lock_error)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .lock()
            .map_err(lock_error)?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.lock().map_err(lock_error)?.remove(key);
        Ok(())
    }
}

/// Transport answering from per-route queues; unscripted routes get `200 null`.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<AppResult<ApiResponse>>>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Option<Arc<Barrier>>,
}

impl ScriptedTransport {
    /// Holds every request until `parties` requests are in flight.
    pub fn gated(parties: usize) -> Self {
        Self {
            gate: Some(Arc::new(Barrier::new(parties))),
            ..Self::default()
        }
    }

    fn route_key(method: &Method, path: &str) -> String {
        format!("{method} {path}")
    }

    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.push(method, path, Ok(ApiResponse::new(status, body)));
    }

    pub fn fail(&self, method: Method, path: &str, error: AppError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: Method, path: &str, response: AppResult<ApiResponse>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses
                .entry(Self::route_key(&method, path))
                .or_default()
                .push_back(response);
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let key = Self::route_key(&request.method, &request.path);
        self.requests.lock().map_err(lock_error)?.push(request);

        if let Some(gate) = &self.gate {
            gate.wait().await;
        }

        self.responses
            .lock()
            .map_err(lock_error)?
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(ApiResponse::new(StatusCode::OK, Value::Null)))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<Route> {
        self.redirects
            .lock()
            .map(|redirects| redirects.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &Route) {
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(route.clone());
        }
    }
}

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2026, 2, 2, 10, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"));
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
            .lock()
            .map(|now| *now)
            .unwrap_or_else(|_| panic!("test"))
    }
}

/// Wired client with fakes behind every port.
pub struct Harness {
    pub storage: Arc<FakeStorage>,
    pub transport: Arc<ScriptedTransport>,
    pub navigator: Arc<RecordingNavigator>,
    pub clock: Arc<FixedClock>,
    pub session: AuthSessionStore,
    pub client: ApiClient,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_transport(ScriptedTransport::default())
    }

    pub fn with_transport(transport: ScriptedTransport) -> Self {
        let storage = Arc::new(FakeStorage::default());
        let transport = Arc::new(transport);
        let navigator = Arc::new(RecordingNavigator::default());
        let session = AuthSessionStore::new(storage.clone());
        let _ = session.restore();
        let client = ApiClient::new(transport.clone(), session.clone(), navigator.clone());

        Self {
            storage,
            transport,
            navigator,
            clock: Arc::new(FixedClock::new()),
            session,
            client,
        }
    }

    pub fn signed_in(self, role: Role) -> Self {
        let _ = self
            .session
            .login("user-1", "tok-1", role)
            .unwrap_or_else(|_| panic!("test"));
        self
    }
}
