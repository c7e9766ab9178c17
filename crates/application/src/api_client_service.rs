//! Single outbound gateway to the backend API.

use std::sync::Arc;

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use fypms_core::{AppError, AppResult};
use fypms_domain::Route;

use crate::{ApiRequest, AuthSessionStore, HttpTransport, Navigator};

/// Attaches the current bearer token to every request and turns error
/// statuses into [`AppError`]s. A 401 clears the session globally.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: AuthSessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Creates a client.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: AuthSessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
        }
    }

    /// Returns the session store used for credentials.
    #[must_use]
    pub fn session(&self) -> &AuthSessionStore {
        &self.session
    }

    /// Sends a request and returns the JSON body of a 2xx response.
    pub async fn send(&self, mut request: ApiRequest) -> AppResult<Value> {
        request.bearer = self.session.bearer_token()?;
        let authenticated = request.bearer.is_some();
        let method = request.method.clone();
        let path = request.path.clone();
        debug!(method = %method, path = %path, authenticated, "sending api request");

        let response = self.transport.send(request).await?;
        if response.status.is_success() {
            return Ok(response.body);
        }

        let message = server_message(&response.body).unwrap_or_default();
        warn!(method = %method, path = %path, status = response.status.as_u16(), "api request failed");

        Err(match response.status {
            StatusCode::UNAUTHORIZED => {
                self.handle_unauthorized()?;
                if authenticated {
                    AppError::SessionExpired(message)
                } else {
                    AppError::Unauthorized(message)
                }
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::Validation(message)
            }
            StatusCode::FORBIDDEN => AppError::Forbidden(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::CONFLICT => AppError::Conflict(message),
            _ => AppError::Internal(message),
        })
    }

    fn handle_unauthorized(&self) -> AppResult<()> {
        if self.session.expire()? {
            self.navigator.redirect(&Route::Entry);
        }

        Ok(())
    }

    /// Sends a request and decodes the response body.
    pub async fn send_json<T>(&self, request: ApiRequest) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let path = request.path.clone();
        let body = match self.send(request).await? {
            Value::Null => Value::Object(Map::new()),
            body => body,
        };
        serde_json::from_value(body).map_err(|error| {
            AppError::Internal(format!("unexpected response from '{path}': {error}"))
        })
    }
}

/// Extracts the human message of an error body: the `message` field, else the
/// `errors` list joined by single spaces.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    if let Some(message) = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
    {
        return Some(message.to_owned());
    }

    let errors: Vec<&str> = body
        .get("errors")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|error| {
            error
                .as_str()
                .or_else(|| error.get("msg").and_then(Value::as_str))
                .or_else(|| error.get("message").and_then(Value::as_str))
        })
        .collect();

    (!errors.is_empty()).then(|| errors.join(" "))
}
