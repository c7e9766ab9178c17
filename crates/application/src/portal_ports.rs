//! Ports implemented by infrastructure adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use serde_json::Value;

use fypms_core::{AppResult, BearerToken};
use fypms_domain::Route;

/// Durable client-side key/value storage.
pub trait SessionStorage: Send + Sync {
    /// Reads a key.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Writes a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes a key. Missing keys are not an error.
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Outbound request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Bearer credential; `None` means no `Authorization` header.
    pub bearer: Option<BearerToken>,
}

impl ApiRequest {
    /// Creates a request without body, query or credential.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    /// Shorthand for `GET`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for `POST` with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    /// Shorthand for `PUT` with a JSON body.
    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    /// Shorthand for `DELETE`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Inbound response. An empty or non-JSON body is `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Decoded JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }
}

/// HTTP transport used by the client wrapper.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request. Every received response, whatever its status, is `Ok`;
    /// only transport failures are `AppError::Transport`.
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse>;
}

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    /// Replaces the current location with `route`.
    fn redirect(&self, route: &Route);
}

/// Wall clock.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
