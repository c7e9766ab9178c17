use std::time::Duration;

use async_trait::async_trait;
use fypms_application::{ApiRequest, ApiResponse, HttpTransport};
use fypms_core::{AppError, AppResult};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// `reqwest`-backed transport rooted at the backend base URL.
#[derive(Debug, Clone)]
pub struct ReqwestHttpTransport {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ReqwestHttpTransport {
    /// Creates a transport with a per-request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self::with_client(http_client, base_url))
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub fn with_client(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Resolves a request path and query against the base URL, keeping any
    /// path prefix the base carries.
    pub fn endpoint(&self, request: &ApiRequest) -> AppResult<Url> {
        if self.base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "API base URL '{}' cannot carry paths",
                self.base_url
            )));
        }

        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_owned();
        let path = request.path.trim_start_matches('/');
        url.set_path(&format!("{prefix}/{path}"));
        url.set_query(None);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }

        Ok(url)
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let url = self.endpoint(&request)?;
        debug!(
            method = %request.method,
            path = %url.path(),
            authorized = request.bearer.is_some(),
            "sending API request"
        );

        let mut builder = self.http_client.request(request.method.clone(), url);
        if let Some(bearer) = &request.bearer {
            builder = builder.header(reqwest::header::AUTHORIZATION, bearer.authorization_value());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| AppError::Transport(format!("Network error: {error}")))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|error| {
            AppError::Transport(format!("Failed to read response body: {error}"))
        })?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        debug!(status = status.as_u16(), "API response received");
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fypms_application::{ApiRequest, HttpTransport};
    use fypms_core::{AppError, BearerToken};
    use http::StatusCode;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    use super::ReqwestHttpTransport;

    fn transport(base: &str) -> ReqwestHttpTransport {
        ReqwestHttpTransport::new(
            Url::parse(base).unwrap_or_else(|_| panic!("test")),
            Duration::from_secs(5),
        )
        .unwrap_or_else(|_| panic!("test"))
    }

    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|_| panic!("test"));
        let address = listener.local_addr().unwrap_or_else(|_| panic!("test"));
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap_or_else(|_| panic!("test"));
            let mut buffer = vec![0_u8; 8192];
            let read = socket
                .read(&mut buffer)
                .await
                .unwrap_or_else(|_| panic!("test"));
            socket
                .write_all(response.as_bytes())
                .await
                .unwrap_or_else(|_| panic!("test"));
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buffer[..read]).into_owned()
        });

        (format!("http://{address}"), handle)
    }

    #[test]
    fn endpoint_keeps_base_prefix_and_encodes_query() {
        let transport = transport("https://fyp.uog.edu.pk/backend/");
        let request = ApiRequest::get("/api/session-policy").with_query("year", "2021 2025");

        let url = transport
            .endpoint(&request)
            .unwrap_or_else(|_| panic!("test"));

        assert_eq!(
            url.as_str(),
            "https://fyp.uog.edu.pk/backend/api/session-policy?year=2021+2025"
        );
    }

    #[tokio::test]
    async fn bearer_is_sent_and_status_passes_through() {
        let (base, server) = serve_once(
            "HTTP/1.1 401 Unauthorized\r\ncontent-type: application/json\r\ncontent-length: 27\r\nconnection: close\r\n\r\n{\"message\":\"Token expired\"}",
        )
        .await;
        let mut request = ApiRequest::get("/api/domains");
        request.bearer = BearerToken::new("tok-9").ok();

        let response = transport(&base)
            .send(request)
            .await
            .unwrap_or_else(|_| panic!("test"));

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, json!({"message": "Token expired"}));
        let raw = server.await.unwrap_or_else(|_| panic!("test"));
        assert!(raw.starts_with("GET /api/domains HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer tok-9"));
    }

    #[tokio::test]
    async fn non_json_body_reads_as_null() {
        let (base, _server) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 5\r\nconnection: close\r\n\r\noops!",
        )
        .await;

        let response = transport(&base)
            .send(ApiRequest::get("/api/domains"))
            .await
            .unwrap_or_else(|_| panic!("test"));

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.is_null());
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|_| panic!("test"));
        let address = listener.local_addr().unwrap_or_else(|_| panic!("test"));
        drop(listener);

        let result = transport(&format!("http://{address}"))
            .send(ApiRequest::get("/api/domains"))
            .await;

        assert!(matches!(result, Err(AppError::Transport(_))));
    }
}
