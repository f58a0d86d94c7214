//! HTTP backend abstraction.
//!
//! The production backend uses reqwest with retry and exponential backoff:
//! before retry `n` (counting from 0) it waits `base_delay * 2^n`. There is
//! no jitter and no circuit breaker. Tests swap in [`testing::FakeBackend`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that fetch JSON or text from URLs.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> RemoteResult<T>;

    /// Fetch a URL and return the body as text.
    async fn get_text(&self, url: &Url) -> RemoteResult<String>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Statuses worth retrying: server errors, rate limiting, request timeout.
fn is_retryable(status: reqwest::StatusCode) -> bool {
    status.is_server_error()
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
}

/// Delay before retry number `retry` (0-based).
pub(crate) fn backoff_delay(base: Duration, retry: u8) -> Duration {
    base.saturating_mul(2u32.saturating_pow(u32::from(retry)))
}

/// Production HTTP backend using reqwest with retry logic.
#[derive(Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Backend without authentication.
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        Self::build(config, None)
    }

    /// Backend that sends the configured GitHub token as a bearer token.
    pub fn for_github(config: &RemoteConfig) -> RemoteResult<Self> {
        Self::build(config, config.github_token.clone())
    }

    fn build(config: &RemoteConfig, auth_token: Option<String>) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
            auth_token,
        })
    }

    /// Build a request with optional authentication.
    fn build_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(ref token) = self.auth_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(&self, url: &Url) -> RemoteResult<reqwest::Response> {
        let mut last_error: Option<RemoteError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_base_delay, attempt - 1);
                debug!(url = %url, attempt, delay_ms = delay.as_millis(), "Retrying request");
                tokio::time::sleep(delay).await;
            }

            match self.build_request(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let error = RemoteError::RequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    };
                    if is_retryable(status) && attempt < self.max_retries {
                        last_error = Some(error);
                        continue;
                    }

                    // Other 4xx errors or final attempt - fail immediately
                    return Err(error);
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RemoteError::invalid("unknown error during fetch")))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> RemoteResult<T> {
        let response = self.fetch_with_retry(url).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_text(&self, url: &Url) -> RemoteResult<String> {
        let response = self.fetch_with_retry(url).await?;
        Ok(response.text().await?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub enum CannedResponse {
        Json(serde_json::Value),
        Text(String),
        Status(u16),
    }

    /// A fake HTTP backend that returns canned responses and records requests.
    #[derive(Clone, Default)]
    pub struct FakeBackend {
        responses: Arc<Mutex<Vec<(String, CannedResponse)>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for URLs containing `url_contains`.
        /// Earlier patterns win.
        pub fn with_response(self, url_contains: &str, response: CannedResponse) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push((url_contains.to_string(), response));
            self
        }

        pub fn with_json(self, url_contains: &str, json: serde_json::Value) -> Self {
            self.with_response(url_contains, CannedResponse::Json(json))
        }

        /// Every URL requested so far.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn respond(&self, url: &Url) -> RemoteResult<Body> {
            self.requests.lock().unwrap().push(url.to_string());
            let found = self
                .responses
                .lock()
                .unwrap()
                .iter()
                .find(|(pattern, _)| url.as_str().contains(pattern.as_str()))
                .map(|(_, response)| response.clone());
            let status = match found {
                Some(CannedResponse::Json(json)) => return Ok(Body::Json(json)),
                Some(CannedResponse::Text(text)) => return Ok(Body::Text(text)),
                Some(CannedResponse::Status(status)) => status,
                None => 404,
            };
            Err(RemoteError::RequestFailed {
                status,
                url: url.to_string(),
            })
        }
    }

    enum Body {
        Json(serde_json::Value),
        Text(String),
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> RemoteResult<T> {
            match self.respond(url)? {
                Body::Json(json) => Ok(serde_json::from_value(json)?),
                Body::Text(text) => Ok(serde_json::from_str(&text)?),
            }
        }

        async fn get_text(&self, url: &Url) -> RemoteResult<String> {
            match self.respond(url)? {
                Body::Json(json) => Ok(json.to_string()),
                Body::Text(text) => Ok(text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local HTTP server answering with `statuses` in order, repeating the
    /// last one. Returns the base URL and a hit counter.
    async fn scripted_server(statuses: Vec<u16>) -> (Url, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let hit = counter.fetch_add(1, Ordering::SeqCst);
                let status = statuses[hit.min(statuses.len() - 1)];

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let body = if status == 200 { r#"{"ok":true}"# } else { "" };
                let response = format!(
                    "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        let url = Url::parse(&format!("http://{addr}/v0beta/servers")).unwrap();
        (url, hits)
    }

    fn fast_backend(max_retries: u8) -> ReqwestBackend {
        let config = RemoteConfig::new()
            .with_max_retries(max_retries)
            .with_retry_delay(Duration::from_millis(10));
        ReqwestBackend::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_retries_server_errors_until_success() {
        let (url, hits) = scripted_server(vec![503, 503, 200]).await;

        let value: serde_json::Value = fast_backend(2).get_json(&url).await.unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (url, hits) = scripted_server(vec![503]).await;

        let result: RemoteResult<serde_json::Value> = fast_backend(2).get_json(&url).await;
        assert_eq!(result.unwrap_err().status(), Some(503));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (url, hits) = scripted_server(vec![404, 200]).await;

        let err = fast_backend(3).get_text(&url).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_from_base() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(2000));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(reqwest::StatusCode::BAD_GATEWAY));
        assert!(is_retryable(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable(reqwest::StatusCode::NOT_FOUND));
        assert!(!is_retryable(reqwest::StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_github_backend_carries_token() {
        let config = RemoteConfig::new().with_github_token(Some("ghp_x".into()));
        assert_eq!(
            ReqwestBackend::for_github(&config).unwrap().auth_token.as_deref(),
            Some("ghp_x")
        );
        assert!(ReqwestBackend::new(&config).unwrap().auth_token.is_none());
    }

    #[tokio::test]
    async fn test_fake_backend_canned_and_missing() {
        let backend = FakeBackend::new()
            .with_json("servers", json!({"total_count": 3}))
            .with_response("down", CannedResponse::Status(503))
            .with_response("readme", CannedResponse::Text("# Hi".into()));

        let url = Url::parse("https://example.com/servers?x=1").unwrap();
        let value: serde_json::Value = backend.get_json(&url).await.unwrap();
        assert_eq!(value["total_count"], 3);

        let url = Url::parse("https://example.com/down").unwrap();
        let result: RemoteResult<serde_json::Value> = backend.get_json(&url).await;
        assert_eq!(result.unwrap_err().status(), Some(503));

        let url = Url::parse("https://example.com/unknown").unwrap();
        assert_eq!(backend.get_text(&url).await.unwrap_err().status(), Some(404));

        let url = Url::parse("https://example.com/readme").unwrap();
        assert_eq!(backend.get_text(&url).await.unwrap(), "# Hi");
        assert_eq!(backend.requests().len(), 4);
    }
}
