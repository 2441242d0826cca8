// Shared HTTP transport: retries, status mapping, response archiving and stats

use crate::config::{calculate_backoff, ClientConfig};
use crate::error::ApiError;
use bytes::Bytes;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct ClientStats {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
    pub requests_retried: usize,
    pub average_response_time_ms: f64,
}

impl ClientStats {
    fn record(&mut self, elapsed_ms: f64, succeeded: bool) {
        self.requests_sent += 1;
        if succeeded {
            self.requests_succeeded += 1;
        } else {
            self.requests_failed += 1;
        }
        let n = self.requests_sent as f64;
        self.average_response_time_ms += (elapsed_ms - self.average_response_time_ms) / n;
    }
}

#[derive(Debug, Clone)]
pub struct HttpCore {
    client: reqwest::Client,
    config: ClientConfig,
    stats: Arc<Mutex<ClientStats>>,
}

impl HttpCore {
    pub fn new(config: ClientConfig, cookie_store: bool) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .cookie_store(cookie_store)
            .build()?;

        Ok(Self {
            client,
            config,
            stats: Arc::new(Mutex::new(ClientStats::default())),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn stats(&self) -> ClientStats {
        self.stats.lock().clone()
    }

    // Send the request built by `build`, rebuilding it for every retry attempt
    pub async fn execute<F>(&self, tag: &str, build: F) -> Result<Bytes, ApiError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let retry = &self.config.retry_config;
        let mut attempt = 0;

        loop {
            let started = Instant::now();
            let result = self.send_once(build(&self.client)).await;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            self.stats.lock().record(elapsed_ms, result.is_ok());

            match result {
                Ok(body) => {
                    debug!(tag, bytes = body.len(), elapsed_ms, "request succeeded");
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                    let backoff = calculate_backoff(attempt, retry);
                    warn!(tag, attempt, error = %e, ?backoff, "request failed, retrying");
                    self.stats.lock().requests_retried += 1;
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(tag, error = %e, "request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(&self, request: reqwest::RequestBuilder) -> Result<Bytes, ApiError> {
        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let snippet: String = String::from_utf8_lossy(&body).chars().take(200).collect();
            return Err(ApiError::HttpStatus {
                status_code: status.as_u16(),
                message: format!("{} {}", status.canonical_reason().unwrap_or(""), snippet)
                    .trim()
                    .to_string(),
            });
        }
        Ok(body)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            e.into()
        }
    }

    // Write the raw body to the archive directory, if one is configured
    pub async fn archive(&self, file_name: &str, body: &Bytes) -> Result<(), ApiError> {
        let Some(dir) = &self.config.archive_dir else {
            return Ok(());
        };
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, body).await?;
        debug!(path = %path.display(), "archived response");
        Ok(())
    }

    pub async fn fetch_json<T, F>(
        &self,
        tag: &str,
        archive_name: Option<&str>,
        build: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let body = self.execute(tag, build).await?;
        if let Some(name) = archive_name {
            self.archive(name, &body).await?;
        }
        decode_json(tag, &body)
    }
}

pub fn decode_json<T: DeserializeOwned>(tag: &str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::JsonParseError {
        tag: tag.to_string(),
        message: e.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::mock_server::{CannedResponse, MockServer, RecordedRequest};
    use super::*;
    use crate::config::RetryConfig;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Ping {
        ok: bool,
    }

    fn fast_retry_config(base: &str) -> ClientConfig {
        ClientConfig {
            retry_config: RetryConfig {
                max_retries: 2,
                initial_backoff_ms: 1,
                max_backoff_ms: 5,
                backoff_multiplier: 2.0,
                jitter_factor: 0.0,
            },
            ..ClientConfig::with_base_url(base)
        }
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::status(503, "busy"));
        server.enqueue(CannedResponse::json(r#"{"ok": true}"#));

        let core = HttpCore::new(fast_retry_config(&server.base_url()), false).unwrap();
        let url = format!("{}/ping", server.base_url());
        let ping: Ping = core
            .fetch_json("ping", None, |c| c.get(&url))
            .await
            .unwrap();

        assert!(ping.ok);
        let stats = core.stats();
        assert_eq!(stats.requests_sent, 2);
        assert_eq!(stats.requests_failed, 1);
        assert_eq!(stats.requests_succeeded, 1);
        assert_eq!(stats.requests_retried, 1);
        assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::status(404, "missing"));

        let core = HttpCore::new(fast_retry_config(&server.base_url()), false).unwrap();
        let url = format!("{}/missing", server.base_url());
        let err = core.execute("missing", |c| c.get(&url)).await.unwrap_err();

        match err {
            ApiError::HttpStatus { status_code, message } => {
                assert_eq!(status_code, 404);
                assert!(message.contains("missing"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_archive_writes_raw_body() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::json(r#"{"ok": false}"#));
        let dir = tempfile::tempdir().unwrap();

        let config = ClientConfig {
            archive_dir: Some(dir.path().join("data")),
            ..fast_retry_config(&server.base_url())
        };
        let core = HttpCore::new(config, false).unwrap();
        let url = format!("{}/ping", server.base_url());
        let ping: Ping = core
            .fetch_json("ping", Some("ping.json"), |c| c.get(&url))
            .await
            .unwrap();

        assert!(!ping.ok);
        let saved = std::fs::read_to_string(dir.path().join("data/ping.json")).unwrap();
        assert_eq!(saved, r#"{"ok": false}"#);
    }

    #[test]
    fn test_recorded_request_decodes_query_and_form() {
        let request = RecordedRequest {
            method: "POST".to_string(),
            target: "/ajax/search.ajax?q=Tie+Fighter&color=%5B11%5D".to_string(),
            headers: Vec::new(),
            body: "userid=builder%40example.com&password=a%26b+c".to_string(),
        };
        assert_eq!(request.query_param("q").as_deref(), Some("Tie Fighter"));
        assert_eq!(request.query_param("color").as_deref(), Some("[11]"));
        assert_eq!(request.query_param("missing"), None);
        assert_eq!(
            request.form_param("userid").as_deref(),
            Some("builder@example.com")
        );
        assert_eq!(request.form_param("password").as_deref(), Some("a&b c"));
    }

    #[test]
    fn test_decode_json_reports_tag() {
        let err = decode_json::<Ping>("Wanted List 3", b"{not json").unwrap_err();
        assert!(err.to_string().starts_with("JSON parse error in Wanted List 3"));
    }
}
