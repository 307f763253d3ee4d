// src/utils/http.rs

//! HTTP client utilities.
//!
//! Every agency request goes through [`HttpClient`], which retries network
//! failures and 5xx answers with linearly growing pauses. A 4xx answer is
//! returned to the caller on the first attempt.

use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Attempts and backoff unit for one request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Pause after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                log::warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                    label,
                    attempt,
                    policy.max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// A configured client plus its retry policy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a client with the configured User-Agent and timeout.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            inner,
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.inner.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.inner.post(url)
    }

    /// Send a request with retries, failing on any non-success status.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let label = describe(&request);
        let (request, label) = (&request, label.as_str());
        with_retry(self.retry, label, || async move {
            let attempt = request
                .try_clone()
                .ok_or_else(|| AppError::config(format!("{label}: request body is not cloneable")))?;
            let response = attempt.send().await?;
            let status = response.status();
            if status.is_success() {
                Ok(response)
            } else {
                Err(AppError::HttpStatus {
                    url: response.url().to_string(),
                    status: status.as_u16(),
                })
            }
        })
        .await
    }

    pub async fn text(&self, request: RequestBuilder) -> Result<String> {
        Ok(self.send(request).await?.text().await?)
    }

    pub async fn bytes(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        Ok(self.send(request).await?.bytes().await?.to_vec())
    }

    pub async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// `METHOD host/path` for log lines, without query strings that carry keys.
fn describe(request: &RequestBuilder) -> String {
    request
        .try_clone()
        .and_then(|r| r.build().ok())
        .map(|r| {
            let url = r.url();
            format!(
                "{} {}{}",
                r.method(),
                url.host_str().unwrap_or_default(),
                url.path()
            )
        })
        .unwrap_or_else(|| "request".to_string())
}

/// Pause between successive requests to one API.
pub async fn pause(millis: u64) {
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
