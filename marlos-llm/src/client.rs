//! Remote resolver: one POST to the user's completion endpoint.

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use marlos_core::ApiSettings;
use marlos_core::config::RemoteConfig;

use crate::error::ResolveError;
use crate::extract::{extract_reply, truthy};
use crate::payload::{API_HOST_HEADER, API_KEY_HEADER, CompletionPayload, ProbePayload};
use crate::types::{RemoteReply, ReplySource};

/// Issues completion requests and interprets whatever comes back.
///
/// No retries: a failed exchange is reported once and the caller decides
/// what to show.
#[derive(Debug, Clone)]
pub struct RemoteResolver {
    http: Client,
    config: RemoteConfig,
}

impl RemoteResolver {
    /// Create a resolver with its own HTTP client.
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a resolver sharing an existing HTTP client.
    #[must_use]
    pub fn with_client(http: Client, config: RemoteConfig) -> Self {
        Self { http, config }
    }

    /// Bound on a chat exchange.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.config.request_timeout_ms)
    }

    /// Bound on a connection probe.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.config.probe_timeout_ms)
    }

    /// Resolve `message` against the endpoint described by `settings`.
    ///
    /// Incomplete settings return the local-mode advisory without touching
    /// the network. `settings` is a snapshot: it is read once, up front.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Timeout`] when the exchange exceeds the bound,
    /// [`ResolveError::Http`] on a non-success status,
    /// [`ResolveError::Unparsable`] on an empty success body, and
    /// [`ResolveError::Transport`] / [`ResolveError::InvalidRequest`] when
    /// the request cannot be made.
    pub async fn resolve(
        &self,
        message: &str,
        settings: &ApiSettings,
    ) -> Result<RemoteReply, ResolveError> {
        if !settings.is_complete() {
            debug!("API settings incomplete, answering in local mode");
            return Ok(RemoteReply::local_mode());
        }

        let payload = CompletionPayload::new(message, settings, &self.config);
        let start = Instant::now();
        let (status, body) = self
            .bounded_exchange(settings, &payload, self.config.request_timeout_ms)
            .await?;

        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Completion endpoint answered"
        );

        interpret(status, &body)
    }

    /// Send a `{"prompt":"test"}` request and report the status.
    ///
    /// # Errors
    ///
    /// [`ResolveError::IncompleteSettings`] when URL, host or key is
    /// missing; otherwise the same failures as [`Self::resolve`], with
    /// non-success statuses reported without detail.
    pub async fn probe(&self, settings: &ApiSettings) -> Result<u16, ResolveError> {
        if !settings.is_complete() {
            return Err(ResolveError::IncompleteSettings);
        }

        let (status, _body) = self
            .bounded_exchange(settings, &ProbePayload::default(), self.config.probe_timeout_ms)
            .await?;

        if status.is_success() {
            info!(status = status.as_u16(), url = %settings.api_url, "API probe succeeded");
            Ok(status.as_u16())
        } else {
            warn!(status = status.as_u16(), url = %settings.api_url, "API probe failed");
            Err(ResolveError::Http {
                status: status.as_u16(),
                detail: None,
            })
        }
    }

    /// Run one exchange, cancelling it after `timeout_ms`.
    async fn bounded_exchange<B: Serialize + ?Sized>(
        &self,
        settings: &ApiSettings,
        body: &B,
        timeout_ms: u64,
    ) -> Result<(StatusCode, String), ResolveError> {
        let exchange = self.exchange(settings, body);
        match tokio::time::timeout(Duration::from_millis(timeout_ms), exchange).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms, url = %settings.api_url, "Completion request timed out");
                Err(ResolveError::Timeout(timeout_ms))
            }
        }
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        settings: &ApiSettings,
        body: &B,
    ) -> Result<(StatusCode, String), ResolveError> {
        let response = self
            .http
            .post(&settings.api_url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &settings.api_key)
            .header(API_HOST_HEADER, &settings.api_host)
            .json(body)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "Completion request failed"))?;

        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

/// Turn a finished exchange into a reply or a typed failure.
fn interpret(status: StatusCode, body: &str) -> Result<RemoteReply, ResolveError> {
    if !status.is_success() {
        // The error body is best-effort decoration; failing to parse it
        // never hides the status.
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("error").filter(|e| truthy(e)).map(Value::to_string));
        warn!(status = status.as_u16(), detail = ?detail, "Completion endpoint returned error");
        return Err(ResolveError::Http {
            status: status.as_u16(),
            detail,
        });
    }

    match serde_json::from_str::<Value>(body) {
        Ok(json) => {
            let text = extract_reply(&json);
            if text.is_empty() {
                warn!("Completion body held no extractable text");
                Ok(RemoteReply::empty())
            } else {
                Ok(RemoteReply {
                    text,
                    source: ReplySource::Extracted,
                })
            }
        }
        Err(_) if body.is_empty() => Err(ResolveError::Unparsable),
        Err(_) => Ok(RemoteReply {
            text: body.to_string(),
            source: ReplySource::RawText,
        }),
    }
}
