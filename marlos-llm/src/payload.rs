//! Request bodies sent to the completion endpoint.
//!
//! The upstream schema is not under our control, so the message is sent
//! under three synonymous keys (`prompt`, `msg`, `input`) and whichever one
//! the endpoint understands wins.

use serde::Serialize;

use marlos_core::ApiSettings;
use marlos_core::config::RemoteConfig;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-RapidAPI-Key";
/// Header carrying the API host.
pub const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Body of a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionPayload<'a> {
    /// The message.
    pub prompt: &'a str,
    /// The message, again.
    pub msg: &'a str,
    /// The message, once more.
    pub input: &'a str,
    /// Sampling temperature.
    pub temperature: f32,
    /// Generation token limit.
    pub max_tokens: u32,
}

impl<'a> CompletionPayload<'a> {
    /// Build the body for `message`, taking generation parameters from the
    /// user's settings and falling back to the configured defaults.
    #[must_use]
    pub fn new(message: &'a str, settings: &ApiSettings, defaults: &RemoteConfig) -> Self {
        Self {
            prompt: message,
            msg: message,
            input: message,
            temperature: settings.temperature.unwrap_or(defaults.default_temperature),
            max_tokens: settings.max_tokens.unwrap_or(defaults.default_max_tokens),
        }
    }
}

/// Body of a connection probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbePayload {
    /// Fixed probe text.
    pub prompt: &'static str,
}

impl Default for ProbePayload {
    fn default() -> Self {
        Self { prompt: "test" }
    }
}
