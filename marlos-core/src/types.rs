//! Core value types shared by every Marlos crate.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Conversation history
// ---------------------------------------------------------------------------

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing.
    User,
    /// The assistant.
    Bot,
}

impl Role {
    /// Lowercase wire/storage name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }

    /// Parse the storage name back into a role.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "bot" => Some(Self::Bot),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    /// When the message was produced.
    pub timestamp: DateTime<Utc>,
}

/// One persisted half of a conversation turn.
///
/// Serializes as `{"role": "user", "text": "...", "meta": {"timestamp": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Message body, as displayed.
    pub text: String,
    /// Timestamp and friends.
    pub meta: MessageMeta,
}

impl ChatMessage {
    /// A message stamped with the current time.
    #[must_use]
    pub fn now(role: Role, text: impl Into<String>) -> Self {
        Self::at(role, text, Utc::now())
    }

    /// A message with an explicit timestamp.
    #[must_use]
    pub fn at(role: Role, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            text: text.into(),
            meta: MessageMeta { timestamp },
        }
    }

    /// Shorthand for a user message stamped now.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::now(Role::User, text)
    }

    /// Shorthand for a bot message stamped now.
    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self::now(Role::Bot, text)
    }

    /// ISO-8601 timestamp with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`.
    #[must_use]
    pub fn timestamp_iso(&self) -> String {
        self.meta
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

// ---------------------------------------------------------------------------
// API settings
// ---------------------------------------------------------------------------

/// User-supplied credentials and generation parameters for the remote API.
///
/// Field names on the wire follow the stored settings record
/// (`apiUrl`, `apiHost`, `apiKey`, `temperature`, `max_tokens`).
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Endpoint the completion request is POSTed to.
    #[serde(rename = "apiUrl", default)]
    pub api_url: String,
    /// Value of the `X-RapidAPI-Host` header.
    #[serde(rename = "apiHost", default)]
    pub api_host: String,
    /// Value of the `X-RapidAPI-Key` header.
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Sampling temperature; the remote default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Generation token limit; the remote default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ApiSettings {
    /// Build settings from raw form input, trimming each field.
    #[must_use]
    pub fn new(api_url: &str, api_host: &str, api_key: &str) -> Self {
        Self {
            api_url: api_url.trim().to_string(),
            api_host: api_host.trim().to_string(),
            api_key: api_key.trim().to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Whether URL, host and key are all present.
    ///
    /// The remote path is only taken when this holds.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_url.is_empty() && !self.api_host.is_empty() && !self.api_key.is_empty()
    }

    /// The API key with everything but the last four characters hidden.
    #[must_use]
    pub fn masked_key(&self) -> String {
        let count = self.api_key.chars().count();
        if count <= 4 {
            return "*".repeat(count);
        }
        let tail: String = self.api_key.chars().skip(count - 4).collect();
        format!("{}{tail}", "*".repeat(count - 4))
    }
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_url", &self.api_url)
            .field("api_host", &self.api_host)
            .field("api_key", &self.masked_key())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_trim_and_completeness() {
        let s = ApiSettings::new("  https://api.example.com/chat ", " api.example.com", "key ");
        assert_eq!(s.api_url, "https://api.example.com/chat");
        assert_eq!(s.api_host, "api.example.com");
        assert_eq!(s.api_key, "key");
        assert!(s.is_complete());

        assert!(!ApiSettings::new("https://x", "", "key").is_complete());
        assert!(!ApiSettings::default().is_complete());
    }

    #[test]
    fn settings_wire_names() {
        let s = ApiSettings::new("u", "h", "k").with_max_tokens(64);
        let json = serde_json::to_value(&s).expect("serializes");
        assert_eq!(json["apiUrl"], "u");
        assert_eq!(json["apiHost"], "h");
        assert_eq!(json["apiKey"], "k");
        assert_eq!(json["max_tokens"], 64);
        assert!(json.get("temperature").is_none());

        let partial: ApiSettings =
            serde_json::from_str(r#"{"apiKey":"k"}"#).expect("missing fields default");
        assert_eq!(partial.api_key, "k");
        assert!(partial.api_url.is_empty());
    }

    #[test]
    fn debug_masks_key() {
        let s = ApiSettings::new("u", "h", "supersecret1234");
        let rendered = format!("{s:?}");
        assert!(!rendered.contains("supersecret"));
        assert!(rendered.contains("1234"));
        assert_eq!(ApiSettings::new("u", "h", "abc").masked_key(), "***");
    }

    #[test]
    fn message_record_shape() {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let msg = ChatMessage::at(Role::Bot, "hola", ts);
        let json = serde_json::to_value(&msg).expect("serializes");
        assert_eq!(json["role"], "bot");
        assert_eq!(json["text"], "hola");
        assert!(json["meta"]["timestamp"].is_string());
        assert_eq!(msg.timestamp_iso(), "2024-05-01T10:00:00.000Z");
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("system"), None);
    }
}
