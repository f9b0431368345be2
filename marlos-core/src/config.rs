//! Configuration for the Marlos assistant.
//!
//! Maps directly to `marlos.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a working local-only assistant.
//!
//! ```toml
//! [matcher]
//! compose_delay_ms = 650
//! knowledge_path = "kb.toml"
//!
//! [remote]
//! request_timeout_ms = 15000
//!
//! [history]
//! db_path = "marlos.db"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Marlos configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarlosConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Local knowledge-base matching.
    #[serde(default)]
    pub matcher: MatcherConfig,
    /// Remote completion API behavior (not the user's credentials).
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Conversation history persistence.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Fixed texts shown by the chat session.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl MarlosConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MarlosError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::MarlosError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Knowledge-base matcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Pause before a local match is returned, in milliseconds. `0` disables it.
    #[serde(default = "default_650")]
    pub compose_delay_ms: u64,
    /// Optional TOML file replacing the built-in knowledge base.
    #[serde(default)]
    pub knowledge_path: Option<PathBuf>,
}

impl MatcherConfig {
    /// The compose delay as a [`Duration`].
    #[must_use]
    pub fn compose_delay(&self) -> Duration {
        Duration::from_millis(self.compose_delay_ms)
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            compose_delay_ms: 650,
            knowledge_path: None,
        }
    }
}

/// Remote completion API behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Hard timeout for a chat request in milliseconds.
    #[serde(default = "default_15000")]
    pub request_timeout_ms: u64,
    /// Hard timeout for a connection probe in milliseconds.
    #[serde(default = "default_10000")]
    pub probe_timeout_ms: u64,
    /// Temperature sent when the user settings leave it unset.
    #[serde(default = "default_0_2")]
    pub default_temperature: f32,
    /// Token limit sent when the user settings leave it unset.
    #[serde(default = "default_512")]
    pub default_max_tokens: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 15_000,
            probe_timeout_ms: 10_000,
            default_temperature: 0.2,
            default_max_tokens: 512,
        }
    }
}

/// History persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// SQLite database holding history and settings.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Use WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            wal_mode: true,
        }
    }
}

/// Fixed texts used by the chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Shown when the conversation starts with an empty history.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Shown after the history is cleared.
    #[serde(default = "default_reset_greeting")]
    pub reset_greeting: String,
    /// Stored as the bot reply when the remote call fails.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            reset_greeting: default_reset_greeting(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_db_path() -> PathBuf { PathBuf::from("marlos.db") }
fn default_greeting() -> String {
    "¡Hola! Soy Marlos — tu asistente de soporte técnico. Pregúntame lo que quieras sobre informática básica.".to_string()
}
fn default_reset_greeting() -> String {
    "He reiniciado la conversación. ¿Qué te gustaría consultar?".to_string()
}
fn default_fallback_reply() -> String {
    "Lo siento, hubo un problema al conectar con el servicio. Prueba de nuevo o utiliza una pregunta rápida.".to_string()
}
fn default_0_2() -> f32 { 0.2 }
fn default_512() -> u32 { 512 }
fn default_650() -> u64 { 650 }
fn default_10000() -> u64 { 10_000 }
fn default_15000() -> u64 { 15_000 }
