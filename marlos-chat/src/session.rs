//! Chat session: one conversation, its history and its API settings.
//!
//! Every turn is persisted as a user message followed by a bot message.
//! When the remote stage fails, the bot message is the configured fallback
//! reply and the failure is reported through an error [`Notice`], so a
//! failed turn still shows up in the conversation.

use std::sync::Arc;

use tracing::{info, warn};

use marlos_core::config::{ChatConfig, MarlosConfig};
use marlos_core::export::{self, ExportFormat};
use marlos_core::persistence::SqliteStore;
use marlos_core::{ApiSettings, ChatMessage, HistoryStore, SettingsStore};
use marlos_llm::ResolveError;

use crate::error::Result;
use crate::notice::Notice;
use crate::pipeline::{ReplyOrigin, ResponsePipeline};

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// The stored user message.
    pub user: ChatMessage,
    /// The stored bot message (a real reply or the fallback).
    pub reply: ChatMessage,
    /// Where the reply came from; `None` when the fallback was used.
    pub origin: Option<ReplyOrigin>,
    /// Set when the remote stage failed.
    pub notice: Option<Notice>,
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Rendered transcript, or `None` when the history is empty.
    pub content: Option<String>,
    /// Suggested file name.
    pub file_name: &'static str,
    /// MIME type of `content`.
    pub mime_type: &'static str,
    /// What to tell the user.
    pub notice: Notice,
}

/// A conversation bound to its stores.
pub struct ChatSession {
    pipeline: ResponsePipeline,
    history: Arc<dyn HistoryStore>,
    settings: Arc<dyn SettingsStore>,
    texts: ChatConfig,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("pipeline", &self.pipeline)
            .field("texts", &self.texts)
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Assemble a session from its parts.
    #[must_use]
    pub fn new(
        pipeline: ResponsePipeline,
        history: Arc<dyn HistoryStore>,
        settings: Arc<dyn SettingsStore>,
        texts: ChatConfig,
    ) -> Self {
        Self {
            pipeline,
            history,
            settings,
            texts,
        }
    }

    /// Open a session backed by the SQLite database named in `config`.
    ///
    /// # Errors
    /// Returns an error if the database or knowledge file cannot be opened.
    pub fn open(config: &MarlosConfig) -> Result<Self> {
        let store = Arc::new(SqliteStore::open(&config.history.db_path, &config.history)?);
        let pipeline = ResponsePipeline::from_config(config)?;
        info!(
            db = %store.path().display(),
            entries = pipeline.matcher().knowledge().len(),
            "Chat session opened"
        );
        Ok(Self::new(
            pipeline,
            store.clone(),
            store,
            config.chat.clone(),
        ))
    }

    /// The response pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &ResponsePipeline {
        &self.pipeline
    }

    /// What to show when the conversation opens: the stored history, or the
    /// greeting (not persisted) when there is none.
    ///
    /// # Errors
    /// Returns an error if the history cannot be read.
    pub fn opening(&self) -> Result<Vec<ChatMessage>> {
        let history = self.history.read_all()?;
        if history.is_empty() {
            Ok(vec![ChatMessage::bot(self.texts.greeting.clone())])
        } else {
            Ok(history)
        }
    }

    /// Every stored message, oldest first.
    ///
    /// # Errors
    /// Returns an error if the history cannot be read.
    pub fn history(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.history.read_all()?)
    }

    /// Number of stored messages.
    ///
    /// # Errors
    /// Returns an error if the history cannot be read.
    pub fn message_count(&self) -> Result<usize> {
        Ok(self.history.len()?)
    }

    /// Send one message and persist the exchange.
    ///
    /// Blank input is ignored (`Ok(None)`). Taking `&mut self` keeps a
    /// second send from starting while one is in flight, which would
    /// interleave history writes.
    ///
    /// # Errors
    /// Only store failures; remote failures become the fallback reply.
    pub async fn send(&mut self, raw: &str) -> Result<Option<Turn>> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(None);
        }

        // Read once per turn, before anything is stored.
        let snapshot = self.settings.load()?;

        let user = ChatMessage::user(text);
        self.history.append(&user)?;

        let (reply, origin, notice) = match self.pipeline.respond(text, &snapshot).await {
            Ok(resolution) => (
                ChatMessage::bot(resolution.text),
                Some(resolution.origin),
                None,
            ),
            Err(e) => {
                warn!(error = %e, "Remote resolution failed, storing fallback reply");
                (
                    ChatMessage::bot(self.texts.fallback_reply.clone()),
                    None,
                    Some(Notice::error(format!("Error de API: {e}"))),
                )
            }
        };
        self.history.append(&reply)?;

        Ok(Some(Turn {
            user,
            reply,
            origin,
            notice,
        }))
    }

    /// Clear the history. Returns the reset greeting (not persisted).
    ///
    /// # Errors
    /// Returns an error if the history cannot be cleared.
    pub fn clear(&mut self) -> Result<(ChatMessage, Notice)> {
        self.history.clear()?;
        info!("Conversation reset");
        Ok((
            ChatMessage::bot(self.texts.reset_greeting.clone()),
            Notice::info("Chat reiniciado."),
        ))
    }

    /// Render the stored history.
    ///
    /// # Errors
    /// Returns an error if the history cannot be read or encoded.
    pub fn export(&self, format: ExportFormat) -> Result<ExportOutcome> {
        let history = self.history.read_all()?;
        let content = export::render(&history, format)?;
        let notice = if content.is_some() {
            let label = match format {
                ExportFormat::Txt => "TXT",
                ExportFormat::Json => "JSON",
                ExportFormat::Html => "HTML",
            };
            Notice::success(format!("Conversación exportada como {label}."))
        } else {
            Notice::info("No hay mensajes para exportar.")
        };
        Ok(ExportOutcome {
            content,
            file_name: format.file_name(),
            mime_type: format.mime_type(),
            notice,
        })
    }

    /// Current API settings.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be read.
    pub fn settings(&self) -> Result<ApiSettings> {
        Ok(self.settings.load()?)
    }

    /// Store new API settings, trimming URL, host and key.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be written.
    pub fn save_settings(&self, settings: &ApiSettings) -> Result<Notice> {
        let trimmed = ApiSettings {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            ..ApiSettings::new(&settings.api_url, &settings.api_host, &settings.api_key)
        };
        self.settings.save(&trimmed)?;
        Ok(Notice::success("Ajustes guardados."))
    }

    /// Store empty API settings, returning the assistant to local mode.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be written.
    pub fn reset_settings(&self) -> Result<Notice> {
        self.settings.reset()?;
        Ok(Notice::info("Ajustes reiniciados."))
    }

    /// Probe `candidate` with a test request and describe the outcome.
    pub async fn test_connection(&self, candidate: &ApiSettings) -> Notice {
        match self.pipeline.resolver().probe(candidate).await {
            Ok(_) => Notice::success("Conexión exitosa con la API."),
            Err(ResolveError::IncompleteSettings) => {
                Notice::error("Completa URL, Host y API Key antes de probar.")
            }
            Err(ResolveError::Http { status, .. }) => {
                Notice::error(format!("Error en la conexión: HTTP {status}"))
            }
            Err(e) => Notice::error(format!("No se pudo conectar: {e}")),
        }
    }
}
