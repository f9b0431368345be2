//! Storage capabilities consumed by the chat session.
//!
//! History and settings are injected as trait objects so the resolution
//! pipeline never touches ambient global state. [`MemoryStore`] keeps both
//! in process; [`crate::persistence::SqliteStore`] keeps both on disk.

use parking_lot::Mutex;

use crate::error::Result;
use crate::types::{ApiSettings, ChatMessage};

/// Append-only conversation log.
pub trait HistoryStore: Send + Sync {
    /// Append one message at the end of the log.
    ///
    /// # Errors
    /// Returns an error if the backend cannot write.
    fn append(&self, message: &ChatMessage) -> Result<()>;

    /// Every stored message, oldest first.
    ///
    /// # Errors
    /// Returns an error if the backend cannot read.
    fn read_all(&self) -> Result<Vec<ChatMessage>>;

    /// Remove every message.
    ///
    /// # Errors
    /// Returns an error if the backend cannot write.
    fn clear(&self) -> Result<()>;

    /// Number of stored messages.
    ///
    /// # Errors
    /// Returns an error if the backend cannot read.
    fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    /// Whether the log is empty.
    ///
    /// # Errors
    /// Returns an error if the backend cannot read.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Single settings record for the remote API.
pub trait SettingsStore: Send + Sync {
    /// Current settings; defaults when nothing was saved.
    ///
    /// # Errors
    /// Returns an error if the backend cannot read.
    fn load(&self) -> Result<ApiSettings>;

    /// Replace the stored settings.
    ///
    /// # Errors
    /// Returns an error if the backend cannot write.
    fn save(&self, settings: &ApiSettings) -> Result<()>;

    /// Store empty URL, host and key.
    ///
    /// # Errors
    /// Returns an error if the backend cannot write.
    fn reset(&self) -> Result<()> {
        self.save(&ApiSettings::default())
    }
}

/// In-process history and settings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    history: Mutex<Vec<ChatMessage>>,
    settings: Mutex<ApiSettings>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with settings.
    #[must_use]
    pub fn with_settings(settings: ApiSettings) -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            settings: Mutex::new(settings),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn append(&self, message: &ChatMessage) -> Result<()> {
        self.history.lock().push(message.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.history.lock().clone())
    }

    fn clear(&self) -> Result<()> {
        self.history.lock().clear();
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.history.lock().len())
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<ApiSettings> {
        Ok(self.settings.lock().clone())
    }

    fn save(&self, settings: &ApiSettings) -> Result<()> {
        *self.settings.lock() = settings.clone();
        Ok(())
    }
}
