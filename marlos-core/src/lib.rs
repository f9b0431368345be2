//! # Marlos Core Library
//!
//! The local half of the Marlos support assistant. Everything here runs
//! without a network:
//!
//! - **Normalization** — accent/case/punctuation-insensitive text folding
//! - **Knowledge base** — ordered table of trigger phrases and canned replies
//! - **Matcher** — first-hit substring matching over the knowledge base
//! - **Stores** — conversation history and API settings, in memory or SQLite
//! - **Export** — transcripts as plain text, JSON or printable HTML
//!
//! ## Resolution order
//!
//! ```text
//! message ──► normalize ──► LocalMatcher ──hit──► canned reply
//!                                │
//!                               miss
//!                                ▼
//!                     remote resolver (marlos-llm)
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod export;
pub mod knowledge;
pub mod matcher;
pub mod normalize;
pub mod persistence;
pub mod store;
pub mod types;

pub use config::MarlosConfig;
pub use error::MarlosError;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use matcher::LocalMatcher;
pub use normalize::normalize;
pub use store::{HistoryStore, MemoryStore, SettingsStore};
pub use types::*;
