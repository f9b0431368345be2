//! # marlos-chat — Chat Session for Marlos
//!
//! Glue between the local half (`marlos-core`) and the remote half
//! (`marlos-llm`):
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │                ChatSession                 │
//! │  HistoryStore   SettingsStore   Notices    │
//! │        │              │ snapshot           │
//! │        ▼              ▼                    │
//! │  ┌──────────────────────────────────────┐  │
//! │  │          ResponsePipeline            │  │
//! │  │  LocalMatcher ──miss──► Resolver     │  │
//! │  └──────────────────────────────────────┘  │
//! └────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `pipeline` — knowledge base first, remote endpoint second
//! - `session` — persistence of turns, fallback on failure, settings, export
//! - `notice` — transient user-facing notifications

pub mod error;
pub mod notice;
pub mod pipeline;
pub mod session;

pub use error::ChatError;
pub use notice::{Notice, NoticeLevel};
pub use pipeline::{ReplyOrigin, Resolution, ResponsePipeline};
pub use session::{ChatSession, ExportOutcome, Turn};
