//! # marlos-llm — Remote Completion Resolver for Marlos
//!
//! When the local knowledge base has no answer, the message goes to a
//! user-configured completion endpoint (typically a RapidAPI-hosted model):
//!
//!   - **Guard** — incomplete settings short-circuit to a local-mode advisory
//!   - **Request** — one POST, message under `prompt`, `msg` and `input`
//!   - **Timeout** — the exchange is cancelled after a fixed bound
//!   - **Extraction** — reply text is sniffed out of whatever JSON comes back
//!
//! # Response handling
//!
//! ```text
//! non-2xx ──────────────► ResolveError::Http { status, detail }
//! 2xx + JSON ───────────► extract_reply ──"" ──► advisory text
//! 2xx + text ───────────► verbatim
//! 2xx + empty ──────────► ResolveError::Unparsable
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod payload;
pub mod types;

pub use client::RemoteResolver;
pub use error::ResolveError;
pub use extract::extract_reply;
pub use types::{RemoteReply, ReplySource};
