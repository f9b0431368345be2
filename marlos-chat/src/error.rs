//! Chat session error types.

use thiserror::Error;

/// Errors surfaced by the chat session.
///
/// Remote failures are not here: the session turns them into a fallback
/// reply plus a [`crate::Notice`]. What remains are local failures the
/// conversation cannot absorb.
#[derive(Debug, Error)]
pub enum ChatError {
    /// History or settings store failure, or invalid local configuration.
    #[error(transparent)]
    Core(#[from] marlos_core::MarlosError),

    /// A remote failure outside a chat turn.
    #[error(transparent)]
    Remote(#[from] marlos_llm::ResolveError),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ChatError>;
