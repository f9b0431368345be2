//! Core types for remote resolution results.

/// Returned instead of calling out when URL, host or key is missing.
pub const LOCAL_MODE_ADVISORY: &str = "Estoy funcionando en modo local (Marlos). Para respuestas extendidas configura tu API en Extras → Ajustes de API.";

/// Returned when the endpoint answered with JSON that held no usable text.
pub const EMPTY_REPLY_ADVISORY: &str = "La API respondió sin texto interpretable. Revisa la configuración de mapeo o el endpoint.";

/// How a [`RemoteReply`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Settings were incomplete; no request was made.
    GuardSkipped,
    /// Text pulled out of a JSON body.
    Extracted,
    /// Body was not JSON; its raw text is the reply.
    RawText,
    /// JSON body parsed, but nothing extractable was in it.
    EmptyReply,
}

/// A reply string ready to display and persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReply {
    /// The text to show.
    pub text: String,
    /// Where it came from.
    pub source: ReplySource,
}

impl RemoteReply {
    /// The local-mode advisory.
    #[must_use]
    pub fn local_mode() -> Self {
        Self {
            text: LOCAL_MODE_ADVISORY.to_string(),
            source: ReplySource::GuardSkipped,
        }
    }

    /// The no-extractable-text advisory.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            text: EMPTY_REPLY_ADVISORY.to_string(),
            source: ReplySource::EmptyReply,
        }
    }

    /// Whether the text came from the endpoint rather than a fixed advisory.
    #[must_use]
    pub fn is_from_endpoint(&self) -> bool {
        matches!(self.source, ReplySource::Extracted | ReplySource::RawText)
    }
}
