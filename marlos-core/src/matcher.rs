//! Local matcher: resolves a message against the knowledge base.
//!
//! A miss is an ordinary outcome (`None`), not an error; the caller moves on
//! to the remote resolver. A hit waits the configured compose delay before
//! returning, so canned answers do not appear instantaneously.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::MatcherConfig;
use crate::knowledge::KnowledgeBase;
use crate::normalize::normalize;

/// Default pause before a local answer is returned.
pub const DEFAULT_COMPOSE_DELAY: Duration = Duration::from_millis(650);

/// Knowledge-base matcher with a simulated compose delay.
#[derive(Debug, Clone)]
pub struct LocalMatcher {
    kb: Arc<KnowledgeBase>,
    compose_delay: Duration,
}

impl LocalMatcher {
    /// Create a matcher over `kb`.
    #[must_use]
    pub fn new(kb: Arc<KnowledgeBase>, compose_delay: Duration) -> Self {
        Self { kb, compose_delay }
    }

    /// Create a matcher from the `[matcher]` config section.
    #[must_use]
    pub fn from_config(kb: Arc<KnowledgeBase>, config: &MatcherConfig) -> Self {
        Self::new(kb, config.compose_delay())
    }

    /// The knowledge base being matched against.
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// The configured compose delay.
    #[must_use]
    pub fn compose_delay(&self) -> Duration {
        self.compose_delay
    }

    /// Synchronous lookup without the compose delay.
    #[must_use]
    pub fn find(&self, message: &str) -> Option<&str> {
        let folded = normalize(message);
        self.kb.lookup(&folded).map(|hit| hit.reply)
    }

    /// Resolve `message` locally.
    ///
    /// Returns the reply of the first matching entry after the compose
    /// delay, or `None` immediately when nothing matches.
    pub async fn resolve(&self, message: &str) -> Option<String> {
        let folded = normalize(message);
        let hit = self.kb.lookup(&folded)?;
        debug!(entry = hit.index, key = hit.key, "Knowledge base hit");
        let reply = hit.reply.to_string();

        if !self.compose_delay.is_zero() {
            tokio::time::sleep(self.compose_delay).await;
        }
        Some(reply)
    }
}

impl Default for LocalMatcher {
    fn default() -> Self {
        Self::new(Arc::new(KnowledgeBase::builtin()), DEFAULT_COMPOSE_DELAY)
    }
}
