//! Response pipeline: knowledge base first, remote endpoint second.

use std::sync::Arc;

use tracing::{debug, info};

use marlos_core::config::MarlosConfig;
use marlos_core::knowledge::KnowledgeBase;
use marlos_core::{ApiSettings, LocalMatcher};
use marlos_llm::{RemoteResolver, ReplySource, ResolveError};

use crate::error::Result;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOrigin {
    /// Canned reply from the local knowledge base.
    Knowledge,
    /// The remote resolver (including its fixed advisories).
    Remote(ReplySource),
}

/// A resolved reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Text to display and persist.
    pub text: String,
    /// Which stage produced it.
    pub origin: ReplyOrigin,
}

/// Matcher → resolver chain.
#[derive(Debug, Clone)]
pub struct ResponsePipeline {
    matcher: LocalMatcher,
    resolver: RemoteResolver,
}

impl ResponsePipeline {
    /// Chain `matcher` in front of `resolver`.
    #[must_use]
    pub fn new(matcher: LocalMatcher, resolver: RemoteResolver) -> Self {
        Self { matcher, resolver }
    }

    /// Build from configuration, loading `matcher.knowledge_path` when set.
    ///
    /// # Errors
    /// Returns an error if the knowledge file cannot be read or validated.
    pub fn from_config(config: &MarlosConfig) -> Result<Self> {
        let kb = match &config.matcher.knowledge_path {
            Some(path) => {
                let kb = KnowledgeBase::from_file(path)?;
                info!(path = %path.display(), entries = kb.len(), "Loaded knowledge base");
                kb
            }
            None => KnowledgeBase::builtin(),
        };
        let matcher = LocalMatcher::from_config(Arc::new(kb), &config.matcher);
        let resolver = RemoteResolver::new(config.remote.clone());
        Ok(Self::new(matcher, resolver))
    }

    /// The local matcher.
    #[must_use]
    pub fn matcher(&self) -> &LocalMatcher {
        &self.matcher
    }

    /// The remote resolver.
    #[must_use]
    pub fn resolver(&self) -> &RemoteResolver {
        &self.resolver
    }

    /// Resolve `message` using `settings` as the remote snapshot.
    ///
    /// # Errors
    /// Any [`ResolveError`] from the remote stage. A local hit never fails.
    pub async fn respond(
        &self,
        message: &str,
        settings: &ApiSettings,
    ) -> std::result::Result<Resolution, ResolveError> {
        if let Some(text) = self.matcher.resolve(message).await {
            return Ok(Resolution {
                text,
                origin: ReplyOrigin::Knowledge,
            });
        }

        debug!("No knowledge base match, trying remote endpoint");
        let reply = self.resolver.resolve(message, settings).await?;
        Ok(Resolution {
            text: reply.text,
            origin: ReplyOrigin::Remote(reply.source),
        })
    }
}
