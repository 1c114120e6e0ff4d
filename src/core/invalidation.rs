//! CDN cache invalidation
//!
//! After every watermark write the published URLs of the affected works and
//! of all shared catalog artifacts are purged in one request. Purge failures
//! are reported in the outcome and never fail the run: the artifacts are
//! already durably written.

use crate::adapters::cdn::{CloudflarePurger, PurgeTransport};
use crate::config::CdnConfig;
use crate::core::export::layout::CatalogArtifact;
use crate::domain::{Result, WorkTitle};
use std::fmt;
use std::sync::Arc;

/// What happened to an invalidation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationOutcome {
    /// No purge transport is configured
    Disabled,
    /// The purge request was accepted
    Purged { count: usize },
    /// The purge request failed
    Failed { error: String },
}

impl fmt::Display for InvalidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidationOutcome::Disabled => write!(f, "disabled"),
            InvalidationOutcome::Purged { count } => write!(f, "purged {count} URLs"),
            InvalidationOutcome::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// Builds purge URL sets and sends them through a transport
#[derive(Clone)]
pub struct CacheInvalidator {
    transport: Option<Arc<dyn PurgeTransport>>,
    base_url: String,
}

impl CacheInvalidator {
    /// Create an invalidator publishing under `{public_base_url}/{schema_version}`
    pub fn new(
        transport: Option<Arc<dyn PurgeTransport>>,
        public_base_url: &str,
        schema_version: u32,
    ) -> Self {
        Self {
            transport,
            base_url: format!("{}/{}", public_base_url.trim_end_matches('/'), schema_version),
        }
    }

    /// An invalidator that never purges
    pub fn disabled() -> Self {
        Self {
            transport: None,
            base_url: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Public URLs made stale by republishing `titles`
    ///
    /// One archive and one index document per title, then every shared
    /// catalog artifact.
    pub fn purge_urls(&self, titles: &[WorkTitle]) -> Vec<String> {
        let mut urls = Vec::with_capacity(titles.len() * 2 + CatalogArtifact::ALL.len());
        for title in titles {
            urls.push(format!("{}/{}", self.base_url, title.archive_name()));
            urls.push(format!("{}/{}", self.base_url, title.index_document_name()));
        }
        for artifact in CatalogArtifact::ALL {
            urls.push(format!("{}/{}", self.base_url, artifact.file_name()));
        }
        urls
    }

    /// Purge the URLs of `titles` plus the shared artifacts
    pub async fn invalidate(&self, titles: &[WorkTitle]) -> InvalidationOutcome {
        let Some(transport) = &self.transport else {
            tracing::debug!("Cache invalidation disabled");
            return InvalidationOutcome::Disabled;
        };

        let urls = self.purge_urls(titles);
        match transport.purge(&urls).await {
            Ok(()) => {
                tracing::info!(titles = titles.len(), urls = urls.len(), "Purged CDN cache");
                InvalidationOutcome::Purged { count: urls.len() }
            }
            Err(e) => {
                tracing::warn!(titles = titles.len(), error = %e, "CDN cache purge failed");
                InvalidationOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Purge transport for a CDN configuration, `None` when purging is disabled
///
/// # Errors
///
/// Fails when purging is enabled but the credentials are incomplete.
pub fn purger_from_config(config: &CdnConfig) -> Result<Option<Arc<dyn PurgeTransport>>> {
    if !config.enabled {
        return Ok(None);
    }
    let purger: Arc<dyn PurgeTransport> = Arc::new(CloudflarePurger::new(config.clone())?);
    Ok(Some(purger))
}
