//! CDN cache purge transport
//!
//! The export pipeline only depends on [`PurgeTransport`]; the Cloudflare
//! implementation is the one shipped with the binary.

pub mod cloudflare;

use crate::domain::Result;
use async_trait::async_trait;

pub use cloudflare::CloudflarePurger;

/// Sends one bulk purge request for a set of public URLs
#[async_trait]
pub trait PurgeTransport: Send + Sync {
    /// Purge every URL in `urls` in a single request
    async fn purge(&self, urls: &[String]) -> Result<()>;
}
