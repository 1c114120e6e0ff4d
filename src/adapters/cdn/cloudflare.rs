//! Cloudflare cache purge transport

use super::PurgeTransport;
use crate::config::CdnConfig;
use crate::domain::{CdnError, QuireError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Purges URLs through the Cloudflare zone purge API
///
/// Sends `DELETE {api_base_url}/zones/{zone_id}/purge_cache` with the URL
/// list as `{"files": [...]}`.
pub struct CloudflarePurger {
    client: Client,
    endpoint: String,
    email: String,
    config: CdnConfig,
}

#[derive(Debug, Deserialize)]
struct PurgeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

impl CloudflarePurger {
    /// Create a purger from configuration
    ///
    /// # Errors
    ///
    /// Returns [`CdnError::NotConfigured`] if the zone, email or token is
    /// missing, and a configuration error if the HTTP client cannot be built.
    pub fn new(config: CdnConfig) -> Result<Self> {
        let zone_id = config
            .zone_id
            .clone()
            .ok_or_else(|| CdnError::NotConfigured("cdn.zone_id is not set".to_string()))?;
        let email = config
            .email
            .clone()
            .ok_or_else(|| CdnError::NotConfigured("cdn.email is not set".to_string()))?;
        if config.token.is_none() {
            return Err(CdnError::NotConfigured("cdn.token is not set".to_string()).into());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| QuireError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/zones/{}/purge_cache",
            config.api_base_url.trim_end_matches('/'),
            zone_id
        );

        Ok(Self {
            client,
            endpoint,
            email,
            config,
        })
    }

    /// Purge endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PurgeTransport for CloudflarePurger {
    async fn purge(&self, urls: &[String]) -> Result<()> {
        let token = self
            .config
            .token
            .as_ref()
            .ok_or_else(|| CdnError::NotConfigured("cdn.token is not set".to_string()))?;

        tracing::debug!(endpoint = %self.endpoint, count = urls.len(), "Sending purge request");

        let resp = self
            .client
            .delete(&self.endpoint)
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", token.expose_secret().as_ref())
            .json(&json!({ "files": urls }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CdnError::Timeout(e.to_string())
                } else {
                    CdnError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(CdnError::Rejected {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        // A 2xx body that does not parse counts as success
        if let Ok(parsed) = serde_json::from_str::<PurgeResponse>(&body) {
            if !parsed.success {
                return Err(CdnError::Unsuccessful(
                    serde_json::Value::from(parsed.errors).to_string(),
                )
                .into());
            }
        }

        Ok(())
    }
}
