//! Configuration management for the dripsend server.
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::Context;
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Shared site password gating the API.
    pub site_password: String,
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// SMTP relay host.
    pub smtp_relay: String,
    /// SMTP relay port (STARTTLS).
    pub smtp_port: u16,
    /// Dispatch queue API base URL.
    pub qstash_url: String,
    /// Dispatch queue bearer token.
    pub qstash_token: String,
    /// Current signing key for inbound dispatch callbacks.
    pub signing_key_current: String,
    /// Next signing key, accepted during key rotation.
    pub signing_key_next: Option<String>,
    /// Public base URL used to build callback URLs.
    pub base_url: Option<String>,
    /// Whether session cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable (`DRIPSEND_PASSWORD`,
    /// `QSTASH_TOKEN`, `QSTASH_CURRENT_SIGNING_KEY`) is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            site_password: env::var("DRIPSEND_PASSWORD")
                .context("DRIPSEND_PASSWORD must be set")?,
            bind_addr: env::var("DRIPSEND_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            smtp_relay: env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            qstash_url: env::var("QSTASH_URL")
                .unwrap_or_else(|_| "https://qstash.upstash.io".to_string()),
            qstash_token: env::var("QSTASH_TOKEN").context("QSTASH_TOKEN must be set")?,
            signing_key_current: env::var("QSTASH_CURRENT_SIGNING_KEY")
                .context("QSTASH_CURRENT_SIGNING_KEY must be set")?,
            signing_key_next: env::var("QSTASH_NEXT_SIGNING_KEY").ok(),
            base_url: env::var("APP_BASE_URL").ok().filter(|v| !v.trim().is_empty()),
            secure_cookies: env::var("DRIPSEND_SECURE_COOKIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        })
    }
}
