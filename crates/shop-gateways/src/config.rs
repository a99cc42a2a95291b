//! # Mail Relay Configuration
//!
//! Credentials for the order confirmation relay.
//! Everything is read from the environment; nothing is hard-coded.

use std::env;
use std::time::Duration;

/// Default relay request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Mail relay configuration
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    /// Relay endpoint that accepts `POST` JSON messages
    pub relay_url: Option<String>,

    /// Sender address, also the relay account name
    pub sender: Option<String>,

    /// Relay secret, sent as bearer token and used to sign requests
    pub secret: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `MAIL_RELAY_URL`
    /// - `MAIL_USER` (or `EMAIL_USER`)
    /// - `MAIL_PASS` (or `EMAIL_PASS`)
    /// - `MAIL_TIMEOUT_SECS` (default 10)
    ///
    /// Missing values leave the mailer unconfigured rather than failing.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let timeout = env::var("MAIL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            relay_url: non_blank_var(&["MAIL_RELAY_URL"]),
            sender: non_blank_var(&["MAIL_USER", "EMAIL_USER"]),
            secret: non_blank_var(&["MAIL_PASS", "EMAIL_PASS"]),
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        relay_url: impl Into<String>,
        sender: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            relay_url: Some(relay_url.into()),
            sender: Some(sender.into()),
            secret: Some(secret.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builder: set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True when relay URL, sender and secret are all present
    pub fn is_configured(&self) -> bool {
        self.relay_url.is_some() && self.sender.is_some() && self.secret.is_some()
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> Option<String> {
        self.secret.as_ref().map(|s| format!("Bearer {}", s))
    }
}

// First set, non-blank variable among `names`
fn non_blank_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
