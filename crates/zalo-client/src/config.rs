//! Configuration types for zalo-client.

use std::env;

use crate::error::ZaloError;

/// Default Zalo Bot API base URL.
pub const DEFAULT_API_BASE: &str = "https://bot-api.zaloplatforms.com";

/// Bot credentials, endpoint and webhook secret.
#[derive(Clone)]
pub struct ZaloConfig {
    /// Base URL of the Bot API.
    pub api_base: String,
    /// Bot token.
    pub token: String,
    /// Value the platform sends in `X-ZaloOA-Secret` on every webhook call.
    pub secret_token: String,
}

impl ZaloConfig {
    /// Create a configuration for the public Bot API.
    pub fn new(token: impl Into<String>, secret_token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            secret_token: secret_token.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ZALO_BOT_TOKEN` | Bot token | (required) |
    /// | `ZALO_SECRET_TOKEN` | Webhook secret | (required) |
    /// | `ZALO_API_URL` | Bot API base URL | `https://bot-api.zaloplatforms.com` |
    pub fn from_env() -> Result<Self, ZaloError> {
        let token = env::var("ZALO_BOT_TOKEN")
            .map_err(|_| ZaloError::Config("ZALO_BOT_TOKEN is required".to_string()))?;
        let secret = env::var("ZALO_SECRET_TOKEN")
            .map_err(|_| ZaloError::Config("ZALO_SECRET_TOKEN is required".to_string()))?;
        let mut config = Self::new(token, secret);
        if let Ok(base) = env::var("ZALO_API_URL") {
            config.api_base = base;
        }
        Ok(config)
    }

    /// Override the API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Whether a webhook secret header matches the configured one.
    pub fn verify_secret(&self, header: Option<&str>) -> bool {
        !self.secret_token.is_empty() && header == Some(self.secret_token.as_str())
    }
}

impl std::fmt::Debug for ZaloConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZaloConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .field("secret_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let config = ZaloConfig::new("abc", "s3cret");
        assert_eq!(
            config.method_url("sendMessage"),
            "https://bot-api.zaloplatforms.com/botabc/sendMessage"
        );
    }

    #[test]
    fn test_verify_secret() {
        let config = ZaloConfig::new("abc", "s3cret");
        assert!(config.verify_secret(Some("s3cret")));
        assert!(!config.verify_secret(Some("wrong")));
        assert!(!config.verify_secret(None));

        let unset = ZaloConfig::new("abc", "");
        assert!(!unset.verify_secret(Some("")));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", ZaloConfig::new("tok-123", "sec-456"));
        assert!(!rendered.contains("tok-123"));
        assert!(!rendered.contains("sec-456"));
    }
}
