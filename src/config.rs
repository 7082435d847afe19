use anyhow::{anyhow, Context, Result};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.tosspayments.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration. Constructed once and passed into the client;
/// the library holds no other state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret key for payment operations.
    pub secret_key: String,
    /// Secret key for recurring-billing operations. The provider issues
    /// separate credentials for billing authorization; when none is set
    /// the standard key is used.
    pub billing_secret_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Config {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            billing_secret_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_billing_secret_key(mut self, key: impl Into<String>) -> Self {
        self.billing_secret_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build configuration from environment variables: `TOSS_SECRET_KEY`
    /// (required), `TOSS_BILLING_SECRET_KEY`, `TOSS_BASE_URL`,
    /// `TOSS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let secret_key = env::var("TOSS_SECRET_KEY").context("TOSS_SECRET_KEY not set")?;

        let billing_secret_key = env::var("TOSS_BILLING_SECRET_KEY").ok();

        let base_url =
            env::var("TOSS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("TOSS_TIMEOUT_SECS")
            .ok()
            .map(|s| s.parse().context("TOSS_TIMEOUT_SECS must be a valid number"))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Config {
            secret_key,
            billing_secret_key,
            base_url,
            timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            return Err(anyhow!("secret key cannot be empty"));
        }

        if let Some(billing_key) = &self.billing_secret_key {
            if billing_key.trim().is_empty() {
                return Err(anyhow!("billing secret key cannot be empty when set"));
            }
        }

        if self.base_url.trim().is_empty() {
            return Err(anyhow!("base URL cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout must be greater than 0 seconds"));
        }

        Ok(())
    }

    /// The key for the given slot; billing falls back to the standard key.
    pub fn billing_key_or_default(&self) -> &str {
        self.billing_secret_key.as_deref().unwrap_or(&self.secret_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_live_api() {
        let config = Config::new("sk_test_abc");
        assert_eq!(config.base_url, "https://api.tosspayments.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_secret_key_fails_validation() {
        let config = Config::new("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn billing_key_falls_back_to_standard() {
        let config = Config::new("sk_test_abc");
        assert_eq!(config.billing_key_or_default(), "sk_test_abc");

        let config = config.with_billing_secret_key("sk_billing");
        assert_eq!(config.billing_key_or_default(), "sk_billing");
    }

    #[test]
    fn empty_billing_key_fails_validation() {
        let config = Config::new("sk_test_abc").with_billing_secret_key("");
        assert!(config.validate().is_err());
    }
}
