use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the incident API, e.g. `http://localhost:8081/api/angular`.
    pub api_base_url: String,
    /// Cadence of the background notification poll.
    pub poll_interval: Duration,
    /// Per-request timeout applied to the HTTP client.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env("API_BASE_URL", "http://localhost:8081/api/angular");
        let poll_interval = humantime::parse_duration(&env("POLL_INTERVAL", "30s"))
            .context("POLL_INTERVAL parse")?;
        let request_timeout = humantime::parse_duration(&env("REQUEST_TIMEOUT", "10s"))
            .context("REQUEST_TIMEOUT parse")?;

        let cfg = Self {
            api_base_url,
            poll_interval,
            request_timeout,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            anyhow::bail!("API_BASE_URL cannot be empty");
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            anyhow::bail!("API_BASE_URL must be an http(s) URL: {}", self.api_base_url);
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("POLL_INTERVAL cannot be zero");
        }
        Ok(())
    }
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            api_base_url: "http://localhost:8081/api/angular".to_string(),
            poll_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut cfg = base();
        cfg.api_base_url = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut cfg = base();
        cfg.api_base_url = "ftp://example.com".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut cfg = base();
        cfg.poll_interval = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }
}
