//! Client configuration, read from the environment.

use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "ASSETDESK_API_URL";
pub const ENV_AUTH_TOKEN: &str = "ASSETDESK_AUTH_TOKEN";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ASSETDESK_REQUEST_TIMEOUT_SECS";
pub const ENV_SUBMIT_TIMEOUT_SECS: &str = "ASSETDESK_SUBMIT_TIMEOUT_SECS";

/// Where the API lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Bearer token forwarded on every request, if any.
    pub auth_token: Option<String>,
    /// Per-request timeout of the HTTP client.
    pub request_timeout: Duration,
    /// Upper bound for a whole form submission. `None` lets a hung save keep
    /// the form loading.
    pub submit_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            submit_timeout: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Read `ASSETDESK_*` variables, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let auth_token = lookup(ENV_AUTH_TOKEN).filter(|v| !v.trim().is_empty());

        let request_timeout = match lookup(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => parse_secs(&raw)
                .with_context(|| format!("invalid {ENV_REQUEST_TIMEOUT_SECS}: {raw:?}"))?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let submit_timeout = lookup(ENV_SUBMIT_TIMEOUT_SECS)
            .map(|raw| {
                parse_secs(&raw).with_context(|| format!("invalid {ENV_SUBMIT_TIMEOUT_SECS}: {raw:?}"))
            })
            .transpose()?;

        if auth_token.is_some() {
            tracing::info!(api_url = %api_url, "client configured with authentication token");
        } else {
            tracing::info!(api_url = %api_url, "client configured without authentication token");
        }

        Ok(Self {
            api_url,
            auth_token,
            request_timeout,
            submit_timeout,
        })
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn parse_secs(raw: &str) -> anyhow::Result<Duration> {
    let secs: u64 = raw.trim().parse().context("expected a whole number of seconds")?;
    anyhow::ensure!(secs > 0, "timeout must be positive");
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://desk.example/api/"),
            (ENV_AUTH_TOKEN, "secret"),
            (ENV_REQUEST_TIMEOUT_SECS, "5"),
            (ENV_SUBMIT_TIMEOUT_SECS, "60"),
        ]))
        .unwrap();

        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.submit_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.endpoint("/bookings"), "https://desk.example/api/bookings");
    }

    #[test]
    fn rejects_bad_timeouts() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_REQUEST_TIMEOUT_SECS));
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_SUBMIT_TIMEOUT_SECS, "0")])).is_err());
    }
}
