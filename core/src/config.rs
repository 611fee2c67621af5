//! Credential resolution and the adapter's immutable configuration.
//!
//! # Design
//! Credentials are resolved exactly once, when the adapter is constructed.
//! A missing API key or base endpoint is reported as
//! `ApiError::Configuration` before any request can be built, and the
//! resulting `ClientConfig` never changes afterwards.

use std::collections::HashMap;
use std::fmt;

use tracing::error;

use crate::error::ApiError;

/// Domain used to build the base endpoint from a subdomain and port.
pub const PROVIDER_DOMAIN: &str = "unipile.com";

/// Credential key names accepted for the API key, in priority order.
pub const API_KEY_NAMES: [&str; 3] = ["api_key", "API_KEY", "apiKey"];

/// Source of raw credential values.
pub trait CredentialProvider {
    fn credentials(&self) -> Result<HashMap<String, String>, ApiError>;
}

/// Credentials held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(pub HashMap<String, String>);

impl StaticCredentials {
    pub fn new<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<HashMap<String, String>, ApiError> {
        Ok(self.0.clone())
    }
}

/// Credentials read from `UNIPILE_*` environment variables.
///
/// | Variable            | Credential key |
/// |---------------------|----------------|
/// | `UNIPILE_API_KEY`   | `api_key`      |
/// | `UNIPILE_BASE_URL`  | `base_url`     |
/// | `UNIPILE_SUBDOMAIN` | `subdomain`    |
/// | `UNIPILE_PORT`      | `port`         |
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

const ENV_VARS: [(&str, &str); 4] = [
    ("UNIPILE_API_KEY", "api_key"),
    ("UNIPILE_BASE_URL", "base_url"),
    ("UNIPILE_SUBDOMAIN", "subdomain"),
    ("UNIPILE_PORT", "port"),
];

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<HashMap<String, String>, ApiError> {
        Ok(ENV_VARS
            .iter()
            .filter_map(|(var, key)| std::env::var(var).ok().map(|value| (key.to_string(), value)))
            .collect())
    }
}

/// An API key that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Resolved base endpoint and API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: ApiKey,
}

impl ClientConfig {
    pub fn new(base_url: &str, api_key: ApiKey) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Resolve a config from a raw credential map.
    ///
    /// The API key comes from the first non-empty of [`API_KEY_NAMES`]. The
    /// base endpoint is `base_url` when present, otherwise
    /// `https://{subdomain}.unipile.com:{port}`.
    pub fn from_credentials(credentials: &HashMap<String, String>) -> Result<Self, ApiError> {
        let api_key = API_KEY_NAMES.iter().find_map(|name| non_empty(credentials, name)).ok_or_else(|| {
            error!("API key not found in credentials");
            ApiError::configuration(format!(
                "credentials must include an API key under one of {API_KEY_NAMES:?}"
            ))
        })?;

        let base_url = match non_empty(credentials, "base_url") {
            Some(url) => url.to_string(),
            None => match (non_empty(credentials, "subdomain"), non_empty(credentials, "port")) {
                (Some(subdomain), Some(port)) => format!("https://{subdomain}.{PROVIDER_DOMAIN}:{port}"),
                _ => {
                    error!("missing 'subdomain' or 'port' in credentials");
                    return Err(ApiError::configuration(
                        "credentials must include 'base_url' or both 'subdomain' and 'port'",
                    ));
                }
            },
        };

        Ok(Self::new(&base_url, ApiKey::new(api_key)))
    }

    pub fn from_provider(provider: &dyn CredentialProvider) -> Result<Self, ApiError> {
        Self::from_credentials(&provider.credentials()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}

fn non_empty<'a>(credentials: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    credentials.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        StaticCredentials::new(pairs.iter().copied()).0
    }

    #[test]
    fn builds_base_url_from_subdomain_and_port() {
        let config =
            ClientConfig::from_credentials(&creds(&[("api_key", "k"), ("subdomain", "api8"), ("port", "13851")]))
                .unwrap();
        assert_eq!(config.base_url(), "https://api8.unipile.com:13851");
        assert_eq!(config.api_key().expose(), "k");
    }

    #[test]
    fn explicit_base_url_wins_and_loses_trailing_slash() {
        let config = ClientConfig::from_credentials(&creds(&[
            ("apiKey", "k"),
            ("base_url", "http://127.0.0.1:9000/"),
            ("subdomain", "ignored"),
            ("port", "1"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn api_key_variants_in_priority_order() {
        let config = ClientConfig::from_credentials(&creds(&[
            ("API_KEY", "upper"),
            ("apiKey", "camel"),
            ("base_url", "http://h"),
        ]))
        .unwrap();
        assert_eq!(config.api_key().expose(), "upper");

        let config = ClientConfig::from_credentials(&creds(&[
            ("api_key", ""),
            ("apiKey", "camel"),
            ("base_url", "http://h"),
        ]))
        .unwrap();
        assert_eq!(config.api_key().expose(), "camel");
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let err = ClientConfig::from_credentials(&creds(&[("base_url", "http://h")])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration { .. }));
    }

    #[test]
    fn missing_port_is_configuration_error() {
        let err = ClientConfig::from_credentials(&creds(&[("api_key", "k"), ("subdomain", "api8")])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration { .. }));
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let config = ClientConfig::new("http://h", ApiKey::new("super-secret"));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn provider_errors_propagate() {
        struct Failing;
        impl CredentialProvider for Failing {
            fn credentials(&self) -> Result<HashMap<String, String>, ApiError> {
                Err(ApiError::Configuration {
                    message: "store unavailable".to_string(),
                })
            }
        }
        let err = ClientConfig::from_provider(&Failing).unwrap_err();
        assert!(err.to_string().contains("store unavailable"));
    }
}
