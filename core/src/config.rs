//! Client configuration with builder pattern.

use crate::error::ConfigError;
use crate::routes::Routes;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "RENTALS_API_URL";
/// Environment variable overriding the login entry point.
pub const LOGIN_PATH_ENV: &str = "RENTALS_LOGIN_PATH";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    login_path: String,
}

impl ClientConfig {
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Configuration from `RENTALS_API_URL` / `RENTALS_LOGIN_PATH`, falling
    /// back to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            builder = builder.with_base_url(url);
        }
        if let Ok(path) = std::env::var(LOGIN_PATH_ENV) {
            builder = builder.with_login_path(path);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn routes(&self) -> Routes {
        Routes::new(&self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    login_path: Option<String>,
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl { url: base_url });
        }

        let login_path = self
            .login_path
            .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());
        if !login_path.starts_with('/') {
            return Err(ConfigError::InvalidLoginPath { path: login_path });
        }

        Ok(ClientConfig {
            base_url,
            login_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::builder().build().unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.login_path(), DEFAULT_LOGIN_PATH);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::builder()
            .with_base_url("https://api.example.com/")
            .build()
            .unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ClientConfig::builder().with_base_url("ftp://x").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_relative_login_path() {
        let err = ClientConfig::builder().with_login_path("auth/login").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLoginPath { .. }));
    }

    // The only test touching these variables; kept in one body so the steps
    // cannot interleave.
    #[test]
    fn from_env_overrides_and_validates() {
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(LOGIN_PATH_ENV);
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.login_path(), DEFAULT_LOGIN_PATH);

        std::env::set_var(BASE_URL_ENV, "https://rentals.example.com/");
        std::env::set_var(LOGIN_PATH_ENV, "/signin");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url(), "https://rentals.example.com");
        assert_eq!(config.login_path(), "/signin");
        assert_eq!(
            config.routes().auth_me(),
            "https://rentals.example.com/api/auth/me"
        );

        std::env::set_var(BASE_URL_ENV, "rentals.example.com");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(LOGIN_PATH_ENV);
    }
}
