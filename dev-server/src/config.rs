use std::path::PathBuf;

use shared::AppConfig;
use thiserror::Error;

pub const PORT_VAR: &str = "FAMILYCOINS_PORT";
pub const STATIC_DIR_VAR: &str = "FAMILYCOINS_STATIC_DIR";
pub const ENTRY_PAGE_VAR: &str = "FAMILYCOINS_ENTRY_PAGE";
pub const API_BASE_URL_VAR: &str = "API_BASE_URL";

/// Path the frontend posts its log lines to
pub const LOG_ENDPOINT: &str = "/dev/logs";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a port number between 1 and 65535, got '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Settings of the static dev server, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct DevServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    /// Page served for `/` and `/index.html`
    pub entry_page: String,
    /// Configuration handed to the frontend through `/config.js`
    pub app: AppConfig,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            static_dir: PathBuf::from("frontend/dist"),
            entry_page: "login.html".to_string(),
            app: AppConfig {
                log_endpoint: Some(LOG_ENDPOINT.to_string()),
                ..AppConfig::default()
            },
        }
    }
}

impl DevServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from any variable source; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(PORT_VAR) {
            config.port = match value.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort { var: PORT_VAR, value }),
            };
        }
        if let Some(value) = lookup(STATIC_DIR_VAR) {
            config.static_dir = PathBuf::from(non_empty(STATIC_DIR_VAR, value)?);
        }
        if let Some(value) = lookup(ENTRY_PAGE_VAR) {
            config.entry_page = non_empty(ENTRY_PAGE_VAR, value)?;
        }
        if let Some(value) = lookup(API_BASE_URL_VAR) {
            config.app.api_base_url = non_empty(API_BASE_URL_VAR, value)?;
        }

        Ok(config)
    }

    pub fn entry_page_path(&self) -> PathBuf {
        self.static_dir.join(&self.entry_page)
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ConfigError::Empty { var })
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = DevServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.entry_page, "login.html");
        assert_eq!(config.app.api_base_url, "http://localhost:8000");
        assert_eq!(config.app.log_endpoint.as_deref(), Some("/dev/logs"));
        assert_eq!(config.entry_page_path(), PathBuf::from("frontend/dist/login.html"));
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = DevServerConfig::from_lookup(lookup_from(&[
            (PORT_VAR, "9090"),
            (STATIC_DIR_VAR, "/srv/familycoins"),
            (API_BASE_URL_VAR, "https://api.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.static_dir, PathBuf::from("/srv/familycoins"));
        assert_eq!(config.app.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_bad_values_name_the_variable() {
        let err = DevServerConfig::from_lookup(lookup_from(&[(PORT_VAR, "eighty")])).unwrap_err();
        assert!(err.to_string().starts_with("FAMILYCOINS_PORT"));

        let err = DevServerConfig::from_lookup(lookup_from(&[(PORT_VAR, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort { var: PORT_VAR, value: "0".to_string() });

        let err = DevServerConfig::from_lookup(lookup_from(&[(ENTRY_PAGE_VAR, "  ")])).unwrap_err();
        assert_eq!(err.to_string(), "FAMILYCOINS_ENTRY_PAGE must not be empty");
    }
}
