//! API configuration module.
//!
//! Configuration is layered:
//! 1. built-in defaults
//! 2. an optional TOML file named by `TALLY_CONFIG`
//! 3. `TALLY_*` environment variables (highest priority)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use tally_core::ReceiptLayout;

const DEV_JWT_SECRET: &str = "tally-dev-secret-change-in-production";

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Secret key for signing tokens
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// Header line of rendered receipts
    pub vendor_name: String,

    /// Last line of rendered receipts
    pub closing_line: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let layout = ReceiptLayout::default();
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_path: PathBuf::from("./tally.db"),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_lifetime_secs: 30 * 60,
            vendor_name: layout.vendor_name,
            closing_line: layout.closing_line,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the optional file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("TALLY_CONFIG") {
            Ok(path) => ApiConfig::from_file(Path::new(&path))?,
            Err(_) => ApiConfig::default(),
        };

        config.apply_env(|name| env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        ApiConfig::from_toml(&text)
    }

    /// Parses TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overrides fields from `TALLY_*` variables returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TALLY_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("TALLY_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TALLY_PORT".to_string()))?;
        }

        if let Some(path) = lookup("TALLY_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }

        if let Some(secret) = lookup("TALLY_JWT_SECRET") {
            self.jwt_secret = secret;
        }

        if let Some(lifetime) = lookup("TALLY_TOKEN_LIFETIME_SECS") {
            self.token_lifetime_secs = lifetime
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TALLY_TOKEN_LIFETIME_SECS".to_string()))?;
        }

        if let Some(name) = lookup("TALLY_VENDOR_NAME") {
            self.vendor_name = name;
        }

        if let Some(line) = lookup("TALLY_CLOSING_LINE") {
            self.closing_line = line;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("TALLY_JWT_SECRET".to_string()));
        }

        if self.token_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("TALLY_TOKEN_LIFETIME_SECS".to_string()));
        }

        Ok(())
    }

    /// True while the built-in development secret is in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// `host:port` to bind; host names are resolved by the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Text used by the receipt renderer.
    pub fn receipt_layout(&self) -> ReceiptLayout {
        ReceiptLayout {
            vendor_name: self.vendor_name.clone(),
            closing_line: self.closing_line.clone(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot read config file {path}: {reason}")]
    ReadFile { path: String, reason: String },

    #[error("Invalid config file: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();

        assert_eq!(config.port, 8000);
        assert_eq!(config.token_lifetime_secs, 1800);
        assert_eq!(config.receipt_layout(), ReceiptLayout::default());
        assert!(config.uses_dev_secret());
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ApiConfig::default();
        config
            .apply_env(lookup(&[
                ("TALLY_PORT", "9000"),
                ("TALLY_JWT_SECRET", "s3cret"),
                ("TALLY_VENDOR_NAME", "Corner Shop"),
            ]))
            .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.receipt_layout().vendor_name, "Corner Shop");
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = ApiConfig::default();
        let err = config.apply_env(lookup(&[("TALLY_PORT", "eighty")])).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue(ref name) if name == "TALLY_PORT"));
    }

    #[test]
    fn test_toml_file_with_env_on_top() {
        let mut config = ApiConfig::from_toml(
            r#"
            port = 8100
            database_path = "/var/lib/tally/tally.db"
            closing_line = "Thanks!"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 8100);
        assert_eq!(config.host, "0.0.0.0");

        config.apply_env(lookup(&[("TALLY_PORT", "8200")])).unwrap();
        assert_eq!(config.port, 8200);
        assert_eq!(config.closing_line, "Thanks!");
    }

    #[test]
    fn test_validation() {
        let config = ApiConfig {
            token_lifetime_secs: 0,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            jwt_secret: String::new(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingRequired(_))));
    }
}
