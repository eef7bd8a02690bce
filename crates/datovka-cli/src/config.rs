//! Configuration system for the Datovka CLI.

use datovka_core::endpoint::{CertificateMode, Environment};
use datovka_core::{MAX_RECIPIENTS, MAX_TOTAL_SIZE_BYTES, ValidationLimits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Datovka CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Service connection configuration
    #[serde(default)]
    pub client: ClientConfig,
    /// Message limits
    #[serde(default)]
    pub limits: ValidationLimits,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Service connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Target environment ("test" or "production")
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Login mode ("password", "certificate" or "hosted")
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

const AUTH_MODES: [&str; 3] = ["password", "certificate", "hosted"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn default_environment() -> String {
    "production".to_string()
}

fn default_auth_mode() -> String {
    "password".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            auth_mode: default_auth_mode(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("datovka/config.toml")
    }

    /// Load config from default path, or create default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if reading or creating the config fails.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            let config = Self::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Parse the configured environment
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown environment name.
    pub fn environment(&self) -> anyhow::Result<Environment> {
        self.client
            .environment
            .parse()
            .map_err(|err: String| anyhow::anyhow!(err))
    }

    /// Certificate mode implied by the configured login, `None` for password login
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown auth mode.
    pub fn certificate_mode(&self) -> anyhow::Result<Option<CertificateMode>> {
        parse_auth_mode(&self.client.auth_mode)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.environment()?;
        self.certificate_mode()?;

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.limits.max_total_size_bytes == 0
            || self.limits.max_total_size_bytes > MAX_TOTAL_SIZE_BYTES
        {
            anyhow::bail!(
                "Maximum total size must be between 1 and {} bytes",
                MAX_TOTAL_SIZE_BYTES
            );
        }

        if self.limits.max_recipients == 0 || self.limits.max_recipients > MAX_RECIPIENTS {
            anyhow::bail!(
                "Maximum recipients must be between 1 and {}",
                MAX_RECIPIENTS
            );
        }

        Ok(())
    }
}

/// Map an auth mode name to its certificate mode
///
/// # Errors
///
/// Returns an error for an unknown auth mode.
pub fn parse_auth_mode(mode: &str) -> anyhow::Result<Option<CertificateMode>> {
    match mode.to_lowercase().as_str() {
        "password" => Ok(None),
        "certificate" => Ok(Some(CertificateMode::FilingService)),
        "hosted" => Ok(Some(CertificateMode::HostedFilingService)),
        other => anyhow::bail!(
            "Invalid auth mode: {}. Must be one of: {}",
            other,
            AUTH_MODES.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.environment, "production");
        assert_eq!(config.client.auth_mode, "password");
        assert_eq!(config.limits, ValidationLimits::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.client.environment = "staging".to_string();
        assert!(config.validate().is_err());

        config.client.environment = "test".to_string();
        config.client.auth_mode = "token".to_string();
        assert!(config.validate().is_err());

        config.client.auth_mode = "hosted".to_string();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        config.limits.max_total_size_bytes = MAX_TOTAL_SIZE_BYTES + 1;
        assert!(config.validate().is_err());

        config.limits.max_total_size_bytes = 1024;
        config.limits.max_recipients = 0;
        assert!(config.validate().is_err());

        config.limits.max_recipients = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auth_modes() {
        assert_eq!(parse_auth_mode("password").unwrap(), None);
        assert_eq!(
            parse_auth_mode("certificate").unwrap(),
            Some(CertificateMode::FilingService)
        );
        assert_eq!(
            parse_auth_mode("Hosted").unwrap(),
            Some(CertificateMode::HostedFilingService)
        );
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [client]
            environment = "test"

            [limits]
            max_total_size_bytes = 4096
            "#,
        )
        .unwrap();

        assert_eq!(config.environment().unwrap(), Environment::Test);
        assert_eq!(config.client.auth_mode, "password");
        assert_eq!(config.limits.max_total_size_bytes, 4096);
        assert_eq!(config.limits.max_recipients, MAX_RECIPIENTS);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.client.environment = "test".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.client.environment, "test");
        assert_eq!(loaded.limits, config.limits);
    }
}
