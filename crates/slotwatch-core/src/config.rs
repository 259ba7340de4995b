//! Configuration management for slotwatch.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The configuration is loaded once at
//! startup and passed explicitly to each component; nothing reads it from
//! ambient state afterwards.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// Loaded from `~/.config/slotwatch/config.toml` (or platform equivalent),
/// or from an explicit path given on the command line. Missing sections and
/// fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Telegram notification settings
    pub telegram: TelegramConfig,
    /// CAPTCHA solving service settings
    pub captcha: CaptchaConfig,
    /// Booking portal credentials and URLs
    pub portal: PortalConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Poll loop timing settings
    pub poll: PollConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults
    /// if the file does not exist.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here: a user
    /// who pointed at a specific file wants that file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SLOTWATCH_TELEGRAM_ENABLED`: Override telegram notifications (true/false)
    /// - `SLOTWATCH_CAPTCHA_KEY`: Override the solving-service API key
    /// - `SLOTWATCH_PORTAL_PASSWORD`: Override the portal password
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply supported environment variable overrides in place.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("SLOTWATCH_TELEGRAM_ENABLED") {
            if let Ok(enabled) = val.parse() {
                self.telegram.enabled = enabled;
                tracing::debug!("Override telegram.enabled from env: {}", enabled);
            }
        }

        if let Ok(val) = std::env::var("SLOTWATCH_CAPTCHA_KEY") {
            self.captcha.api_key = val;
            tracing::debug!("Override captcha.api_key from env");
        }

        if let Ok(val) = std::env::var("SLOTWATCH_PORTAL_PASSWORD") {
            self.portal.password = val;
            tracing::debug!("Override portal.password from env");
        }
    }

    /// Validate the configuration, rejecting values the watcher cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        fn required(field: &str, value: &str) -> ConfigResult<()> {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            Ok(())
        }

        required("portal.user_id", &self.portal.user_id)?;
        required("portal.password", &self.portal.password)?;
        required("portal.login_url", &self.portal.login_url)?;
        required("portal.booking_url", &self.portal.booking_url)?;
        required("portal.course_value", &self.portal.course_value)?;
        required("captcha.api_key", &self.captcha.api_key)?;

        if self.telegram.enabled {
            required("telegram.bot_key", &self.telegram.bot_key)?;
            required("telegram.chat_id", &self.telegram.chat_id)?;
        }

        if self.poll.min_delay_secs > self.poll.max_delay_secs {
            return Err(ConfigError::InvalidValue {
                field: "poll.min_delay_secs".to_string(),
                reason: format!(
                    "must not exceed poll.max_delay_secs ({} > {})",
                    self.poll.min_delay_secs, self.poll.max_delay_secs
                ),
            });
        }

        if self.captcha.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "captcha.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/slotwatch/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("io", "slotwatch", "slotwatch").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Telegram notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Whether notifications are sent at all
    pub enabled: bool,
    /// Bot token from @BotFather
    pub bot_key: String,
    /// Destination chat ID
    pub chat_id: String,
    /// Optional forum topic (thread) to post into
    pub thread_id: Option<i64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_key: String::new(),
            chat_id: String::new(),
            thread_id: None,
        }
    }
}

/// CAPTCHA solving service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptchaConfig {
    /// Solving-service API key
    pub api_key: String,
    /// Seconds between polls for a solved token
    pub poll_interval_secs: u64,
    /// Maximum number of polls before giving up
    pub max_attempts: u32,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            poll_interval_secs: 5,
            max_attempts: 24,
        }
    }
}

/// Booking portal credentials, URLs, and flow delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Portal account user ID
    pub user_id: String,
    /// Portal account password
    pub password: String,
    /// Login entry point URL
    pub login_url: String,
    /// Booking page URL (navigated to after login)
    pub booking_url: String,
    /// Value of the target course/group in the booking page dropdown
    pub course_value: String,
    /// Seconds to wait for the login modal to render after navigation
    pub modal_wait_secs: u64,
    /// Seconds to let the session settle after submitting login
    pub login_settle_secs: u64,
    /// Seconds to let the booking page settle after selecting the course
    pub select_settle_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            password: String::new(),
            login_url: String::new(),
            booking_url: "https://bookingportal.cdc.com.sg/NewPortal/Booking/BookingPL.aspx"
                .to_string(),
            course_value: String::new(),
            modal_wait_secs: 10,
            login_settle_secs: 5,
            select_settle_secs: 3,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Bounded wait for DOM elements to appear, in seconds
    pub element_timeout_secs: u64,
    /// Explicit Chrome/Chromium binary, autodetected when unset
    pub chrome_binary: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            window_width: 1600,
            window_height: 768,
            element_timeout_secs: 30,
            chrome_binary: None,
        }
    }
}

/// Poll loop timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Minimum seconds between cycles
    pub min_delay_secs: u64,
    /// Maximum seconds between cycles
    pub max_delay_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 15 * 60,
            max_delay_secs: 20 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.portal.user_id = "S1234567A".to_string();
        config.portal.password = "hunter2".to_string();
        config.portal.login_url = "https://portal.example.com/".to_string();
        config.portal.course_value = "3A".to_string();
        config.captcha.api_key = "abc123".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(!config.telegram.enabled);
        assert_eq!(config.captcha.poll_interval_secs, 5);
        assert_eq!(config.captcha.max_attempts, 24);
        assert_eq!(config.browser.window_width, 1600);
        assert_eq!(config.browser.window_height, 768);
        assert_eq!(config.poll.min_delay_secs, 900);
        assert_eq!(config.poll.max_delay_secs, 1200);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[telegram]"));
        assert!(toml_str.contains("[captcha]"));
        assert!(toml_str.contains("[portal]"));
        assert!(toml_str.contains("[poll]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.poll.min_delay_secs, config.poll.min_delay_secs);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[portal]
user_id = "S1234567A"
password = "hunter2"

[poll]
min_delay_secs = 60
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.portal.user_id, "S1234567A");
        assert_eq!(config.poll.min_delay_secs, 60);
        // These should be defaults
        assert_eq!(config.poll.max_delay_secs, 1200);
        assert_eq!(config.portal.modal_wait_secs, 10);
        assert!(config.portal.booking_url.contains("BookingPL.aspx"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("nope.toml");

        let result = AppConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[telegram]\nenabled = true\nbot_key = \"k\"\nchat_id = \"42\"\n")
            .expect("write config file");

        let config = AppConfig::load_from(&path).expect("load config");
        assert!(config.telegram.enabled);
        assert_eq!(config.telegram.chat_id, "42");
        assert_eq!(config.telegram.thread_id, None);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let mut config = valid_config();
        config.portal.user_id = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("portal.user_id"));
    }

    #[test]
    fn test_validate_rejects_telegram_without_key() {
        let mut config = valid_config();
        config.telegram.enabled = true;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("telegram.bot_key"));
    }

    #[test]
    fn test_validate_rejects_inverted_poll_range() {
        let mut config = valid_config();
        config.poll.min_delay_secs = 2000;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll.min_delay_secs"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = valid_config();
        std::env::set_var("SLOTWATCH_TELEGRAM_ENABLED", "true");
        std::env::set_var("SLOTWATCH_PORTAL_PASSWORD", "from-env");

        config.apply_env();

        assert!(config.telegram.enabled);
        assert_eq!(config.portal.password, "from-env");

        std::env::remove_var("SLOTWATCH_TELEGRAM_ENABLED");
        std::env::remove_var("SLOTWATCH_PORTAL_PASSWORD");
    }
}
