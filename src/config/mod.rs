use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

/// Config file compiled into the bundle. A browser build has no filesystem
/// to read it from at runtime.
const BUNDLED_CONFIG: &str = include_str!("../../miniapp.toml");

static ACTIVE: OnceLock<Config> = OnceLock::new();

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub bet: BetConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// Match data backend, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BetConfig {
    /// Recipient of the placeholder bet transaction.
    #[serde(default = "default_bet_destination")]
    pub destination: String,
    /// Bet value in the chain's native unit, as a decimal string.
    #[serde(default = "default_bet_amount")]
    pub amount_ether: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Public origin of the app, used for share links and notifications.
    #[serde(default = "default_app_url")]
    pub url: String,
    /// Shown when a match URL carries no `v` parameter.
    #[serde(default = "default_fallback_video")]
    pub fallback_video_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_url() -> String {
    "http://localhost:3001".to_string()
}
fn default_bet_destination() -> String {
    "0x000000000000000000000000000000000000dEaD".to_string()
}
fn default_bet_amount() -> String {
    "0.0001".to_string()
}
fn default_app_name() -> String {
    "Valorant Esports".to_string()
}
fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_fallback_video() -> String {
    "P4mz4bTXi8g".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
        }
    }
}

impl Default for BetConfig {
    fn default() -> Self {
        Self {
            destination: default_bet_destination(),
            amount_ether: default_bet_amount(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            url: default_app_url(),
            fallback_video_id: default_fallback_video(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            bet: BetConfig::default(),
            app: AppConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BetConfig {
    pub fn amount(&self) -> Result<Decimal, ConfigError> {
        Decimal::from_str(self.amount_ether.trim())
            .ok()
            .filter(|d| d.is_sign_positive() && !d.is_zero())
            .ok_or_else(|| ConfigError::Invalid {
                field: "bet.amount_ether",
                value: self.amount_ether.clone(),
            })
    }

    /// The destination, if it is a `0x`-prefixed 20-byte hex address.
    pub fn destination(&self) -> Result<&str, ConfigError> {
        let dest = self.destination.as_str();
        let is_address = dest.len() == 42
            && dest.starts_with("0x")
            && dest[2..].chars().all(|c| c.is_ascii_hexdigit());
        if !is_address {
            return Err(ConfigError::Invalid {
                field: "bet.destination",
                value: self.destination.clone(),
            });
        }
        Ok(dest)
    }
}

impl Config {
    /// Parse a TOML document, then overlay build-time environment.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(contents)?;
        config.apply_env(|key| env_override(key).map(str::to_string));
        config.validate()?;
        Ok(config)
    }

    /// Load the bundled `miniapp.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::parse(BUNDLED_CONFIG)
    }

    /// Defaults plus build-time environment, no file needed.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env_override(key).map(str::to_string))
    }

    /// Bet settings that fail validation fall back to the defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        config.apply_env(lookup);
        if let Err(e) = config.validate() {
            warn!(error = %e, "ignoring invalid bet settings from environment");
            config.bet = BetConfig::default();
        }
        config
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MINIAPP_API_URL") {
            self.api.base_url = url;
        }
        if let Some(dest) = lookup("MINIAPP_BET_DESTINATION") {
            self.bet.destination = dest;
        }
        if let Some(level) = lookup("MINIAPP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(url) = lookup("MINIAPP_APP_URL") {
            self.app.url = url;
        }
        self.api.base_url = self.api.base_url.trim_end_matches('/').to_string();
        self.app.url = self.app.url.trim_end_matches('/').to_string();
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.bet.amount()?;
        self.bet.destination()?;
        Ok(())
    }
}

/// Make `config` the process-wide configuration. Only the first call wins.
pub fn install(config: Config) -> &'static Config {
    ACTIVE.get_or_init(|| config)
}

/// The installed configuration, or env defaults if none was installed.
pub fn current() -> &'static Config {
    ACTIVE.get_or_init(Config::from_env)
}

/// Environment captured at compile time.
fn env_override(key: &str) -> Option<&'static str> {
    match key {
        "MINIAPP_API_URL" => option_env!("MINIAPP_API_URL"),
        "MINIAPP_BET_DESTINATION" => option_env!("MINIAPP_BET_DESTINATION"),
        "MINIAPP_LOG_LEVEL" => option_env!("MINIAPP_LOG_LEVEL"),
        "MINIAPP_APP_URL" => option_env!("MINIAPP_APP_URL"),
        _ => None,
    }
}
