//! Configuration management for the seller SDK
//!
//! Settings are read through a `ConfigProvider`, normally the process
//! environment with the `WB_` prefix (`WB_API_TOKEN`, `WB_MAX_RETRIES`, ...),
//! after loading a `.env` file if one exists.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::core::ApiSurface;
use crate::error::{Result, SdkError};
use crate::logging::LoggingConfig;
use crate::rate_limit::RateLimitConfig;
use crate::resilience::RetryConfig;
use crate::util::parse_duration;

/// Prefix of every environment variable read by `SellerApiConfig::from_env`
pub const ENV_PREFIX: &str = "WB";

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value
            .trim()
            .parse::<i64>()
            .map_err(|e| SdkError::configuration(format!("Invalid integer for key {}: {}", key, e)))
    }

    /// Get a duration such as `500ms`, `30s` or `2m`; bare numbers are seconds
    fn get_duration(&self, key: &str) -> Result<Duration> {
        let value = self.get_string(key)?;
        parse_duration(&value)
            .map_err(|e| SdkError::configuration(format!("Invalid duration for key {}: {}", key, e)))
    }

    /// Get a value parsed with `FromStr`
    fn get_parsed<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        <T as FromStr>::Err: fmt::Display,
    {
        let value = self.get_string(key)?;
        value
            .trim()
            .parse::<T>()
            .map_err(|e| SdkError::configuration(format!("Invalid value for key {}: {}", key, e)))
    }

    /// Get a string configuration value, if set
    fn get_optional(&self, key: &str) -> Option<String> {
        self.get_string(key).ok().filter(|value| !value.trim().is_empty())
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    fn format_key(&self, key: &str) -> String {
        let key = key
            .to_uppercase()
            .replace(|c: char| !c.is_ascii_alphanumeric(), "_");
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key,
        }
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                SdkError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => SdkError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    /// Configuration values
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| SdkError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(SdkError::configuration(format!(
                "Unknown environment '{}', expected development, production or test",
                other
            ))),
        }
    }
}

/// Minimum severity written to the logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(SdkError::configuration(format!("Unknown log level '{}'", other))),
        }
    }
}

/// Base URL of each API surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub general: String,
    pub statistics: String,
    pub content: String,
    pub marketplace: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            general: ApiSurface::General.default_base_url().to_string(),
            statistics: ApiSurface::Statistics.default_base_url().to_string(),
            content: ApiSurface::Content.default_base_url().to_string(),
            marketplace: ApiSurface::Marketplace.default_base_url().to_string(),
        }
    }
}

impl Endpoints {
    /// Base URL configured for a surface
    pub fn url_for(&self, surface: ApiSurface) -> &str {
        match surface {
            ApiSurface::General => &self.general,
            ApiSurface::Statistics => &self.statistics,
            ApiSurface::Content => &self.content,
            ApiSurface::Marketplace => &self.marketplace,
        }
    }
}

/// Request timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Timeout of ordinary calls
    pub default: Duration,
    /// Timeout of file uploads
    pub upload: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(30),
            upload: Duration::from_secs(120),
        }
    }
}

/// Everything needed to assemble the seller API clients
#[derive(Clone, PartialEq, Eq)]
pub struct SellerApiConfig {
    pub api_token: String,
    pub environment: Environment,
    pub log_level: LogLevel,
    pub log_dir: Option<String>,
    pub endpoints: Endpoints,
    pub rate_limit: RateLimitConfig,
    pub retry: RetryConfig,
    pub timeouts: TimeoutConfig,
}

impl fmt::Debug for SellerApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SellerApiConfig")
            .field("api_token", &crate::redact::REDACTION_MARKER)
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("endpoints", &self.endpoints)
            .field("rate_limit", &self.rate_limit)
            .field("retry", &self.retry)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl SellerApiConfig {
    /// Defaults for everything but the token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            environment: Environment::default(),
            log_level: LogLevel::default(),
            log_dir: None,
            endpoints: Endpoints::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }

    /// Load `.env` if present, then read `WB_*` environment variables
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_provider(&EnvConfigProvider::new().with_prefix(ENV_PREFIX))
    }

    /// Read settings from a provider; only `api_token` is required
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let api_token = provider
            .get_optional("api_token")
            .ok_or_else(|| SdkError::configuration("WB_API_TOKEN is required"))?;

        let mut config = Self::new(api_token);

        if provider.get_optional("environment").is_some() {
            config.environment = provider.get_parsed("environment")?;
        }
        if provider.get_optional("log_level").is_some() {
            config.log_level = provider.get_parsed("log_level")?;
        }
        config.log_dir = provider.get_optional("log_dir");

        let endpoints = &mut config.endpoints;
        for (key, slot) in [
            ("api_base_url", &mut endpoints.general),
            ("statistics_api_base_url", &mut endpoints.statistics),
            ("content_api_base_url", &mut endpoints.content),
            ("marketplace_api_base_url", &mut endpoints.marketplace),
        ] {
            if let Some(url) = provider.get_optional(key) {
                *slot = url;
            }
        }

        if provider.get_optional("rate_limit_max_requests").is_some() {
            config.rate_limit.max_requests = provider.get_parsed("rate_limit_max_requests")?;
        }
        if provider.get_optional("rate_limit_window").is_some() {
            config.rate_limit.window = provider.get_duration("rate_limit_window")?;
        }
        if provider.get_optional("max_retries").is_some() {
            config.retry.max_retries = provider.get_parsed("max_retries")?;
        }
        if provider.get_optional("retry_base_delay").is_some() {
            config.retry.base_delay = provider.get_duration("retry_base_delay")?;
        }
        if provider.get_optional("retry_max_delay").is_some() {
            config.retry.max_delay = provider.get_duration("retry_max_delay")?;
        }
        if provider.get_optional("timeout").is_some() {
            config.timeouts.default = provider.get_duration("timeout")?;
        }
        if provider.get_optional("upload_timeout").is_some() {
            config.timeouts.upload = provider.get_duration("upload_timeout")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable together
    ///
    /// The token itself is checked when clients are built.
    pub fn validate(&self) -> Result<()> {
        for surface in ApiSurface::ALL {
            let url = self.endpoints.url_for(surface);
            url::Url::parse(url).map_err(|e| {
                SdkError::configuration(format!("Invalid {} base URL '{}': {}", surface, url, e))
            })?;
        }

        if self.rate_limit.max_requests == 0 {
            return Err(SdkError::configuration("Rate limit must admit at least one request"));
        }
        if self.rate_limit.window.is_zero() {
            return Err(SdkError::configuration("Rate limit window must be positive"));
        }
        if self.retry.base_delay > self.retry.max_delay {
            return Err(SdkError::configuration(format!(
                "Retry base delay {:?} exceeds max delay {:?}",
                self.retry.base_delay, self.retry.max_delay
            )));
        }
        if self.timeouts.default.is_zero() || self.timeouts.upload.is_zero() {
            return Err(SdkError::configuration("Timeouts must be positive"));
        }

        Ok(())
    }

    /// Logging settings derived from this configuration
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.as_str().to_string(),
            json_format: self.environment == Environment::Production,
            log_dir: self.log_dir.clone(),
            ..LoggingConfig::default()
        }
    }
}
