//! Client configuration.
//!
//! A [`Config`] can be built in code, read from environment variables
//! sharing a prefix, or loaded from a YAML, JSON or TOML file:
//!
//! ```rust,ignore
//! use bugzilla::config::{Config, FromEnv, ValidateConfig};
//!
//! // BUGZILLA_URL, BUGZILLA_USERNAME, BUGZILLA_API_KEY, BUGZILLA_TIMEOUT_SECS
//! let config = Config::from_env("BUGZILLA")?;
//! config.validate()?;
//!
//! let config = Config::from_file("bugzilla.yaml")?;
//! ```

use crate::cache::CacheSink;
use crate::error::{BugzillaError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Connection settings for one Bugzilla instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the instance, e.g. `https://bugzilla.example.com`.
    pub base_url: String,

    /// Account name. Must be an e-mail address for changes that refer to
    /// "myself".
    #[serde(default)]
    pub username: String,

    /// Sent as `Bugzilla_api_key` with every request.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout, in seconds when read from a file.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Largest response body accepted.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Receives every fetched bug.
    #[serde(skip)]
    pub cache: Option<Arc<dyn CacheSink>>,
}

impl Config {
    /// Create a new configuration for the instance at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: String::new(),
            api_key: String::new(),
            timeout: default_timeout(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: None,
            cache: None,
        }
    }

    /// Set the account name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the response size ceiling.
    pub fn with_max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Hand every fetched bug to `cache`.
    pub fn with_cache(mut self, cache: Arc<dyn CacheSink>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The account's e-mail address, i.e. the username if it looks like one.
    pub fn email_address(&self) -> Result<String> {
        account_email(&self.username)
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        load_config_file(path)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("timeout", &self.timeout)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("user_agent", &self.user_agent)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_response_bytes() -> usize {
    10 * 1024 * 1024
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Use `username` as an e-mail address.
///
/// Bugzilla identifies people by e-mail, so a username without `@` cannot
/// be used where the request refers to the account itself.
pub fn account_email(username: &str) -> Result<String> {
    if username.contains('@') {
        Ok(username.to_string())
    } else {
        Err(BugzillaError::Request(format!(
            "Your username doesn't look like an email address: {}",
            username
        )))
    }
}

/// Trait for types that can be loaded from environment variables.
pub trait FromEnv: Sized {
    /// Load configuration from environment variables with the given prefix.
    fn from_env(prefix: &str) -> Result<Self>;
}

/// Trait for validating configuration.
pub trait ValidateConfig {
    /// Validate the configuration, returning an error if invalid.
    fn validate(&self) -> Result<()>;
}

impl FromEnv for Config {
    fn from_env(prefix: &str) -> Result<Self> {
        let var = |name: &str| format!("{}_{}", prefix, name);

        let mut config = Config::new(get_env(&var("URL"))?)
            .with_username(get_env_or(&var("USERNAME"), ""))
            .with_api_key(get_env_or(&var("API_KEY"), ""));
        if std::env::var(var("TIMEOUT_SECS")).is_ok() {
            config.timeout = Duration::from_secs(get_env_parse(&var("TIMEOUT_SECS"))?);
        }
        Ok(config)
    }
}

impl ValidateConfig for Config {
    fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            BugzillaError::Request(format!("invalid base URL {:?}: {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BugzillaError::Request(format!(
                "unsupported URL scheme: {}",
                url.scheme()
            )));
        }
        if self.max_response_bytes == 0 {
            return Err(BugzillaError::Request(
                "max_response_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get an environment variable as a string.
pub fn get_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|e| {
        BugzillaError::Request(format!("Environment variable '{}' not found: {}", key, e))
    })
}

/// Get an environment variable and parse it to the specified type.
pub fn get_env_parse<T: std::str::FromStr>(key: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    let value = get_env(key)?;
    value.parse::<T>().map_err(|e| {
        BugzillaError::Request(format!(
            "Failed to parse environment variable '{}': {}",
            key, e
        ))
    })
}

/// Get an environment variable with a default value.
pub fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Load configuration from a file (auto-detect format from extension).
pub fn load_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            BugzillaError::Request(format!("Unable to determine file extension for {:?}", path))
        })?
        .to_lowercase();

    let content = std::fs::read_to_string(path).map_err(|e| {
        BugzillaError::Request(format!("Failed to read config from {:?}: {}", path, e))
    })?;
    let parse_error = |format: &str, e: &dyn fmt::Display| {
        BugzillaError::Request(format!(
            "Failed to parse {} config from {:?}: {}",
            format, path, e
        ))
    };

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| parse_error("YAML", &e)),
        "json" => serde_json::from_str(&content).map_err(|e| parse_error("JSON", &e)),
        "toml" => toml::from_str(&content).map_err(|e| parse_error("TOML", &e)),
        _ => Err(BugzillaError::Request(format!(
            "Unsupported config file extension: {}",
            extension
        ))),
    }
}
