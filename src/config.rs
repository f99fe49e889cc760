//! Configuration file handling for poster-studio.
//!
//! Loads configuration from `~/.config/poster-studio/config.toml` or a custom
//! path, then resolves it into the immutable [`PosterConfig`] handed to the
//! client and the materializer.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Generation endpoint used when nothing else is configured.
///
/// Set `POSTER_STUDIO_ENDPOINT` at build time to bake in a different address.
pub const DEFAULT_ENDPOINT: &str = match option_env!("POSTER_STUDIO_ENDPOINT") {
    Some(url) => url,
    None => "http://127.0.0.1:8000/generate",
};

/// Runtime environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "POSTER_STUDIO_ENDPOINT";

/// Configuration file structure for poster-studio.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct EndpointConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Request timeout; unset or 0 means the HTTP client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct CacheConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct ShareConfig {
    /// Default directory for the save action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_dir: Option<PathBuf>,
}

/// Values that take precedence over the config file, e.g. from CLI flags.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

/// Resolved, immutable settings injected into the client and materializer.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterConfig {
    pub endpoint: Url,
    pub timeout: Option<Duration>,
    pub cache_dir: PathBuf,
}

impl PosterConfig {
    /// Settings for `endpoint` with no timeout and the default cache dir.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: None,
            cache_dir: crate::poster::default_cache_dir(),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Config {
    /// Load configuration from the default path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from an explicitly given path.
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Resolve into the settings used at runtime.
    ///
    /// Endpoint precedence: override, `env_endpoint`, config file, built-in
    /// default. Cache dir precedence: override, config file, OS cache dir.
    pub fn resolve(
        &self,
        overrides: &Overrides,
        env_endpoint: Option<String>,
    ) -> Result<PosterConfig, ConfigError> {
        let raw = overrides
            .endpoint
            .clone()
            .or(env_endpoint)
            .or_else(|| self.endpoint.url.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let endpoint = parse_endpoint(&raw)?;

        let mut resolved = PosterConfig::new(endpoint);
        if let Some(dir) = overrides.cache_dir.as_deref().or(self.cache.dir.as_deref()) {
            resolved.cache_dir = expand_tilde(dir);
        }
        // 0 means no timeout, same as leaving it unset.
        if let Some(secs) = self.endpoint.timeout_secs.filter(|secs| *secs > 0) {
            resolved.timeout = Some(Duration::from_secs(secs));
        }
        Ok(resolved)
    }

    /// Default directory for the save action, with `~` expanded.
    pub fn save_dir(&self) -> Option<PathBuf> {
        self.share.save_dir.as_deref().map(expand_tilde)
    }

    /// Resolve using the `POSTER_STUDIO_ENDPOINT` environment variable.
    pub fn resolve_from_env(&self, overrides: &Overrides) -> Result<PosterConfig, ConfigError> {
        let env_endpoint = std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.trim().is_empty());
        self.resolve(overrides, env_endpoint)
    }
}

/// Parse an endpoint, accepting only http and https URLs.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths typed at a prompt or written in the config file never pass through a
/// shell, so `~/Pictures` would otherwise be taken literally.
pub fn expand_tilde(path: &Path) -> PathBuf {
    expand_tilde_with(path, dirs::home_dir().as_deref())
}

fn expand_tilde_with(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    SerializeError(toml::ser::Error),
    InvalidEndpoint {
        url: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::SerializeError(source) => {
                write!(f, "Failed to serialize config: {}", source)
            }
            ConfigError::InvalidEndpoint { url, reason } => {
                write!(f, "Invalid endpoint '{}': {}", url, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::SerializeError(source) => Some(source),
            ConfigError::InvalidEndpoint { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("poster-studio").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/poster-studio/config.toml")
        })
}
