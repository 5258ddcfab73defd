//! Posse configuration.
//!
//! ```toml
//! [truncate]
//! length = 140
//! uri_len = 22
//! ellipsis = "…"
//! parens = true
//!
//! [twitter]
//! tag = "tweet"
//! strategy = "syndicate if tagged"
//! api_base = "https://api.twitter.com/1.1/"
//!
//! [twitter.credentials]
//! consumer_key = "${TWITTER_CONSUMER_KEY}"
//! consumer_secret = "${TWITTER_CONSUMER_SECRET}"
//! access_token = "${TWITTER_ACCESS_TOKEN}"
//! access_token_secret = "${TWITTER_ACCESS_TOKEN_SECRET}"
//! ```

use std::{
    env,
    fmt::{self, Debug, Formatter},
    fs, io,
    path::{Path, PathBuf},
};

use posse_types::TruncateOptions;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "POSSE_CONFIG";

const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct PosseConfig {
    pub truncate: Option<TruncateConfig>,
    pub twitter: Option<TwitterConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Truncation defaults.
#[derive(Debug, Deserialize)]
pub struct TruncateConfig {
    pub length: Option<usize>,
    /// Fixed width every URL is budgeted at.
    pub uri_len: Option<usize>,
    pub ellipsis: Option<String>,
    #[serde(default = "default_true")]
    pub parens: bool,
}

impl Default for TruncateConfig {
    fn default() -> Self {
        Self {
            length: None,
            uri_len: None,
            ellipsis: None,
            parens: true,
        }
    }
}

impl TruncateConfig {
    /// Truncation options with unset fields left at their defaults.
    #[must_use]
    pub fn to_options(&self) -> TruncateOptions {
        let mut options = TruncateOptions::default().with_parens(self.parens);
        if let Some(length) = self.length {
            options.length = length;
        }
        options.uri_len = self.uri_len;
        if let Some(ellipsis) = &self.ellipsis {
            options.ellipsis.clone_from(ellipsis);
        }
        options
    }
}

/// Twitter syndication settings.
#[derive(Debug, Default, Deserialize)]
pub struct TwitterConfig {
    /// Tag that marks (or excludes) posts for syndication.
    pub tag: Option<String>,
    /// `"syndicate if tagged"` or `"syndicate unless tagged"`.
    pub strategy: Option<String>,
    /// Override for the REST API root, e.g. a local mock.
    pub api_base: Option<String>,
    pub credentials: Option<TwitterCredentials>,
}

/// OAuth 1.0a application and user credentials.
///
/// Values may reference environment variables as `${VAR}`; call
/// [`TwitterCredentials::resolved`] before use.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

// Manual Debug impl to prevent leaking credentials in logs.
impl Debug for TwitterCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fn mask(value: &str) -> &'static str {
            if value.is_empty() { "None" } else { "[REDACTED]" }
        }
        f.debug_struct("TwitterCredentials")
            .field("consumer_key", &mask(&self.consumer_key))
            .field("consumer_secret", &mask(&self.consumer_secret))
            .field("access_token", &mask(&self.access_token))
            .field("access_token_secret", &mask(&self.access_token_secret))
            .finish()
    }
}

impl TwitterCredentials {
    /// Copy with every `${VAR}` reference expanded.
    #[must_use]
    pub fn resolved(&self) -> Self {
        Self {
            consumer_key: expand_env_vars(&self.consumer_key),
            consumer_secret: expand_env_vars(&self.consumer_secret),
            access_token: expand_env_vars(&self.access_token),
            access_token_secret: expand_env_vars(&self.access_token_secret),
        }
    }
}

/// Replace `${VAR}` with the value of `VAR`, or nothing when it is unset.
/// An unclosed `${` is kept as written.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl PosseConfig {
    /// Load from the default location. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Truncation options from the `[truncate]` section, or the defaults.
    #[must_use]
    pub fn truncate_options(&self) -> TruncateOptions {
        self.truncate
            .as_ref()
            .map(TruncateConfig::to_options)
            .unwrap_or_default()
    }
}

/// `$POSSE_CONFIG` when set, else `~/.posse/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".posse").join("config.toml"))
}
