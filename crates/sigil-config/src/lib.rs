//! Configuration management for Sigil.
//!
//! Parses `sigil.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. The `[oauth]`
//! section supplies the consumer credentials used as signing defaults.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Every string field of `[oauth]` is expanded.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sigil_oauth::{DEFAULT_REALM, OAuthOptions, OptionKey, SignatureMethod};
use tracing::debug;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override consumer key.
    pub consumer_key: Option<String>,
    /// Override consumer secret (or PEM key for RSA-SHA1).
    pub consumer_secret: Option<String>,
    /// Override access token.
    pub token: Option<String>,
    /// Override access token secret.
    pub token_secret: Option<String>,
    /// Override signature method.
    pub signature_method: Option<String>,
    /// Override realm.
    pub realm: Option<String>,
}

impl CliSettings {
    fn is_empty(&self) -> bool {
        self.consumer_key.is_none()
            && self.consumer_secret.is_none()
            && self.token.is_none()
            && self.token_secret.is_none()
            && self.signature_method.is_none()
            && self.realm.is_none()
    }
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sigil.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OAuth credentials (optional section).
    pub oauth: Option<OAuthConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// OAuth credentials and signing defaults.
#[derive(Debug, Deserialize)]
pub struct OAuthConfig {
    /// OAuth consumer key.
    #[serde(default)]
    pub consumer_key: String,
    /// Consumer secret, or PEM private key text for RSA-SHA1.
    #[serde(default)]
    pub consumer_secret: Option<String>,
    /// Path to a PEM private key, relative to the config file.
    ///
    /// Read into `consumer_secret` during load.
    #[serde(default)]
    pub consumer_secret_file: Option<PathBuf>,
    /// OAuth access token.
    #[serde(default)]
    pub token: Option<String>,
    /// OAuth access token secret.
    #[serde(default)]
    pub token_secret: Option<String>,
    /// Signature method identifier.
    #[serde(default = "default_signature_method")]
    pub signature_method: String,
    /// Realm emitted in the header.
    #[serde(default = "default_realm")]
    pub realm: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: None,
            consumer_secret_file: None,
            token: None,
            token_secret: None,
            signature_method: default_signature_method(),
            realm: default_realm(),
        }
    }
}

impl OAuthConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the consumer key is empty or the
    /// signature method is unsupported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.consumer_key, "oauth.consumer_key")?;
        self.signature_method
            .parse::<SignatureMethod>()
            .map_err(|e| ConfigError::Validation(format!("oauth.signature_method: {e}")))?;
        Ok(())
    }

    /// Credentials as signing options.
    ///
    /// Only fields that are set become options; nonce and timestamp are
    /// left to per-request defaults.
    pub fn to_options(&self) -> OAuthOptions {
        let mut options = OAuthOptions::new()
            .with(OptionKey::ConsumerKey, self.consumer_key.as_str())
            .with(OptionKey::SignatureMethod, self.signature_method.as_str());
        let optional = [
            (OptionKey::ConsumerSecret, &self.consumer_secret),
            (OptionKey::Token, &self.token),
            (OptionKey::TokenSecret, &self.token_secret),
        ];
        for (key, value) in optional
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
        {
            options.insert(key, value);
        }
        options
    }
}

fn default_signature_method() -> String {
    SignatureMethod::HmacSha1.as_str().to_owned()
}

fn default_realm() -> String {
    DEFAULT_REALM.to_owned()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`oauth.consumer_secret`").
        field: String,
        /// Error message (e.g., "${`OAUTH_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sigil.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a referenced key file cannot be read.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// Creates the `[oauth]` section when a setting is given and the file
    /// had none.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if settings.is_empty() {
            return;
        }
        let oauth = self.oauth.get_or_insert_with(OAuthConfig::default);
        if let Some(consumer_key) = &settings.consumer_key {
            oauth.consumer_key.clone_from(consumer_key);
        }
        if let Some(consumer_secret) = &settings.consumer_secret {
            oauth.consumer_secret = Some(consumer_secret.clone());
            oauth.consumer_secret_file = None;
        }
        if let Some(token) = &settings.token {
            oauth.token = Some(token.clone());
        }
        if let Some(token_secret) = &settings.token_secret {
            oauth.token_secret = Some(token_secret.clone());
        }
        if let Some(signature_method) = &settings.signature_method {
            oauth.signature_method.clone_from(signature_method);
        }
        if let Some(realm) = &settings.realm {
            oauth.realm.clone_from(realm);
        }
    }

    /// Get validated OAuth configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_oauth(&self) -> Result<&OAuthConfig, ConfigError> {
        let oauth = self.oauth.as_ref().ok_or_else(|| {
            ConfigError::Validation("[oauth] section required in config".into())
        })?;
        oauth.validate()?;
        Ok(oauth)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_secret_file(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// An `[oauth]` section, when present, must be complete.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(oauth) = &self.oauth {
            oauth.validate()?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let Some(oauth) = self.oauth.as_mut() else {
            return Ok(());
        };
        oauth.consumer_key = expand::expand_env(&oauth.consumer_key, "oauth.consumer_key")?;
        expand::expand_opt(&mut oauth.consumer_secret, "oauth.consumer_secret")?;
        expand::expand_opt(&mut oauth.token, "oauth.token")?;
        expand::expand_opt(&mut oauth.token_secret, "oauth.token_secret")?;
        oauth.signature_method =
            expand::expand_env(&oauth.signature_method, "oauth.signature_method")?;
        oauth.realm = expand::expand_env(&oauth.realm, "oauth.realm")?;
        if let Some(file) = &oauth.consumer_secret_file {
            let expanded =
                expand::expand_env(&file.to_string_lossy(), "oauth.consumer_secret_file")?;
            oauth.consumer_secret_file = Some(PathBuf::from(expanded));
        }
        Ok(())
    }

    /// Read `consumer_secret_file` (relative to the config directory) into
    /// `consumer_secret`.
    fn resolve_secret_file(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let Some(oauth) = self.oauth.as_mut() else {
            return Ok(());
        };
        let Some(file) = &oauth.consumer_secret_file else {
            return Ok(());
        };
        if oauth.consumer_secret.is_some() {
            return Err(ConfigError::Validation(
                "oauth.consumer_secret and oauth.consumer_secret_file are mutually exclusive"
                    .to_owned(),
            ));
        }

        let path = config_dir.join(file);
        debug!(path = %path.display(), "Reading consumer secret file");
        oauth.consumer_secret = Some(std::fs::read_to_string(&path)?);
        oauth.consumer_secret_file = Some(path);
        Ok(())
    }
}
