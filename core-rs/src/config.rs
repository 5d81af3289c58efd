/**
 * config.rs
 * Parser for sbolq.yaml files (YAML format)
 *
 * Format:
 * ```yaml
 * endpoint:
 *   url: http://sbpkb.sbolstandard.org/openrdf-sesame/repositories/SBPkb
 *   username: reader
 *   password: secret
 *   timeoutSecs: 30
 * search:
 *   defaultLimit: 100
 * ```
 *
 * Every key is optional; missing keys take the defaults below. Environment
 * variables (SBOLQ_ENDPOINT, SBOLQ_USERNAME, SBOLQ_PASSWORD, SBOLQ_TIMEOUT)
 * override the file.
 */

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SbolError};

/// SBPkb Sesame repository
pub const DEFAULT_ENDPOINT: &str = "http://sbpkb.sbolstandard.org/openrdf-sesame/repositories/SBPkb";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LIMIT: usize = 100;

/// Conventional config file name
pub const CONFIG_FILE: &str = "sbolq.yaml";

pub const ENV_ENDPOINT: &str = "SBOLQ_ENDPOINT";
pub const ENV_USERNAME: &str = "SBOLQ_USERNAME";
pub const ENV_PASSWORD: &str = "SBOLQ_PASSWORD";
pub const ENV_TIMEOUT: &str = "SBOLQ_TIMEOUT";

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/]+(/\S*)?$").unwrap());

/// sbolq.yaml file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SbolqConfig {
    pub endpoint: EndpointConfig,
    pub search: SearchConfig,
}

/// Remote endpoint location and credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl SbolqConfig {
    /// Load and validate a config file
    ///
    /// # Errors
    /// Returns error if the file doesn't exist, can't be parsed, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SbolError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;

        let config: SbolqConfig = serde_yaml::from_str(&content)
            .map_err(|e| SbolError::ParseError(format!("Invalid {} YAML: {}", CONFIG_FILE, e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Like [`SbolqConfig::load`], but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Err(SbolError::FileNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Validate config values
    ///
    /// Ensures:
    /// - endpoint.url is an http(s) URL
    /// - endpoint.timeoutSecs and search.defaultLimit are positive
    /// - a password is only given together with a username
    pub fn validate(&self) -> Result<()> {
        if !URL_PATTERN.is_match(&self.endpoint.url) {
            return Err(SbolError::ValidationError(format!(
                "Invalid endpoint.url: expected an http(s) URL, got '{}'",
                self.endpoint.url
            )));
        }

        if self.endpoint.timeout_secs == 0 {
            return Err(SbolError::ValidationError(
                "endpoint.timeoutSecs must be greater than zero".to_string(),
            ));
        }

        if self.endpoint.password.is_some() && self.endpoint.username.is_none() {
            return Err(SbolError::ValidationError(
                "endpoint.password requires endpoint.username".to_string(),
            ));
        }

        if self.search.default_limit == 0 {
            return Err(SbolError::ValidationError(
                "search.defaultLimit must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| {
            SbolError::SerializationError(format!("Failed to serialize {}: {}", CONFIG_FILE, e))
        })?;

        fs::write(path.as_ref(), yaml)?;

        Ok(())
    }

    /// Apply overrides looked up by variable name, then re-validate
    ///
    /// # Example
    ///
    /// ```
    /// use sbolq_core::config::SbolqConfig;
    ///
    /// let mut config = SbolqConfig::default();
    /// config
    ///     .apply_overrides(|key| match key {
    ///         "SBOLQ_ENDPOINT" => Some("http://localhost:7200/repositories/parts".to_string()),
    ///         _ => None,
    ///     })
    ///     .unwrap();
    /// assert_eq!(config.endpoint.url, "http://localhost:7200/repositories/parts");
    /// ```
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_ENDPOINT) {
            self.endpoint.url = url;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.endpoint.username = Some(username);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.endpoint.password = Some(password);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.endpoint.timeout_secs = timeout.trim().parse().map_err(|_| {
                SbolError::ValidationError(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT, timeout))
            })?;
        }
        self.validate()
    }

    /// Apply `SBOLQ_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}
