use crate::error::{ConfigError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Whether the surface renders a per-rule requirements checklist.
    #[serde(default = "default_true")]
    pub checklist: bool,

    #[serde(default)]
    pub availability: AvailabilityConfig,

    #[serde(default)]
    pub submit: SubmitConfig,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            checklist: true,
            availability: AvailabilityConfig::default(),
            submit: SubmitConfig::default(),
        }
    }
}

impl FormConfig {
    /// Parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.policy.validate()?;
        self.availability.validate()?;
        self.submit.validate()?;
        Ok(())
    }
}

// ── Credential policy ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_true")]
    pub require_letter: bool,
    #[serde(default = "default_true")]
    pub require_digit: bool,
    #[serde(default = "default_true")]
    pub require_special: bool,
    #[serde(default = "default_special_chars")]
    pub special_chars: String,
}

fn default_min_length() -> usize {
    8
}

fn default_special_chars() -> String {
    "@$!%*#?&".into()
}

fn default_true() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            require_letter: true,
            require_digit: true,
            require_special: true,
            special_chars: default_special_chars(),
        }
    }
}

impl PolicyConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.min_length == 0 {
            return Err(ConfigError::Validation(
                "policy.min_length must be >= 1".into(),
            ));
        }
        if self.require_special && self.special_chars.is_empty() {
            return Err(ConfigError::Validation(
                "policy.special_chars must not be empty when policy.require_special is set".into(),
            ));
        }
        Ok(())
    }
}

// ── Availability check ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_availability_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_availability_endpoint() -> String {
    "http://127.0.0.1:5000/auth/check-username".into()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_chars() -> usize {
    3
}

fn default_request_timeout_secs() -> u64 {
    8
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_availability_endpoint(),
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AvailabilityConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.min_query_chars == 0 {
            return Err(ConfigError::Validation(
                "availability.min_query_chars must be >= 1".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "availability.request_timeout_secs must be >= 1".into(),
            ));
        }
        validate_endpoint(&self.endpoint)
    }
}

// ── Submit ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    #[serde(default = "default_submit_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_submit_endpoint() -> String {
    "http://127.0.0.1:5000/auth/register".into()
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            endpoint: default_submit_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SubmitConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "submit.request_timeout_secs must be >= 1".into(),
            ));
        }
        validate_endpoint(&self.endpoint)
    }
}

fn validate_endpoint(raw: &str) -> std::result::Result<(), ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Endpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}
