// crates/restrict-gate-config/src/config.rs
// ============================================================================
// Module: Restrict Gate Configuration
// Description: Configuration loading and validation for Restrict Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: restrict-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; missing sections take the same defaults the
//! access engine uses when no settings have been saved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use restrict_gate_core::AccessAuditSink;
use restrict_gate_core::FileAuditSink;
use restrict_gate_core::Locale;
use restrict_gate_core::NoopAuditSink;
use restrict_gate_core::RestrictEngineConfig;
use restrict_gate_core::Settings;
use restrict_gate_core::SettingsStore;
use restrict_gate_core::StderrAuditSink;
use restrict_gate_core::StoreError;
use restrict_gate_core::core::DEFAULT_LOGIN_PATH;
use restrict_gate_core::core::DEFAULT_RETURN_PARAM;
use restrict_gate_core::runtime::DEFAULT_RESTRICTED_CONTENT_TYPE;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "restrict-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RESTRICT_GATE_CONFIG";
/// Maximum size of a config file in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the custom restriction message.
pub(crate) const MAX_MESSAGE_LENGTH: usize = 4096;
/// Maximum length of the login path.
pub(crate) const MAX_LOGIN_PATH_LENGTH: usize = 2048;
/// Maximum length of the return parameter name.
pub(crate) const MAX_RETURN_PARAM_LENGTH: usize = 64;
/// Maximum length of a content type key.
pub(crate) const MAX_CONTENT_TYPE_LENGTH: usize = 20;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Restrict Gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RestrictGateConfig {
    /// Deny treatment and message settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// Search filter settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl RestrictGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = read_config_bytes(&resolved, MAX_CONFIG_FILE_SIZE)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.access.validate()?;
        self.search.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the effective access settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            custom_message: self.access.custom_message.clone(),
            redirect_on_deny: self.access.redirect_on_deny,
            login_path: self.access.login_path.clone(),
            return_param: self.access.return_param.clone(),
            locale: self.access.locale,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn engine_config(&self) -> RestrictEngineConfig {
        RestrictEngineConfig {
            restricted_content_type: self.search.content_type.clone(),
        }
    }
}

/// Deny treatment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Message shown in place of denied content; empty uses the default.
    #[serde(default)]
    pub custom_message: Option<String>,
    /// Redirect denied visitors to the login page instead of substituting.
    #[serde(default)]
    pub redirect_on_deny: bool,
    /// Login page path used for redirects.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Query parameter carrying the return path.
    #[serde(default = "default_return_param")]
    pub return_param: String,
    /// Locale for built-in messages.
    #[serde(default)]
    pub locale: Locale,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            custom_message: None,
            redirect_on_deny: false,
            login_path: default_login_path(),
            return_param: default_return_param(),
            locale: Locale::default(),
        }
    }
}

impl AccessConfig {
    /// Validates deny treatment settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(message) = &self.custom_message
            && message.len() > MAX_MESSAGE_LENGTH
        {
            return Err(ConfigError::Invalid(format!(
                "access.custom_message exceeds {MAX_MESSAGE_LENGTH} bytes"
            )));
        }
        let login_path = self.login_path.trim();
        if login_path.is_empty() {
            return Err(ConfigError::Invalid("access.login_path must be non-empty".to_string()));
        }
        if login_path.len() > MAX_LOGIN_PATH_LENGTH {
            return Err(ConfigError::Invalid("access.login_path exceeds max length".to_string()));
        }
        if !(login_path.starts_with('/')
            || login_path.starts_with("https://")
            || login_path.starts_with("http://"))
        {
            return Err(ConfigError::Invalid(
                "access.login_path must be absolute or an http(s) url".to_string(),
            ));
        }
        if self.login_path.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "access.login_path must not contain whitespace".to_string(),
            ));
        }
        validate_key("access.return_param", &self.return_param, MAX_RETURN_PARAM_LENGTH)?;
        Ok(())
    }
}

/// Search filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Content type whose search listings are filtered.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            content_type: default_content_type(),
        }
    }
}

impl SearchConfig {
    /// Validates search settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_key("search.content_type", &self.content_type, MAX_CONTENT_TYPE_LENGTH)
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    /// Discard audit events.
    #[default]
    Off,
    /// Write JSON lines to stderr.
    Stderr,
    /// Append JSON lines to a file.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Audit sink selection.
    #[serde(default)]
    pub mode: AuditMode,
    /// Log file path for file mode.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.mode, &self.path) {
            (AuditMode::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when mode is file".to_string()))
            }
            (AuditMode::File, Some(path)) => validate_path_string("audit.path", path),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid when mode is file".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit log file cannot be opened.
    pub fn build_sink(&self) -> Result<Box<dyn AccessAuditSink>, ConfigError> {
        match (self.mode, &self.path) {
            (AuditMode::Off, _) => Ok(Box::new(NoopAuditSink)),
            (AuditMode::Stderr, _) => Ok(Box::new(StderrAuditSink)),
            (AuditMode::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Box::new(sink))
            }
            (AuditMode::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when mode is file".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Settings Store
// ============================================================================

/// Settings store backed by loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigSettingsStore {
    /// Effective settings derived from configuration.
    settings: Settings,
}

impl ConfigSettingsStore {
    /// Creates a settings store from configuration.
    #[must_use]
    pub fn new(config: &RestrictGateConfig) -> Self {
        Self {
            settings: config.settings(),
        }
    }
}

impl SettingsStore for ConfigSettingsStore {
    fn custom_message(&self) -> Result<Option<String>, StoreError> {
        Ok(self.settings.custom_message.clone())
    }

    fn redirect_on_deny(&self) -> Result<bool, StoreError> {
        Ok(self.settings.redirect_on_deny)
    }

    fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.settings.clone())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde default for [`AccessConfig::login_path`].
fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

/// Serde default for [`AccessConfig::return_param`].
fn default_return_param() -> String {
    DEFAULT_RETURN_PARAM.to_string()
}

/// Serde default for [`SearchConfig::content_type`].
fn default_content_type() -> String {
    DEFAULT_RESTRICTED_CONTENT_TYPE.to_string()
}

/// Reads at most `max_bytes` from `path`, rejecting anything larger.
pub(crate) fn read_config_bytes(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ConfigError> {
    let file = File::open(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > max_bytes {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    Ok(bytes)
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a host key (`[a-z0-9_-]`, bounded length).
fn validate_key(field: &str, value: &str, max_len: usize) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > max_len {
        return Err(ConfigError::Invalid(format!("{field} exceeds {max_len} characters")));
    }
    if !value.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
    {
        return Err(ConfigError::Invalid(format!(
            "{field} may only contain lowercase letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
