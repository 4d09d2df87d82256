//! Environment-driven client configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sheets5e_domain::DerivationMode;

pub const SEED_PATH_VAR: &str = "SHEETS_SEED_PATH";
pub const DERIVATION_VAR: &str = "SHEETS_DERIVATION";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

// =============================================================================
// Logging settings
// =============================================================================

/// Minimum level for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    /// Accepted for parity with the sheet server's settings; logs as `Error`
    Critical,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

// =============================================================================
// Client settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientConfig {
    /// JSON file holding the characters to seed the store with
    pub seed_path: Option<PathBuf>,
    pub derivation: DerivationMode,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Unset and blank values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let seed_path = get(SEED_PATH_VAR).map(PathBuf::from);

        let derivation = match get(DERIVATION_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|e: sheets5e_domain::DomainError| {
                    ConfigError::invalid(DERIVATION_VAR, e.to_string())
                })?,
            None => DerivationMode::default(),
        };

        let level = match get(LOG_LEVEL_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::invalid(LOG_LEVEL_VAR, e))?,
            None => LogLevel::default(),
        };

        let format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::invalid(LOG_FORMAT_VAR, e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            seed_path,
            derivation,
            logging: LoggingConfig { level, format },
        })
    }
}

/// Loads `.env.local` then `.env` from the workspace root, if present.
///
/// Variables already set in the process environment are left alone, so the
/// first file to define a key wins.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                eprintln!("Ignoring unreadable {}: {e}", path.display());
            }
        }
    }
}
