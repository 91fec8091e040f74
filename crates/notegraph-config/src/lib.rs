//! Notegraph Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `<config dir>/notegraph/config.toml`
//! - Local config: `.notegraph/config.toml` (in the vault)
//! - CLI overrides via `ConfigOverrides`
//!
//! Configuration is merged in order: global → local → CLI overrides.

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default primary document extension, without the dot.
pub const DEFAULT_EXTENSION: &str = "md";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration for Notegraph.
///
/// Represents the fully merged configuration from all sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NotegraphConfig {
    /// Note collection location
    pub vault: VaultConfig,

    /// Indexing configuration
    pub index: IndexConfig,

    /// Graph projection configuration
    pub graph: GraphConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Note collection configuration.
///
/// # Example TOML
///
/// ```toml
/// [vault]
/// path = "/home/me/notes"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct VaultConfig {
    /// Root directory of the notes (None or empty = no collection configured)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Indexing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexConfig {
    /// Primary document extension, without the leading dot
    pub extension: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl IndexConfig {
    /// Validate the extension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extension = self.extension.trim();
        if extension.is_empty() {
            return Err(ConfigError::invalid_value(
                "index.extension",
                "extension must not be empty",
            ));
        }
        if extension.contains('.') || extension.contains('/') {
            return Err(ConfigError::invalid_value(
                "index.extension",
                format!(
                    "'{}' must be a bare extension without '.' or '/'",
                    self.extension
                ),
            ));
        }
        Ok(())
    }
}

/// Graph projection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GraphConfig {
    /// What to do with references that resolve to no document
    pub unresolved: UnresolvedMode,
}

/// Handling of unresolved references in the graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedMode {
    /// Leave unresolved references out of the graph (default)
    #[default]
    Drop,
    /// Show unresolved references as placeholder nodes
    Placeholder,
}

impl std::fmt::Display for UnresolvedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}

impl std::str::FromStr for UnresolvedMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "placeholder" => Ok(Self::Placeholder),
            _ => Err(ConfigError::ValidationError(format!(
                "Unknown unresolved link mode: '{}'. Valid values: drop, placeholder",
                s
            ))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level.
    pub fn max_level(&self) -> Result<tracing::Level, ConfigError> {
        self.level.trim().parse().map_err(|_| {
            ConfigError::invalid_value(
                "logging.level",
                format!(
                    "'{}' is not a log level (trace, debug, info, warn, error)",
                    self.level
                ),
            )
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON structured logging
    Json,
}

/// CLI overrides for configuration values.
///
/// Used to apply command-line arguments over file-based config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override vault root directory
    pub vault_path: Option<PathBuf>,

    /// Override primary document extension
    pub extension: Option<String>,

    /// Override unresolved link handling
    pub unresolved: Option<UnresolvedMode>,

    /// Override log level
    pub log_level: Option<String>,
}

impl NotegraphConfig {
    /// Apply CLI overrides to this configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref path) = overrides.vault_path {
            self.vault.path = Some(path.clone());
        }

        if let Some(ref extension) = overrides.extension {
            self.index.extension = extension.clone();
        }

        if let Some(unresolved) = overrides.unresolved {
            self.graph.unresolved = unresolved;
        }

        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.index.validate()?;
        self.logging.max_level()?;
        Ok(())
    }

    /// The configured vault root, treating an empty path as unset.
    pub fn vault_path(&self) -> Option<&Path> {
        self.vault
            .path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
