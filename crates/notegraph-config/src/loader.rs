//! Configuration loader with inheritance support.
//!
//! Loads configuration from multiple sources and merges them:
//! 1. Global config: `<config dir>/notegraph/config.toml`
//! 2. Local config: `.notegraph/config.toml` (in the vault)
//! 3. CLI overrides
//!
//! Later sources override earlier ones.

use crate::error::ConfigError;
use crate::{
    ConfigOverrides, GraphConfig, IndexConfig, LogFormat, LoggingConfig, NotegraphConfig,
    UnresolvedMode, VaultConfig, DEFAULT_EXTENSION, DEFAULT_LOG_LEVEL,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Global configuration directory name (under the platform config dir).
const GLOBAL_CONFIG_DIR: &str = "notegraph";

/// Local configuration directory name (hidden, so never indexed).
const LOCAL_CONFIG_DIR: &str = ".notegraph";

/// Configuration loader with caching and inheritance support.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.config/notegraph`)
    global_config_dir: Option<PathBuf>,

    /// Cached global config
    global_config: Option<NotegraphConfig>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory.
    pub fn new() -> Self {
        let global_config_dir = dirs::config_dir().map(|d| d.join(GLOBAL_CONFIG_DIR));

        Self {
            global_config_dir,
            global_config: None,
        }
    }

    /// Create a loader with a custom global config directory.
    ///
    /// Useful for testing.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
            global_config: None,
        }
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the local config file path for a vault.
    pub fn local_config_path(&self, vault_root: &Path) -> PathBuf {
        vault_root.join(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// Load configuration with optional CLI overrides.
    ///
    /// Merges config in order: global → local → overrides. The local file is
    /// looked up under `vault_root` when given, otherwise under the vault path
    /// named by the overrides or the global config.
    pub fn load(
        &mut self,
        vault_root: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<NotegraphConfig, ConfigError> {
        let mut config = NotegraphConfig::default();

        if let Some(global_config) = self.load_global()? {
            config = merge_configs(config, global_config);
        }

        let local_root = vault_root
            .map(Path::to_path_buf)
            .or_else(|| overrides.and_then(|o| o.vault_path.clone()))
            .or_else(|| config.vault_path().map(Path::to_path_buf));

        if let Some(root) = local_root {
            if let Some(local_config) = self.load_local(&root)? {
                config = merge_configs(config, local_config);
            }
        }

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a single explicit config file with optional CLI overrides.
    ///
    /// The file replaces both the global and local layers.
    pub fn load_file(
        &self,
        path: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<NotegraphConfig, ConfigError> {
        debug!("Loading config from {:?}", path);
        let mut config = load_config_file(path)?;

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load only the global configuration.
    pub fn load_global(&mut self) -> Result<Option<NotegraphConfig>, ConfigError> {
        if let Some(ref config) = self.global_config {
            return Ok(Some(config.clone()));
        }

        let Some(global_path) = self.global_config_path() else {
            debug!("No configuration directory found, skipping global config");
            return Ok(None);
        };

        if !global_path.exists() {
            trace!("Global config not found at {:?}", global_path);
            return Ok(None);
        }

        debug!("Loading global config from {:?}", global_path);
        let config = load_config_file(&global_path)?;

        self.global_config = Some(config.clone());

        Ok(Some(config))
    }

    /// Load only the local configuration for a vault.
    pub fn load_local(&self, vault_root: &Path) -> Result<Option<NotegraphConfig>, ConfigError> {
        let local_path = self.local_config_path(vault_root);

        if !local_path.exists() {
            trace!("Local config not found at {:?}", local_path);
            return Ok(None);
        }

        debug!("Loading local config from {:?}", local_path);
        load_config_file(&local_path).map(Some)
    }

    /// Save configuration to the global config file.
    pub fn save_global(&self, config: &NotegraphConfig) -> Result<(), ConfigError> {
        let Some(ref global_dir) = self.global_config_dir else {
            return Err(ConfigError::NoConfigDir);
        };

        let global_path = global_dir.join(CONFIG_FILE_NAME);
        save_config_file(&global_path, config)
    }

    /// Save configuration to the local config file for a vault.
    pub fn save_local(
        &self,
        vault_root: &Path,
        config: &NotegraphConfig,
    ) -> Result<(), ConfigError> {
        let local_path = self.local_config_path(vault_root);
        save_config_file(&local_path, config)
    }

    /// Initialize the global configuration file.
    ///
    /// Writes the default configuration unless the file already exists.
    pub fn init_global(&self) -> Result<PathBuf, ConfigError> {
        let Some(ref global_dir) = self.global_config_dir else {
            return Err(ConfigError::NoConfigDir);
        };

        init_config_dir(global_dir)
    }

    /// Initialize local configuration for a vault.
    ///
    /// Creates `.notegraph/config.toml` with default configuration.
    pub fn init_local(&self, vault_root: &Path) -> Result<PathBuf, ConfigError> {
        init_config_dir(&vault_root.join(LOCAL_CONFIG_DIR))
    }

    /// Clear cached global configuration.
    ///
    /// Forces reload on next `load_global()` call.
    pub fn clear_cache(&mut self) {
        self.global_config = None;
    }
}

fn init_config_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }

    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        save_config_file(&config_path, &NotegraphConfig::default())?;
    }

    Ok(config_path)
}

/// Load a configuration file from disk.
fn load_config_file(path: &Path) -> Result<NotegraphConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Save a configuration file to disk.
fn save_config_file(path: &Path, config: &NotegraphConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
}

/// Merge two configurations, with `overlay` taking precedence.
///
/// Field-by-field: an overlay value equal to the default keeps the base value,
/// so partial config files only change what they mention.
fn merge_configs(base: NotegraphConfig, overlay: NotegraphConfig) -> NotegraphConfig {
    NotegraphConfig {
        vault: merge_vault(base.vault, overlay.vault),
        index: merge_index(base.index, overlay.index),
        graph: merge_graph(base.graph, overlay.graph),
        logging: merge_logging(base.logging, overlay.logging),
    }
}

fn merge_vault(base: VaultConfig, overlay: VaultConfig) -> VaultConfig {
    VaultConfig {
        path: overlay.path.or(base.path),
    }
}

fn merge_index(base: IndexConfig, overlay: IndexConfig) -> IndexConfig {
    IndexConfig {
        extension: if overlay.extension != DEFAULT_EXTENSION {
            overlay.extension
        } else {
            base.extension
        },
    }
}

fn merge_graph(base: GraphConfig, overlay: GraphConfig) -> GraphConfig {
    GraphConfig {
        unresolved: if overlay.unresolved != UnresolvedMode::Drop {
            overlay.unresolved
        } else {
            base.unresolved
        },
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: if overlay.level != DEFAULT_LOG_LEVEL {
            overlay.level
        } else {
            base.level
        },
        format: if overlay.format != LogFormat::default() {
            overlay.format
        } else {
            base.format
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_local_config(content: &str, vault: &Path) -> PathBuf {
        let config_dir = vault.join(".notegraph");
        std::fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn create_global_config(content: &str, global_dir: &Path) {
        std::fs::create_dir_all(global_dir).unwrap();
        std::fs::write(global_dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn test_load_default_config() {
        let temp = TempDir::new().unwrap();
        let mut loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        let config = loader.load(Some(temp.path()), None).unwrap();

        assert_eq!(config, NotegraphConfig::default());
    }

    #[test]
    fn test_load_local_config() {
        let temp = TempDir::new().unwrap();
        let mut loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        create_local_config(
            r#"
            [index]
            extension = "markdown"

            [graph]
            unresolved = "placeholder"
            "#,
            temp.path(),
        );

        let config = loader.load(Some(temp.path()), None).unwrap();

        assert_eq!(config.index.extension, "markdown");
        assert_eq!(config.graph.unresolved, UnresolvedMode::Placeholder);
    }

    #[test]
    fn test_global_overrides_default() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        create_global_config(
            r#"
            [logging]
            level = "debug"
            "#,
            &global_dir,
        );

        let mut loader = ConfigLoader::with_global_dir(&global_dir);
        let config = loader.load(None, None).unwrap();

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_local_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        let vault = temp.path().join("vault");

        create_global_config(
            r#"
            [logging]
            level = "debug"

            [index]
            extension = "txt"
            "#,
            &global_dir,
        );
        create_local_config(
            r#"
            [index]
            extension = "markdown"
            "#,
            &vault,
        );

        let mut loader = ConfigLoader::with_global_dir(&global_dir);
        let config = loader.load(Some(&vault), None).unwrap();

        assert_eq!(config.index.extension, "markdown");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_local_without_logging_keeps_global_format() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        let vault = temp.path().join("vault");

        create_global_config(
            r#"
            [logging]
            format = "json"
            "#,
            &global_dir,
        );
        create_local_config(
            r#"
            [index]
            extension = "markdown"
            "#,
            &vault,
        );

        let mut loader = ConfigLoader::with_global_dir(&global_dir);
        let config = loader.load(Some(&vault), None).unwrap();

        assert_eq!(config.index.extension, "markdown");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        create_global_config("[logging]\nlevel = \"verbose\"\n", &global_dir);

        let mut loader = ConfigLoader::with_global_dir(&global_dir);
        let err = loader.load(None, None).unwrap_err();

        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_local_found_through_global_vault_path() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        let vault = temp.path().join("vault");

        create_global_config(
            &format!("[vault]\npath = {:?}\n", vault.to_string_lossy()),
            &global_dir,
        );
        create_local_config("[graph]\nunresolved = \"placeholder\"\n", &vault);

        let mut loader = ConfigLoader::with_global_dir(&global_dir);
        let config = loader.load(None, None).unwrap();

        assert_eq!(config.vault_path(), Some(vault.as_path()));
        assert_eq!(config.graph.unresolved, UnresolvedMode::Placeholder);
    }

    #[test]
    fn test_cli_overrides_all() {
        let temp = TempDir::new().unwrap();
        create_local_config(
            r#"
            [index]
            extension = "markdown"
            "#,
            temp.path(),
        );

        let mut loader = ConfigLoader::with_global_dir(temp.path().join("global"));
        let overrides = ConfigOverrides {
            extension: Some("txt".to_string()),
            log_level: Some("trace".to_string()),
            ..Default::default()
        };

        let config = loader.load(Some(temp.path()), Some(&overrides)).unwrap();

        assert_eq!(config.index.extension, "txt");
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_load_explicit_file_skips_layers() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        create_global_config("[logging]\nlevel = \"debug\"\n", &global_dir);

        let explicit = temp.path().join("custom.toml");
        std::fs::write(&explicit, "[index]\nextension = \"markdown\"\n").unwrap();

        let loader = ConfigLoader::with_global_dir(&global_dir);
        let overrides = ConfigOverrides {
            vault_path: Some(PathBuf::from("/notes")),
            ..Default::default()
        };
        let config = loader.load_file(&explicit, Some(&overrides)).unwrap();

        assert_eq!(config.index.extension, "markdown");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.vault_path(), Some(Path::new("/notes")));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        let err = loader
            .load_file(&temp.path().join("absent.toml"), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let temp = TempDir::new().unwrap();
        create_local_config("[index]\nextension = \".md\"\n", temp.path());

        let mut loader = ConfigLoader::with_global_dir(temp.path().join("global"));
        let err = loader.load(Some(temp.path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = create_local_config("[index\nextension = ", temp.path());

        let mut loader = ConfigLoader::with_global_dir(temp.path().join("global"));
        let err = loader.load(Some(temp.path()), None).unwrap_err();

        match err {
            ConfigError::ParseToml { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        let mut config = NotegraphConfig::default();
        config.graph.unresolved = UnresolvedMode::Placeholder;
        config.logging.level = "warn".to_string();
        config.logging.format = LogFormat::Json;

        loader.save_local(temp.path(), &config).unwrap();

        let mut loader = ConfigLoader::with_global_dir(temp.path().join("global"));
        let loaded = loader.load(Some(temp.path()), None).unwrap();

        assert_eq!(loaded.graph.unresolved, UnresolvedMode::Placeholder);
        assert_eq!(loaded.logging.level, "warn");
        assert_eq!(loaded.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_init_local_creates_config() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        let config_path = loader.init_local(temp.path()).unwrap();

        assert!(config_path.exists());
        assert!(config_path.ends_with(".notegraph/config.toml"));

        let content = std::fs::read_to_string(&config_path).unwrap();
        let parsed: NotegraphConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, NotegraphConfig::default());
    }

    #[test]
    fn test_init_global_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        create_global_config("[logging]\nlevel = \"error\"\n", &global_dir);

        let loader = ConfigLoader::with_global_dir(&global_dir);
        let path = loader.init_global().unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("error"));
    }

    #[test]
    fn test_vault_merge_keeps_base_path() {
        let base = VaultConfig {
            path: Some(PathBuf::from("/global/notes")),
        };
        let merged = merge_vault(base, VaultConfig::default());
        assert_eq!(merged.path, Some(PathBuf::from("/global/notes")));
    }

    #[test]
    fn test_cache_clearing() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");
        create_global_config("[logging]\nlevel = \"debug\"\n", &global_dir);

        let mut loader = ConfigLoader::with_global_dir(&global_dir);

        let _ = loader.load_global().unwrap();
        assert!(loader.global_config.is_some());

        loader.clear_cache();
        assert!(loader.global_config.is_none());
    }
}
