//! Config command - View and manage configuration
//!
//! Provides commands for viewing and creating Notegraph configuration:
//! - Show the effective configuration with the source of each value
//! - Show configuration file paths
//! - Create a default global or local configuration file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use notegraph_config::{ConfigLoader, NotegraphConfig};
use serde::Serialize;

use super::print_info;
use crate::GlobalOptions;

/// Config management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration with value sources
    Show(ShowArgs),

    /// Show configuration file paths
    Path(PathArgs),

    /// Create a default configuration file
    Init(InitArgs),
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the path command
#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the init command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Create the global config instead of the vault-local one
    #[arg(long)]
    global: bool,
}

/// Configuration value with source information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigValue {
    /// Configuration key (e.g. `index.extension`)
    pub key: String,
    /// Current value
    pub value: serde_json::Value,
    /// Source of this value (default, global, local, cli)
    pub source: String,
}

/// Configuration paths
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPaths {
    /// Global config file path
    pub global: Option<PathBuf>,
    /// Local config file path
    pub local: Option<PathBuf>,
    /// Explicit config file given with --config
    pub explicit: Option<PathBuf>,
    /// Whether global config exists
    pub global_exists: bool,
    /// Whether local config exists
    pub local_exists: bool,
}

/// Execute the config command
pub fn execute(
    cmd: ConfigCommand,
    global: &GlobalOptions,
    config: &NotegraphConfig,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show(args) => execute_show(args, global, config),
        ConfigCommand::Path(args) => execute_path(args, global, config),
        ConfigCommand::Init(args) => execute_init(args, global, config),
    }
}

fn execute_show(
    args: ShowArgs,
    global: &GlobalOptions,
    effective: &NotegraphConfig,
) -> Result<()> {
    let mut loader = ConfigLoader::new();

    let default_config = NotegraphConfig::default();
    let (global_config, local_config) = if global.config.is_some() {
        (NotegraphConfig::default(), NotegraphConfig::default())
    } else {
        let global_config = loader.load_global()?.unwrap_or_default();
        let local_config = match effective.vault_path() {
            Some(vault) => loader.load_local(vault)?.unwrap_or_default(),
            None => NotegraphConfig::default(),
        };
        (global_config, local_config)
    };

    let values =
        collect_config_values(&default_config, &global_config, &local_config, effective)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        print_config_values(&values);
    }

    Ok(())
}

fn execute_path(args: PathArgs, global: &GlobalOptions, config: &NotegraphConfig) -> Result<()> {
    let loader = ConfigLoader::new();

    let global_path = loader.global_config_path();
    let local_path = config.vault_path().map(|v| loader.local_config_path(v));

    let paths = ConfigPaths {
        global_exists: global_path.as_ref().is_some_and(|p| p.exists()),
        local_exists: local_path.as_ref().is_some_and(|p| p.exists()),
        global: global_path,
        local: local_path,
        explicit: global.config.clone(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    println!("Configuration Paths");
    println!("===================\n");

    match paths.global {
        Some(ref gp) => println!(
            "Global: {} ({})",
            gp.display(),
            exists_label(paths.global_exists)
        ),
        None => println!("Global: not available (no configuration directory)"),
    }
    match paths.local {
        Some(ref lp) => println!(
            "Local:  {} ({})",
            lp.display(),
            exists_label(paths.local_exists)
        ),
        None => println!("Local:  not available (no vault configured)"),
    }
    if let Some(ref explicit) = paths.explicit {
        println!("File:   {} (--config)", explicit.display());
    }

    Ok(())
}

fn execute_init(args: InitArgs, global: &GlobalOptions, config: &NotegraphConfig) -> Result<()> {
    let loader = ConfigLoader::new();

    let path = if args.global {
        loader
            .init_global()
            .context("Failed to create global configuration")?
    } else {
        let vault = config
            .vault_path()
            .ok_or_else(|| anyhow::anyhow!("No vault configured; pass --vault <DIR>"))?;
        loader
            .init_local(vault)
            .context("Failed to create local configuration")?
    };

    print_info(&format!("Configuration file: {}", path.display()), global.quiet);
    Ok(())
}

fn exists_label(exists: bool) -> &'static str {
    if exists {
        "exists"
    } else {
        "not found"
    }
}

/// Collect effective configuration values with source information.
fn collect_config_values(
    default: &NotegraphConfig,
    global: &NotegraphConfig,
    local: &NotegraphConfig,
    effective: &NotegraphConfig,
) -> Result<Vec<ConfigValue>> {
    let layers = ConfigLayers {
        default: serde_json::to_value(default)?,
        global: serde_json::to_value(global)?,
        local: serde_json::to_value(local)?,
    };
    let effective = serde_json::to_value(effective)?;

    let mut values = Vec::new();
    flatten_config("", &effective, &layers, &mut values);
    Ok(values)
}

struct ConfigLayers {
    default: serde_json::Value,
    global: serde_json::Value,
    local: serde_json::Value,
}

/// Recursively flatten config into key-value pairs with sources
fn flatten_config(
    prefix: &str,
    effective: &serde_json::Value,
    layers: &ConfigLayers,
    values: &mut Vec<ConfigValue>,
) {
    if let serde_json::Value::Object(map) = effective {
        for (key, value) in map {
            let key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            flatten_config(&key, value, layers, values);
        }
        return;
    }

    let pointer = format!("/{}", prefix.replace('.', "/"));
    let layer = |v: &serde_json::Value| v.pointer(&pointer).cloned();
    let default = layer(&layers.default);

    let is_default = default.as_ref() == Some(effective);

    let source = if is_default {
        "default"
    } else if layer(&layers.local).as_ref() == Some(effective) {
        "local"
    } else if layer(&layers.global).as_ref() == Some(effective) {
        "global"
    } else {
        "cli"
    };

    values.push(ConfigValue {
        key: prefix.to_string(),
        value: effective.clone(),
        source: source.to_string(),
    });
}

/// Print configuration grouped by section
fn print_config_values(values: &[ConfigValue]) {
    println!("Notegraph Configuration");
    println!("=======================");

    let mut section = "";
    for value in values {
        let (current, name) = value
            .key
            .split_once('.')
            .unwrap_or(("", value.key.as_str()));
        if current != section {
            println!("\n[{}]", current);
            section = current;
        }
        let source = match value.source.as_str() {
            "default" => String::new(),
            other => format!(" ({})", other),
        };
        println!("  {} = {}{}", name, value.value, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegraph_config::UnresolvedMode;

    fn find<'a>(values: &'a [ConfigValue], key: &str) -> &'a ConfigValue {
        values.iter().find(|v| v.key == key).unwrap()
    }

    #[test]
    fn test_collect_config_values_sources() {
        let default = NotegraphConfig::default();

        let mut global = NotegraphConfig::default();
        global.logging.level = "debug".to_string();

        let mut local = NotegraphConfig::default();
        local.graph.unresolved = UnresolvedMode::Placeholder;

        let mut effective = NotegraphConfig::default();
        effective.logging.level = "debug".to_string();
        effective.graph.unresolved = UnresolvedMode::Placeholder;
        effective.index.extension = "txt".to_string();
        effective.vault.path = Some(PathBuf::from("/notes"));

        let values = collect_config_values(&default, &global, &local, &effective).unwrap();

        assert_eq!(find(&values, "logging.level").source, "global");
        assert_eq!(find(&values, "graph.unresolved").source, "local");
        assert_eq!(find(&values, "graph.unresolved").value, "placeholder");
        assert_eq!(find(&values, "index.extension").source, "cli");
        assert_eq!(find(&values, "logging.format").source, "default");
        assert_eq!(find(&values, "vault.path").value, "/notes");
    }

    #[test]
    fn test_unset_vault_path_not_listed() {
        let config = NotegraphConfig::default();
        let values = collect_config_values(&config, &config, &config, &config).unwrap();
        assert!(values.iter().all(|v| v.key != "vault.path"));
        assert!(values.iter().all(|v| v.source == "default"));
    }
}
