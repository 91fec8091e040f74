//! CLI command implementations
//!
//! This module contains all Notegraph CLI command implementations and the
//! helpers they share for configuration and indexing.

pub mod backlinks;
pub mod config;
pub mod graph;
pub mod index;
pub mod links;
pub mod status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use notegraph_config::{ConfigLoader, NotegraphConfig, UnresolvedMode};
use notegraph_core::{
    DocumentExtension, FsSource, GraphOptions, IndexOptions, LinkIndex, RebuildReport,
    UnresolvedLinks,
};
use serde::Serialize;

use crate::progress::{finish_spinner, finish_spinner_warn, spinner};
use crate::GlobalOptions;

/// Load configuration with optional config file override.
///
/// The vault is taken from `--vault`, then the global config, then the
/// current directory, so the vault's local config is found in all three cases.
pub fn load_config(global: &GlobalOptions) -> Result<NotegraphConfig> {
    let mut loader = ConfigLoader::new();
    let mut overrides = global.to_config_overrides();

    if let Some(ref config_path) = global.config {
        let mut config = loader
            .load_file(config_path, Some(&overrides))
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?;
        if config.vault_path().is_none() {
            config.vault.path = Some(current_dir()?);
        }
        return Ok(config);
    }

    if overrides.vault_path.is_none() {
        let from_global = loader
            .load_global()
            .context("Failed to load global configuration")?
            .and_then(|c| c.vault_path().map(Path::to_path_buf));
        overrides.vault_path = Some(match from_global {
            Some(path) => path,
            None => current_dir()?,
        });
    }

    loader
        .load(overrides.vault_path.as_deref(), Some(&overrides))
        .context("Failed to load configuration")
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to get current directory")
}

/// Index options derived from configuration.
pub fn index_options(config: &NotegraphConfig) -> IndexOptions {
    IndexOptions {
        extension: DocumentExtension::new(&config.index.extension),
    }
}

/// Graph options derived from configuration.
pub fn graph_options(config: &NotegraphConfig) -> GraphOptions {
    GraphOptions {
        unresolved: unresolved_links(config.graph.unresolved),
    }
}

/// Map the configured unresolved mode onto the core option.
pub fn unresolved_links(mode: UnresolvedMode) -> UnresolvedLinks {
    match mode {
        UnresolvedMode::Drop => UnresolvedLinks::Drop,
        UnresolvedMode::Placeholder => UnresolvedLinks::Placeholder,
    }
}

/// Create the link index for the configured vault (not yet rebuilt).
pub fn create_index(config: &NotegraphConfig) -> LinkIndex {
    let source = FsSource::from_optional(config.vault.path.clone());
    LinkIndex::with_options(Arc::new(source), index_options(config))
}

/// Create and rebuild the link index, with a spinner unless quiet.
pub fn open_index(
    global: &GlobalOptions,
    config: &NotegraphConfig,
) -> Result<(LinkIndex, RebuildReport)> {
    let index = create_index(config);

    let pb = spinner("Indexing notes...", global.quiet);
    let report = index.rebuild().context("Failed to index vault")?;

    let summary = format!(
        "Indexed {} notes ({} links)",
        report.files_indexed, report.links_indexed
    );
    if report.warnings.is_empty() {
        finish_spinner(pb, &summary);
    } else {
        finish_spinner_warn(
            pb,
            &format!("{}, {} skipped", summary, report.warnings.len()),
        );
    }

    Ok((index, report))
}

/// Turn a note argument into a document id.
///
/// Accepts an id (`folder/note.md`), a reference (`note`), or a path under
/// the vault. Arguments that resolve to no document are returned as given, so
/// backlink lookups still find notes citing a missing target.
pub fn resolve_note(index: &LinkIndex, note: &str) -> String {
    let relative = index
        .source()
        .root_path()
        .and_then(|root| Path::new(note).strip_prefix(root).ok())
        .map(|p| p.to_string_lossy().replace('\\', "/"));
    let note = relative.as_deref().unwrap_or(note);

    index
        .resolver()
        .resolve(note)
        .unwrap_or_else(|| note.to_string())
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a warning message to stderr.
pub fn print_warning(message: &str) {
    eprintln!("warning: {}", message);
}

/// Print an info message (respects quiet flag).
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", message);
    }
}
