//! Links command - Outgoing links of a note, resolved against the vault

use anyhow::{Context, Result};
use clap::Args;
use notegraph_config::NotegraphConfig;

use super::{create_index, print_info, print_json, resolve_note};
use crate::GlobalOptions;

/// Arguments for the links command
#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Note id, name, or path inside the vault
    note: String,

    /// Only show links that do not resolve
    #[arg(long)]
    unresolved: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the links command
///
/// Reads the note directly; no rebuild is needed.
pub fn execute(args: LinksArgs, global: &GlobalOptions, config: &NotegraphConfig) -> Result<()> {
    let index = create_index(config);
    let id = resolve_note(&index, &args.note);

    let mut links = index
        .link_info(&id)
        .with_context(|| format!("Failed to read note '{}'", args.note))?;
    if args.unresolved {
        links.retain(|link| !link.exists);
    }

    if args.json {
        return print_json(&links);
    }

    if links.is_empty() {
        print_info(&format!("No links in {}", id), global.quiet);
        return Ok(());
    }

    for link in &links {
        if link.exists {
            println!("[[{}]] -> {}", link.text, link.target_path);
        } else {
            println!("[[{}]] (unresolved)", link.text);
        }
    }

    Ok(())
}
