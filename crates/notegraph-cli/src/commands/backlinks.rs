//! Backlinks command - Notes that link to a given note

use anyhow::Result;
use clap::Args;
use notegraph_config::NotegraphConfig;

use super::{open_index, print_info, print_json, resolve_note};
use crate::GlobalOptions;

/// Arguments for the backlinks command
#[derive(Args, Debug)]
pub struct BacklinksArgs {
    /// Note id, name, or path inside the vault
    note: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the backlinks command
pub fn execute(
    args: BacklinksArgs,
    global: &GlobalOptions,
    config: &NotegraphConfig,
) -> Result<()> {
    let (index, _) = open_index(global, config)?;
    let id = resolve_note(&index, &args.note);
    let backlinks = index.backlinks(&id);

    if args.json {
        return print_json(&backlinks);
    }

    if backlinks.is_empty() {
        print_info(&format!("No backlinks to {}", id), global.quiet);
        return Ok(());
    }

    for backlink in &backlinks {
        println!("{}", backlink.source_path);
        if !backlink.context.is_empty() {
            println!("    {}", backlink.context);
        }
    }

    Ok(())
}
