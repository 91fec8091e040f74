//! Index command - Rebuild the link index and report the result

use anyhow::Result;
use clap::Args;
use notegraph_config::NotegraphConfig;

use super::{open_index, print_json, print_warning};
use crate::GlobalOptions;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the index command
pub fn execute(args: IndexArgs, global: &GlobalOptions, config: &NotegraphConfig) -> Result<()> {
    let (index, report) = open_index(global, config)?;

    if args.json {
        return print_json(&report);
    }

    let stats = index.stats();
    println!("Notes: {}", stats.total_files);
    println!("Links: {}", stats.total_links);

    for warning in &report.warnings {
        print_warning(&format!("skipped {}: {}", warning.path, warning.message));
    }

    Ok(())
}
