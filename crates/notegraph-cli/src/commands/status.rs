//! Status command - Show vault, configuration and index status

use anyhow::Result;
use clap::Args;
use notegraph_config::NotegraphConfig;
use notegraph_core::{GraphBuilder, GraphStats, IndexStats};

use super::{graph_options, open_index};
use crate::GlobalOptions;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the status command
pub fn execute(args: StatusArgs, global: &GlobalOptions, config: &NotegraphConfig) -> Result<()> {
    let vault = config.vault_path();
    let vault_exists = vault.is_some_and(|p| p.is_dir());

    let (index, report) = open_index(global, config)?;
    let index_stats = index.stats();
    let graph_stats = GraphBuilder::with_options(&index, graph_options(config)).stats();

    if args.json {
        let status = serde_json::json!({
            "vault": vault,
            "vaultExists": vault_exists,
            "extension": config.index.extension,
            "unresolved": config.graph.unresolved.to_string(),
            "index": index_stats,
            "graph": graph_stats,
            "warnings": report.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Notegraph Status");
    println!("================\n");

    match vault {
        Some(path) => println!(
            "Vault:      {} ({})",
            path.display(),
            if vault_exists { "exists" } else { "not found" }
        ),
        None => println!("Vault:      not configured"),
    }
    println!("Extension:  .{}", config.index.extension);
    println!("Unresolved: {}", config.graph.unresolved);

    print_index_stats(&index_stats, &graph_stats);

    if !report.warnings.is_empty() {
        println!("\nSkipped ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  {}: {}", warning.path, warning.message);
        }
    }

    if !vault_exists {
        println!("\nPass --vault <DIR> or set [vault] path in the configuration.");
    }

    Ok(())
}

fn print_index_stats(index: &IndexStats, graph: &GraphStats) {
    println!("\nIndex:");
    println!("  Notes:  {}", index.total_files);
    println!("  Links:  {}", index.total_links);

    println!("\nGraph:");
    println!("  Nodes:  {}", graph.node_count);
    println!("  Edges:  {}", graph.edge_count);
}
