//! Graph command - Node/edge projection of the vault

use anyhow::Result;
use clap::Args;
use notegraph_config::{ConfigOverrides, NotegraphConfig, UnresolvedMode};
use notegraph_core::GraphBuilder;

use super::{graph_options, open_index, print_json};
use crate::GlobalOptions;

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Only print node and edge counts
    #[arg(long)]
    stats: bool,

    /// Handling of unresolved links (drop, placeholder)
    #[arg(long, value_parser = parse_unresolved_mode)]
    unresolved: Option<UnresolvedMode>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Parse unresolved link mode from string
fn parse_unresolved_mode(s: &str) -> Result<UnresolvedMode, String> {
    s.parse()
        .map_err(|e: notegraph_config::ConfigError| e.to_string())
}

/// Apply `--unresolved` over the loaded configuration.
fn with_unresolved(config: &NotegraphConfig, mode: Option<UnresolvedMode>) -> NotegraphConfig {
    let mut config = config.clone();
    config.apply_overrides(&ConfigOverrides {
        unresolved: mode,
        ..Default::default()
    });
    config
}

/// Execute the graph command
pub fn execute(args: GraphArgs, global: &GlobalOptions, config: &NotegraphConfig) -> Result<()> {
    let config = with_unresolved(config, args.unresolved);
    let (index, _) = open_index(global, &config)?;

    let graph = GraphBuilder::with_options(&index, graph_options(&config)).build();

    if args.stats {
        let stats = graph.stats();
        if args.json {
            return print_json(&stats);
        }
        println!("Nodes: {}", stats.node_count);
        println!("Edges: {}", stats.edge_count);
        return Ok(());
    }

    if args.json {
        return print_json(&graph);
    }

    println!("Nodes ({}):", graph.nodes.len());
    for node in &graph.nodes {
        println!("  {} [{}] links: {}", node.label, node.id, node.link_count);
    }

    println!("\nEdges ({}):", graph.edges.len());
    for edge in &graph.edges {
        println!("  {} -> {}", edge.source, edge.target);
    }

    Ok(())
}
