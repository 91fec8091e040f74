//! Graph Builder
//!
//! Projects the link index into a node/edge graph. The builder reads a deep
//! copy of the forward index, so it holds no lock while resolving and may run
//! alongside a rebuild (seeing the previous, consistent snapshot).
//!
//! ## Rules
//!
//! - Only documents passing the type filter take part: ids without an
//!   extension, or ids with the primary extension.
//! - Every eligible indexed document becomes a node, even without links.
//! - Each reference is resolved again; unresolved references are dropped
//!   unless [`UnresolvedLinks::Placeholder`] is selected.
//! - Edges keep multiplicity. `link_count` grows by one on both endpoints the
//!   first time a pair of documents becomes connected, so a mutual pair counts
//!   once for each side.
//!
//! ## Usage
//!
//! ```ignore
//! let index = LinkIndex::new(Arc::new(FsSource::new("vault")));
//! index.rebuild()?;
//! let graph = GraphBuilder::new(&index).build();
//! println!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len());
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::graph::{Graph, GraphEdge, GraphNode, GraphStats, UnresolvedLinks};
use crate::index::LinkIndex;
use crate::paths::DocumentExtension;

/// Options for the graph projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    pub unresolved: UnresolvedLinks,
}

/// Builds [`Graph`] projections from a [`LinkIndex`].
pub struct GraphBuilder<'a> {
    index: &'a LinkIndex,
    options: GraphOptions,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder with default options.
    pub fn new(index: &'a LinkIndex) -> Self {
        Self::with_options(index, GraphOptions::default())
    }

    /// Create a builder with custom options.
    pub fn with_options(index: &'a LinkIndex, options: GraphOptions) -> Self {
        Self { index, options }
    }

    /// Build the full graph from the current index snapshot.
    pub fn build(&self) -> Graph {
        let extension = self.index.extension();
        let resolver = self.index.resolver();

        let mut snapshot: Vec<(String, Vec<String>)> =
            self.index.forward_snapshot().into_iter().collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));

        let mut nodes: HashMap<String, GraphNode> = HashMap::new();
        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut connected: HashSet<(String, String)> = HashSet::new();

        for (source_id, references) in snapshot {
            if !extension.is_eligible(&source_id) {
                continue;
            }
            ensure_node(&mut nodes, &source_id, extension);

            for reference in &references {
                let target_id = match resolver.resolve(reference) {
                    Some(target) => target,
                    None => match self.options.unresolved {
                        UnresolvedLinks::Drop => continue,
                        UnresolvedLinks::Placeholder => extension.ensure(reference),
                    },
                };
                if !extension.is_eligible(&target_id) {
                    continue;
                }

                ensure_node(&mut nodes, &target_id, extension);
                edges.push(GraphEdge::new(source_id.as_str(), target_id.as_str()));

                if connected.insert(pair_key(&source_id, &target_id)) {
                    bump(&mut nodes, &source_id);
                    if target_id != source_id {
                        bump(&mut nodes, &target_id);
                    }
                }
            }
        }

        let mut nodes: Vec<GraphNode> = nodes.into_values().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        edges.sort();

        debug!(
            "Built graph projection: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );

        Graph { nodes, edges }
    }

    /// Node and edge counts of a fresh projection.
    pub fn stats(&self) -> GraphStats {
        self.build().stats()
    }
}

fn ensure_node(nodes: &mut HashMap<String, GraphNode>, id: &str, extension: &DocumentExtension) {
    if !nodes.contains_key(id) {
        nodes.insert(id.to_string(), GraphNode::new(id, extension.base_name(id)));
    }
}

fn bump(nodes: &mut HashMap<String, GraphNode>, id: &str) {
    if let Some(node) = nodes.get_mut(id) {
        node.link_count += 1;
    }
}

/// Order-independent key for a pair of documents.
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
