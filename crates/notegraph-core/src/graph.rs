//! Graph projection model.
//!
//! Nodes and edges derived from the link index for visualization. These are
//! ephemeral values recomputed on every request and never persisted. Field
//! names serialize in camelCase (`linkCount`) for front-end consumers.

use serde::{Deserialize, Serialize};

// ============================================================================
// Unresolved link handling
// ============================================================================

/// What the graph projection does with references that do not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedLinks {
    /// Drop the reference: no node, no edge
    #[default]
    Drop,
    /// Add a placeholder node named after the reference plus the extension
    Placeholder,
}

impl UnresolvedLinks {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnresolvedLinks::Drop => "drop",
            UnresolvedLinks::Placeholder => "placeholder",
        }
    }
}

impl std::fmt::Display for UnresolvedLinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Nodes and edges
// ============================================================================

/// A document in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Document id
    pub id: String,
    /// Display name (base name without extension)
    pub label: String,
    /// Number of distinct documents this node is linked with, in either direction.
    ///
    /// Each connected pair counts once: a reverse edge (B -> A after A -> B) or
    /// a parallel edge between the same two documents adds an edge but does not
    /// raise either endpoint's count. A self-link counts once.
    pub link_count: usize,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            link_count: 0,
        }
    }
}

/// A directed link between two documents. Parallel edges are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Full graph projection: nodes sorted by id, edges by (source, target).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    /// Node and edge counts.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
        }
    }

    /// Find a node by document id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes
            .binary_search_by(|n| n.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.nodes[i])
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Graph size summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}
