//! Notegraph Core - Wiki-link indexing and graph projection
//!
//! This crate provides the link and graph engine for a tree of Markdown notes
//! that reference each other with `[[Target]]`, `[[Target|Alias]]` and
//! `[[Target#Heading]]` tokens:
//! - Reference parsing from raw document text
//! - Reference resolution (direct path, then collection-wide name search)
//! - A thread-safe forward/backward link index with backlink context
//! - A node/edge graph projection with per-node connectivity counts
//!
//! All storage access goes through the [`DocumentSource`] trait;
//! [`FsSource`] is the filesystem implementation.

pub mod builder;
pub mod graph;
pub mod index;
pub mod parser;
pub mod paths;
pub mod resolver;
pub mod source;

// Re-exports for convenience
pub use builder::{GraphBuilder, GraphOptions};
pub use graph::{Graph, GraphEdge, GraphNode, GraphStats, UnresolvedLinks};
pub use index::{
    extract_context, Backlink, ForwardIndex, IndexError, IndexOptions, IndexStats, Link,
    LinkIndex, RebuildReport, CONTEXT_MAX_CHARS,
};
pub use parser::parse_references;
pub use paths::{DocumentExtension, DEFAULT_EXTENSION};
pub use resolver::{NameIndex, Resolver};
pub use source::{
    CollectionWalk, DocumentEntry, DocumentSource, DocumentWarning, FsSource, SourceError,
};
