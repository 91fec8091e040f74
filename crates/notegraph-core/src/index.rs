//! Link Index Store
//!
//! Owns the forward index (document → outgoing references) and the backward
//! index (reference key → referencing documents). Both maps sit behind one
//! `RwLock` and are only ever read or replaced together:
//!
//! - [`LinkIndex::rebuild`] holds the write lock for the whole walk, parse and
//!   resolve pass, so readers see either the previous complete index or the
//!   new complete index.
//! - Every read operation takes the shared lock.
//!
//! The index lives in memory only and is rebuilt from scratch each time.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::parser::parse_references;
use crate::paths::{file_name, DocumentExtension};
use crate::resolver::{NameIndex, Resolver};
use crate::source::{DocumentSource, DocumentWarning, SourceError};

/// Maximum context length (in characters) before truncation.
pub const CONTEXT_MAX_CHARS: usize = 100;

/// Marker appended to truncated context lines.
const CONTEXT_ELLIPSIS: &str = "...";

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A caller-supplied document could not be read
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The collection root exists but cannot be walked at all
    #[error("failed to walk collection root '{path}': {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: SourceError,
    },
}

// ============================================================================
// Models
// ============================================================================

/// Document id → ordered, de-duplicated outgoing references.
pub type ForwardIndex = HashMap<String, Vec<String>>;

/// Reference key → documents citing it (each at most once per key).
type BackwardIndex = HashMap<String, Vec<String>>;

/// One outgoing link of a document, resolved against the current collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Reference text as written
    pub text: String,
    /// Resolved document id (empty when unresolved)
    pub target_path: String,
    /// Whether the reference resolved
    pub exists: bool,
}

/// A document citing another one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backlink {
    pub source_path: String,
    pub source_title: String,
    /// First line of the source mentioning the target (may be empty)
    pub context: String,
}

/// Index-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_files: usize,
    pub total_links: usize,
}

/// Outcome of a full rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildReport {
    pub files_indexed: usize,
    pub links_indexed: usize,
    /// Documents and directories skipped because they could not be read
    pub warnings: Vec<DocumentWarning>,
}

/// Options controlling which documents are indexed.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Primary document extension; other files are not scanned
    pub extension: DocumentExtension,
}

#[derive(Debug, Default)]
struct IndexState {
    forward: ForwardIndex,
    backward: BackwardIndex,
}

impl IndexState {
    fn add_backlink(&mut self, key: &str, source_id: &str) {
        let sources = self.backward.entry(key.to_string()).or_default();
        // Documents are merged one at a time, so a repeat is always the tail
        if sources.last().map(String::as_str) != Some(source_id) {
            sources.push(source_id.to_string());
        }
    }
}

// ============================================================================
// Link Index
// ============================================================================

/// Thread-safe forward/backward link index over one document collection.
///
/// Construct once per collection session and share it behind an `Arc`.
pub struct LinkIndex {
    source: Arc<dyn DocumentSource>,
    options: IndexOptions,
    state: RwLock<IndexState>,
}

impl LinkIndex {
    /// Create an empty index with default options.
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self::with_options(source, IndexOptions::default())
    }

    /// Create an empty index with custom options.
    pub fn with_options(source: Arc<dyn DocumentSource>, options: IndexOptions) -> Self {
        Self {
            source,
            options,
            state: RwLock::new(IndexState::default()),
        }
    }

    /// The document source this index reads from.
    pub fn source(&self) -> &dyn DocumentSource {
        &*self.source
    }

    /// The primary document extension.
    pub fn extension(&self) -> &DocumentExtension {
        &self.options.extension
    }

    /// A resolver over this index's source that walks on demand.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&*self.source, &self.options.extension)
    }

    /// Rebuild both indices from a full collection walk.
    ///
    /// A missing or unconfigured root yields an empty index and `Ok`. Only a
    /// root that exists but cannot be walked is an error. Documents that fail
    /// to read are skipped and reported in [`RebuildReport::warnings`].
    pub fn rebuild(&self) -> Result<RebuildReport, IndexError> {
        let mut state = self.state.write();
        *state = IndexState::default();

        let Some(root) = self.source.root_path() else {
            warn!("No document collection configured; link index is empty");
            return Ok(RebuildReport::default());
        };
        if !self.source.root_exists() {
            warn!(
                "Collection root {:?} does not exist; link index is empty",
                root
            );
            return Ok(RebuildReport::default());
        }

        let walk = self
            .source
            .walk()
            .map_err(|source| IndexError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            })?;

        let extension = &self.options.extension;
        let names = NameIndex::from_files(&walk.files, extension);
        let resolver = Resolver::with_name_index(&*self.source, extension, names);
        let source = &*self.source;

        let documents: Vec<&String> = walk
            .files
            .iter()
            .filter(|id| extension.matches(file_name(id)))
            .collect();

        debug!(
            "Scanning {} of {} collection files",
            documents.len(),
            walk.files.len()
        );

        // Read, parse and resolve in parallel; collect keeps walk order
        let scanned: Vec<(&String, Result<Vec<(String, Option<String>)>, SourceError>)> =
            documents
                .par_iter()
                .map(|id| {
                    let outcome = source.read_document(id).map(|text| {
                        parse_references(&text)
                            .into_iter()
                            .map(|reference| {
                                let resolved = resolver.resolve(&reference);
                                (reference, resolved)
                            })
                            .collect()
                    });
                    (*id, outcome)
                })
                .collect();

        let mut report = RebuildReport {
            warnings: walk.warnings,
            ..Default::default()
        };

        for (id, outcome) in scanned {
            let links = match outcome {
                Ok(links) => links,
                Err(e) => {
                    warn!("Skipping unreadable document {}: {}", id, e);
                    report.warnings.push(DocumentWarning::new(id.as_str(), e));
                    continue;
                }
            };

            for (reference, resolved) in &links {
                state.add_backlink(reference, id);
                if let Some(resolved) = resolved.as_deref().filter(|r| *r != reference.as_str()) {
                    state.add_backlink(resolved, id);
                }
            }

            report.links_indexed += links.len();
            let references = links.into_iter().map(|(reference, _)| reference).collect();
            state.forward.insert(id.clone(), references);
        }

        report.files_indexed = state.forward.len();
        info!(
            "Rebuilt link index: {} files, {} links, {} warnings",
            report.files_indexed,
            report.links_indexed,
            report.warnings.len()
        );

        Ok(report)
    }

    /// Documents citing `id`, by full id or by base name.
    ///
    /// Sources are de-duplicated within this call; the first key that lists a
    /// source wins. Context is read from the source document on a best-effort
    /// basis and is empty if that read fails.
    pub fn backlinks(&self, id: &str) -> Vec<Backlink> {
        let state = self.state.read();
        let extension = &self.options.extension;
        let base_name = extension.base_name(id);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut backlinks = Vec::new();

        for key in [id, base_name] {
            let Some(sources) = state.backward.get(key) else {
                continue;
            };
            for source_path in sources {
                if !seen.insert(source_path.as_str()) {
                    continue;
                }
                backlinks.push(Backlink {
                    source_path: source_path.clone(),
                    source_title: extension.base_name(source_path).to_string(),
                    context: self.backlink_context(source_path, base_name),
                });
            }
        }

        backlinks
    }

    /// Parse and resolve the current content of `id`.
    ///
    /// Does not consult the stored index, so it reflects the document as it
    /// is now even when the index is stale.
    pub fn link_info(&self, id: &str) -> Result<Vec<Link>, IndexError> {
        let text = self.source.read_document(id)?;
        let resolver = self.resolver();

        let links = parse_references(&text)
            .into_iter()
            .map(|text| {
                let target = resolver.resolve(&text);
                Link {
                    exists: target.is_some(),
                    target_path: target.unwrap_or_default(),
                    text,
                }
            })
            .collect();

        Ok(links)
    }

    /// Snapshot of index counters.
    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            total_files: state.forward.len(),
            total_links: state.forward.values().map(Vec::len).sum(),
        }
    }

    /// Deep copy of the forward index.
    ///
    /// Work done on the copy needs no lock and may overlap a new rebuild.
    pub fn forward_snapshot(&self) -> ForwardIndex {
        self.state.read().forward.clone()
    }

    fn backlink_context(&self, source_path: &str, base_name: &str) -> String {
        match self.source.read_document(source_path) {
            Ok(text) => extract_context(&text, base_name),
            Err(e) => {
                debug!("No backlink context for {}: {}", source_path, e);
                String::new()
            }
        }
    }
}

/// First line containing `[[<base_name>`, trimmed and truncated.
///
/// This is a substring heuristic: it misses references split across lines or
/// written as a resolved path, and may pick a line where the name appears
/// outside a link construct.
pub fn extract_context(text: &str, base_name: &str) -> String {
    let pattern = format!("[[{base_name}");

    let Some(line) = text.split('\n').find(|line| line.contains(&pattern)) else {
        return String::new();
    };

    let line = line.trim();
    if line.chars().count() > CONTEXT_MAX_CHARS {
        let truncated: String = line.chars().take(CONTEXT_MAX_CHARS).collect();
        format!("{truncated}{CONTEXT_ELLIPSIS}")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsSource;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, id: &str, content: &str) {
        let path = root.join(id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn index_for(root: &Path) -> LinkIndex {
        LinkIndex::new(Arc::new(FsSource::new(root)))
    }

    #[test]
    fn test_extract_context() {
        let text = "# Source\n\n  Some context around [[target]] link here  \nmore [[target]]";
        assert_eq!(
            extract_context(text, "target"),
            "Some context around [[target]] link here"
        );
        assert_eq!(extract_context(text, "other"), "");
    }

    #[test]
    fn test_extract_context_truncates_on_chars() {
        let line = format!("[[t]] {}", "é".repeat(150));
        let context = extract_context(&line, "t");
        assert!(context.ends_with("..."));
        assert_eq!(context.chars().count(), CONTEXT_MAX_CHARS + 3);

        let short = format!("[[t]]{}", "x".repeat(95));
        assert_eq!(extract_context(&short, "t"), short);
    }

    #[test]
    fn test_rebuild_unconfigured_is_empty() {
        let index = LinkIndex::new(Arc::new(FsSource::unconfigured()));
        let report = index.rebuild().unwrap();
        assert_eq!(report, RebuildReport::default());
        assert_eq!(index.stats(), IndexStats::default());
    }

    #[test]
    fn test_rebuild_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let index = index_for(&temp.path().join("nowhere"));
        assert!(index.rebuild().is_ok());
        assert_eq!(index.stats().total_files, 0);
    }

    #[test]
    fn test_rebuild_double_keys_backward_index() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "source.md", "[[folder/target]] and [[missing]]");
        write(temp.path(), "folder/target.md", "# Target");

        let index = index_for(temp.path());
        index.rebuild().unwrap();

        let state = index.state.read();
        assert_eq!(state.backward["folder/target"], vec!["source.md"]);
        assert_eq!(state.backward["folder/target.md"], vec!["source.md"]);
        assert_eq!(state.backward["missing"], vec!["source.md"]);
        assert!(!state.backward.contains_key("missing.md"));
    }

    #[test]
    fn test_backward_entries_hold_each_source_once() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "source.md", "[[note]] then [[note.md]]");
        write(temp.path(), "note.md", "");

        let index = index_for(temp.path());
        index.rebuild().unwrap();

        let state = index.state.read();
        assert_eq!(state.backward["note.md"], vec!["source.md"]);
        assert_eq!(state.backward["note"], vec!["source.md"]);
    }

    #[test]
    fn test_rebuild_replaces_previous_state() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.md", "[[b]]");
        write(temp.path(), "b.md", "");

        let index = index_for(temp.path());
        index.rebuild().unwrap();
        assert_eq!(index.stats().total_files, 2);

        fs::remove_file(temp.path().join("a.md")).unwrap();
        index.rebuild().unwrap();

        assert_eq!(
            index.stats(),
            IndexStats {
                total_files: 1,
                total_links: 0
            }
        );
        assert!(index.backlinks("b.md").is_empty());
    }

    #[test]
    fn test_link_info_propagates_read_errors() {
        let temp = TempDir::new().unwrap();
        let index = index_for(temp.path());
        assert!(matches!(
            index.link_info("ghost.md"),
            Err(IndexError::Source(SourceError::NotFound(_)))
        ));
    }
}
