//! Document source collaborator.
//!
//! The indexing engine never touches the filesystem directly; it reads
//! documents, lists directories and checks existence through a
//! [`DocumentSource`]. [`FsSource`] is the filesystem implementation used by
//! the CLI.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::paths::{is_hidden, join_id};

/// Errors raised by a document source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no document collection configured")]
    RootNotConfigured,

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid document id '{0}': must be a path relative to the collection root")]
    InvalidId(String),

    #[error("failed to access '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Create an Io error, mapping `NotFound` kinds to [`SourceError::NotFound`].
    pub fn io(id: impl Into<String>, source: std::io::Error) -> Self {
        let id = id.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(id)
        } else {
            Self::Io { id, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub name: String,
    pub is_dir: bool,
    pub modified: Option<SystemTime>,
}

/// A document that was skipped during a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWarning {
    /// Document or directory id the problem relates to
    pub path: String,
    /// Human-readable reason
    pub message: String,
}

impl DocumentWarning {
    pub fn new(path: impl Into<String>, message: impl ToString) -> Self {
        Self {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result of walking a whole collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionWalk {
    /// Ids of every non-hidden, non-directory entry, in walk order
    pub files: Vec<String>,
    /// Subdirectories that could not be listed
    pub warnings: Vec<DocumentWarning>,
}

/// Storage capabilities consumed by the indexing engine.
pub trait DocumentSource: Send + Sync {
    /// Root of the collection, or `None` when no collection is configured.
    fn root_path(&self) -> Option<&Path>;

    /// Whether the configured root is present.
    fn root_exists(&self) -> bool {
        self.root_path().is_some_and(Path::is_dir)
    }

    /// Read a document's full text.
    fn read_document(&self, id: &str) -> Result<String>;

    /// List the direct children of a directory (`""` is the root).
    fn list_documents(&self, dir: &str) -> Result<Vec<DocumentEntry>>;

    /// Whether a document or directory with this id exists.
    fn exists(&self, id: &str) -> bool;

    /// Walk the whole collection depth-first.
    ///
    /// Hidden entries are skipped and hidden directories are not descended
    /// into. Entries are visited in name order within each directory. An
    /// unreadable root is an error; unreadable subdirectories become warnings.
    fn walk(&self) -> Result<CollectionWalk> {
        let mut walk = CollectionWalk::default();
        let root_entries = self.list_documents("")?;
        walk_entries(self, "", root_entries, &mut walk);
        Ok(walk)
    }
}

fn walk_entries<S: DocumentSource + ?Sized>(
    source: &S,
    dir: &str,
    mut entries: Vec<DocumentEntry>,
    walk: &mut CollectionWalk,
) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    for entry in entries {
        if is_hidden(&entry.name) {
            continue;
        }
        let id = join_id(dir, &entry.name);
        if !entry.is_dir {
            walk.files.push(id);
            continue;
        }
        match source.list_documents(&id) {
            Ok(children) => walk_entries(source, &id, children, walk),
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", id, e);
                walk.warnings.push(DocumentWarning::new(id, e));
            }
        }
    }
}

// ============================================================================
// Filesystem source
// ============================================================================

/// Filesystem-backed document source.
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    root: Option<PathBuf>,
}

impl FsSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Create a source with no collection configured.
    pub fn unconfigured() -> Self {
        Self { root: None }
    }

    /// Create from an optional root; empty paths count as unconfigured.
    pub fn from_optional(root: Option<PathBuf>) -> Self {
        Self {
            root: root.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// Map a document id to an absolute path under the root.
    pub fn full_path(&self, id: &str) -> Result<PathBuf> {
        let root = self.root.as_ref().ok_or(SourceError::RootNotConfigured)?;
        let relative = Path::new(id);
        let valid = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !valid {
            return Err(SourceError::InvalidId(id.to_string()));
        }
        Ok(root.join(relative))
    }
}

impl DocumentSource for FsSource {
    fn root_path(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn read_document(&self, id: &str) -> Result<String> {
        let path = self.full_path(id)?;
        let bytes = fs::read(&path).map_err(|e| SourceError::io(id, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn list_documents(&self, dir: &str) -> Result<Vec<DocumentEntry>> {
        let path = self.full_path(dir)?;
        let mut entries = Vec::new();

        for entry in fs::read_dir(&path).map_err(|e| SourceError::io(dir, e))? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry in {:?}: {}", path, e);
                    continue;
                }
            };
            let metadata = entry.metadata().ok();
            entries.push(DocumentEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: metadata.as_ref().is_some_and(|m| m.is_dir()),
                modified: metadata.and_then(|m| m.modified().ok()),
            });
        }

        Ok(entries)
    }

    fn exists(&self, id: &str) -> bool {
        self.full_path(id).is_ok_and(|p| p.exists())
    }

    fn walk(&self) -> Result<CollectionWalk> {
        let root = self.root.as_deref().ok_or(SourceError::RootNotConfigured)?;
        let mut walk = CollectionWalk::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Always traverse the root itself, even if its name is hidden
                // (temp directories are often called ".tmpXXXXXX")
                e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    if e.depth() == 0 {
                        let display = root.display().to_string();
                        return Err(SourceError::io(display, e.into()));
                    }
                    let id = e
                        .path()
                        .and_then(|p| relative_id(root, p))
                        .unwrap_or_default();
                    warn!("Error walking collection at {:?}: {}", id, e);
                    walk.warnings.push(DocumentWarning::new(id, e));
                    continue;
                }
            };

            if entry.depth() == 0 || entry.file_type().is_dir() {
                continue;
            }

            if let Some(id) = relative_id(root, entry.path()) {
                walk.files.push(id);
            }
        }

        Ok(walk)
    }
}

/// Convert an absolute path under `root` into a `/`-separated document id.
fn relative_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}
