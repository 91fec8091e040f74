//! In-memory document source.
//!
//! Relies on the provided `DocumentSource::walk` implementation, so it also
//! exercises the listing-based walk used by non-filesystem sources.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use notegraph_core::{DocumentEntry, DocumentSource, SourceError};
use parking_lot::RwLock;

/// Documents held in a map keyed by id, with optional failures.
#[derive(Default)]
pub struct MemorySource {
    root: PathBuf,
    documents: RwLock<BTreeMap<String, String>>,
    unreadable: HashSet<String>,
    unlistable: HashSet<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("memory"),
            ..Default::default()
        }
    }

    pub fn with(self, id: &str, content: &str) -> Self {
        self.documents
            .write()
            .insert(id.to_string(), content.to_string());
        self
    }

    /// Make `read_document` fail for this id while it still shows up in walks.
    pub fn with_unreadable(mut self, id: &str, content: &str) -> Self {
        self.unreadable.insert(id.to_string());
        self.with(id, content)
    }

    /// Make `list_documents` fail for this directory id.
    pub fn with_unlistable_dir(mut self, dir: &str) -> Self {
        self.unlistable.insert(dir.to_string());
        self
    }

    pub fn set(&self, id: &str, content: &str) {
        self.documents
            .write()
            .insert(id.to_string(), content.to_string());
    }

    fn permission_denied(id: &str) -> SourceError {
        SourceError::io(
            id,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        )
    }
}

impl DocumentSource for MemorySource {
    fn root_path(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn root_exists(&self) -> bool {
        true
    }

    fn read_document(&self, id: &str) -> Result<String, SourceError> {
        if self.unreadable.contains(id) {
            return Err(Self::permission_denied(id));
        }
        self.documents
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    fn list_documents(&self, dir: &str) -> Result<Vec<DocumentEntry>, SourceError> {
        if self.unlistable.contains(dir) {
            return Err(Self::permission_denied(dir));
        }
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut entries: Vec<DocumentEntry> = Vec::new();
        for id in self.documents.read().keys() {
            let Some(rest) = id.strip_prefix(&prefix) else {
                continue;
            };
            let (name, is_dir) = match rest.split_once('/') {
                Some((child_dir, _)) => (child_dir, true),
                None => (rest, false),
            };
            if !entries.iter().any(|e| e.name == name) {
                entries.push(DocumentEntry {
                    name: name.to_string(),
                    is_dir,
                    modified: None,
                });
            }
        }
        Ok(entries)
    }

    fn exists(&self, id: &str) -> bool {
        let documents = self.documents.read();
        documents.contains_key(id)
            || documents
                .keys()
                .any(|doc| doc.starts_with(&format!("{id}/")))
    }
}
