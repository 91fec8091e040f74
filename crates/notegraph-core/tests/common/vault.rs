//! Temporary vault on disk.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use notegraph_core::{FsSource, LinkIndex};
use tempfile::{Builder as TempBuilder, TempDir};

/// A temporary Markdown vault.
pub struct TestVault {
    dir: TempDir,
}

impl TestVault {
    /// Create an empty vault with a non-hidden directory name.
    pub fn new() -> Self {
        let dir = TempBuilder::new()
            .prefix("notegraph_test_")
            .tempdir()
            .expect("Failed to create temp dir");
        Self { dir }
    }

    /// Write a note (creating parent directories) and return self for chaining.
    pub fn with(self, id: &str, content: &str) -> Self {
        self.write(id, content);
        self
    }

    pub fn write(&self, id: &str, content: &str) {
        let path = self.dir.path().join(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create note directory");
        }
        fs::write(&path, content).expect("Failed to write note");
    }

    pub fn remove(&self, id: &str) {
        fs::remove_file(self.dir.path().join(id)).expect("Failed to remove note");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh, empty index over this vault.
    pub fn index(&self) -> LinkIndex {
        LinkIndex::new(Arc::new(FsSource::new(self.path())))
    }

    /// An index over this vault, already rebuilt.
    pub fn rebuilt_index(&self) -> LinkIndex {
        let index = self.index();
        index.rebuild().expect("Failed to rebuild index");
        index
    }
}
