//! Reference resolution.
//!
//! Maps a reference such as `My Note` or `folder/My Note.md` to a concrete
//! document id in two steps, stopping at the first success:
//!
//! 1. **Direct match**: append the primary extension (unless already present)
//!    and check that the path exists.
//! 2. **Name search**: look for any non-hidden file in the collection whose
//!    name, with the primary extension stripped, equals the reference exactly.
//!
//! The name search uses a [`NameIndex`] built from one collection walk and
//! reused for every lookup made through the same [`Resolver`]. When several
//! files share a name, the first one in walk order (name-sorted, depth-first)
//! wins.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::paths::{file_name, DocumentExtension};
use crate::source::DocumentSource;

/// Basename → document id lookup table for name-search resolution.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, String>,
}

impl NameIndex {
    /// Build from document ids given in walk order.
    pub fn from_files<'a, I>(files: I, extension: &DocumentExtension) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut by_name: HashMap<String, String> = HashMap::new();
        for id in files {
            let name = extension.strip(file_name(id));
            // First occurrence in walk order wins
            by_name
                .entry(name.to_string())
                .or_insert_with(|| id.clone());
        }
        Self { by_name }
    }

    /// Build by walking the source. Walk failures yield an empty index.
    pub fn build(source: &dyn DocumentSource, extension: &DocumentExtension) -> Self {
        match source.walk() {
            Ok(walk) => Self::from_files(&walk.files, extension),
            Err(e) => {
                debug!("Name index unavailable, collection walk failed: {}", e);
                Self::default()
            }
        }
    }

    /// Look up the document registered under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the index holds no names.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Resolves references against one document source.
///
/// The name index is built lazily on the first direct-match miss, so a pass
/// in which every reference resolves directly never walks the collection.
pub struct Resolver<'a> {
    source: &'a dyn DocumentSource,
    extension: &'a DocumentExtension,
    names: OnceCell<NameIndex>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver that walks the collection on demand.
    pub fn new(source: &'a dyn DocumentSource, extension: &'a DocumentExtension) -> Self {
        Self {
            source,
            extension,
            names: OnceCell::new(),
        }
    }

    /// Create a resolver around an already-built name index.
    pub fn with_name_index(
        source: &'a dyn DocumentSource,
        extension: &'a DocumentExtension,
        names: NameIndex,
    ) -> Self {
        Self {
            source,
            extension,
            names: OnceCell::with_value(names),
        }
    }

    /// Resolve a reference to a document id, or `None` if nothing matches.
    ///
    /// An unresolved reference is an ordinary outcome, not an error.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let direct = self.extension.ensure(reference);
        if self.source.exists(&direct) {
            trace!("Resolved {:?} directly to {:?}", reference, direct);
            return Some(direct);
        }

        let names = self
            .names
            .get_or_init(|| NameIndex::build(self.source, self.extension));
        let found = names.get(reference).map(str::to_string);
        match &found {
            Some(id) => trace!("Resolved {:?} by name to {:?}", reference, id),
            None => trace!("Reference {:?} is unresolved", reference),
        }
        found
    }
}
