//! Document identity helpers.
//!
//! Document ids are collection-relative paths using `/` as separator.
//! Extension handling is a plain, case-sensitive suffix match; no case or
//! Unicode normalization is applied.

use std::path::Path;

/// Default primary document extension.
pub const DEFAULT_EXTENSION: &str = "md";

/// The primary document extension of a collection (e.g. `.md`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentExtension {
    suffix: String,
}

impl Default for DocumentExtension {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl DocumentExtension {
    /// Create from an extension with or without its leading dot.
    pub fn new(extension: &str) -> Self {
        let bare = extension.trim().trim_start_matches('.');
        Self {
            suffix: format!(".{bare}"),
        }
    }

    /// The suffix including the leading dot.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The extension without the leading dot.
    pub fn as_str(&self) -> &str {
        &self.suffix[1..]
    }

    /// Whether `name` ends with this extension.
    pub fn matches(&self, name: &str) -> bool {
        name.ends_with(&self.suffix)
    }

    /// Remove this extension from `name` if present.
    pub fn strip<'a>(&self, name: &'a str) -> &'a str {
        name.strip_suffix(self.suffix.as_str()).unwrap_or(name)
    }

    /// Append this extension unless `reference` already ends with it.
    pub fn ensure(&self, reference: &str) -> String {
        if self.matches(reference) {
            reference.to_string()
        } else {
            format!("{reference}{}", self.suffix)
        }
    }

    /// Display name of a document: last path segment without the extension.
    pub fn base_name<'a>(&self, id: &'a str) -> &'a str {
        self.strip(file_name(id))
    }

    /// Whether a document takes part in the graph projection.
    ///
    /// Ids without any extension are eligible; all others must carry this one.
    pub fn is_eligible(&self, id: &str) -> bool {
        Path::new(file_name(id)).extension().is_none() || self.matches(id)
    }
}

/// Last `/`-separated segment of a document id.
pub fn file_name(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Hidden entries start with a dot and are never indexed.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Join a directory id and an entry name into a document id.
pub fn join_id(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}
