//! Wiki-link reference extraction.
//!
//! Recognizes `[[Target]]`, `[[Target|Alias]]` and `[[Target#Heading]]`
//! constructs and reduces each to the bare reference text:
//!
//! - the alias after the first `|` is discarded,
//! - the heading after the first `#` (left of any `|`) is discarded,
//! - surrounding whitespace is trimmed,
//! - empty references are dropped,
//! - repeated references keep only their first occurrence.
//!
//! There is no escaping: a `]` can never appear inside a reference.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `[[body]]` where the body contains no `]`.
static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]*)\]\]").expect("valid wiki-link regex"));

/// Extract the ordered, de-duplicated references from document text.
///
/// # Example
///
/// ```
/// use notegraph_core::parse_references;
///
/// let refs = parse_references("[[A]] and [[B|alias]] and [[C#Heading]] and [[A]]");
/// assert_eq!(refs, vec!["A", "B", "C"]);
/// ```
pub fn parse_references(text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut references = Vec::new();

    for captures in WIKI_LINK_RE.captures_iter(text) {
        let Some(body) = captures.get(1) else {
            continue;
        };
        let Some(reference) = reference_from_body(body.as_str()) else {
            continue;
        };
        if seen.insert(reference) {
            references.push(reference.to_string());
        }
    }

    references
}

/// Reduce a raw link body to its reference, or `None` if nothing remains.
fn reference_from_body(body: &str) -> Option<&str> {
    let target = body.split('|').next().unwrap_or_default();
    let target = target.split('#').next().unwrap_or_default();
    let target = target.trim();
    (!target.is_empty()).then_some(target)
}
