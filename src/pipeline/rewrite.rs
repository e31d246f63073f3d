//! Document rewriting: substitute cached paths for migrated URLs.
//!
//! Purely a function of (document, mapping) — no re-fetching, no re-scanning.
//! The substitution targets the parenthesised link position `(url)`, which
//! leaves the bracketed display text byte-identical and cannot touch a URL
//! that merely appears as prose.

use std::collections::HashMap;

/// Replace every `(url)` occurrence of each mapped URL with `(path)`.
///
/// URLs absent from the mapping stay byte-identical; an empty mapping returns
/// the document unchanged (the orchestrator short-circuits before calling in
/// that case, but the identity holds regardless).
pub fn rewrite_document(document: &str, mapping: &HashMap<String, String>) -> String {
    let mut updated = document.to_string();
    for (url, path) in mapping {
        updated = updated.replace(&format!("({url})"), &format!("({path})"));
    }
    updated
}
