//! Link scanning: find tracked image URLs in the changelog text.
//!
//! Matching is textual, not a structural markdown parse — a link inside a
//! fenced code block is treated exactly like a prose link. That is the
//! behaviour the changelog pipeline has always had, and nothing in our
//! changelogs puts image links in code blocks, so the simpler contract wins.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Matches `[text](target)` and captures the target. Image links
/// (`![alt](target)`) match too since the pattern anchors on the bracket.
static RE_MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\(([^()\s]+)\)").unwrap());

/// Return the distinct HTTP(S) URLs appearing as markdown link targets and
/// ending with `.{extension}`, in discovery order.
///
/// Duplicates collapse to one entry. An empty result is valid and means the
/// migration has nothing to do.
pub fn scan_image_urls(document: &str, extension: &str) -> Vec<String> {
    let suffix = format!(".{extension}");
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for caps in RE_MARKDOWN_LINK.captures_iter(document) {
        let target = &caps[1];
        if !target.starts_with("http://") && !target.starts_with("https://") {
            continue;
        }
        if !target.ends_with(&suffix) {
            continue;
        }
        if seen.insert(target.to_string()) {
            urls.push(target.to_string());
        }
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tracked_urls_only() {
        let doc = "[a](https://x/1.png) [b](https://x/1.png) [c](https://x/2.jpg)";
        let urls = scan_image_urls(doc, "png");
        assert_eq!(urls, vec!["https://x/1.png".to_string()]);
    }

    #[test]
    fn preserves_discovery_order() {
        let doc = "[z](https://x/z.png) then [a](https://x/a.png)";
        let urls = scan_image_urls(doc, "png");
        assert_eq!(urls, vec!["https://x/z.png", "https://x/a.png"]);
    }

    #[test]
    fn matches_image_links() {
        let doc = "![screenshot](https://x/shot.png)";
        assert_eq!(scan_image_urls(doc, "png"), vec!["https://x/shot.png"]);
    }

    #[test]
    fn ignores_relative_targets() {
        let doc = "[local](./images/a.png) [remote](https://x/a.png)";
        assert_eq!(scan_image_urls(doc, "png"), vec!["https://x/a.png"]);
    }

    #[test]
    fn empty_document_is_empty_result() {
        assert!(scan_image_urls("", "png").is_empty());
        assert!(scan_image_urls("no links here", "png").is_empty());
    }

    #[test]
    fn extension_match_is_a_suffix_check() {
        // "mypng" must not match; ".png" must be a full final component.
        let doc = "[a](https://x/file.mypng) [b](https://x/real.png)";
        assert_eq!(scan_image_urls(doc, "png"), vec!["https://x/real.png"]);
    }

    #[test]
    fn code_block_links_are_not_suppressed() {
        let doc = "```\n[in-code](https://x/code.png)\n```";
        assert_eq!(scan_image_urls(doc, "png"), vec!["https://x/code.png"]);
    }
}
