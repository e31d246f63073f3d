//! Error types for the release-prep library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ReleasePrepError`] — **Fatal**: the tool cannot proceed at all
//!   (changelog missing, assets directory not creatable, forge API down,
//!   source icon unreadable). Returned as `Err(ReleasePrepError)` from the
//!   top-level entry points.
//!
//! * [`AssetError`] — **Non-fatal**: a single changelog image failed (network
//!   error, HTTP status, corrupt bytes) but every other image is fine. Stored
//!   inside [`crate::output::AssetOutcome`] so callers can inspect partial
//!   success rather than losing the whole run to one dead link.
//!
//! The separation matches the migration contract: one bad URL is logged and
//! excluded from the rewrite; a filesystem failure terminates the run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the release-prep library.
///
/// Per-image failures use [`AssetError`] and are stored in
/// [`crate::output::AssetOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ReleasePrepError {
    // ── Changelog migration errors ───────────────────────────────────────
    /// Changelog document was not found at the given path.
    #[error("Changelog not found: '{path}'\nCheck the path exists and is readable.")]
    ChangelogNotFound { path: PathBuf },

    /// Changelog exists but could not be read.
    #[error("Failed to read changelog '{path}': {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The assets directory could not be created.
    #[error("Failed to create assets directory '{path}': {source}")]
    AssetsDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cached asset file could not be written.
    #[error("Failed to write asset '{path}': {source}")]
    AssetWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write an output file (rewritten changelog, release XML).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Release metadata errors ──────────────────────────────────────────
    /// The forge API request failed (network error or non-2xx status).
    #[error("Failed to fetch release list from '{url}': {reason}\nCheck your internet connection.")]
    ReleasesFetch { url: String, reason: String },

    /// The forge API request exceeded the configured timeout.
    #[error("Release list request timed out after {secs}s for '{url}'")]
    ReleasesTimeout { url: String, secs: u64 },

    /// The forge API responded but the JSON body did not parse.
    #[error("Failed to decode release list: {reason}")]
    ReleasesDecode { reason: String },

    /// The release XML document could not be rendered.
    #[error("Failed to render release XML: {reason}")]
    XmlRender { reason: String },

    // ── Iconset errors ───────────────────────────────────────────────────
    /// The source icon image could not be opened or decoded.
    #[error("Failed to decode source image '{path}': {source}")]
    SourceImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A resized icon could not be encoded or written.
    #[error("Failed to write icon '{path}': {source}")]
    IconWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Config errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single changelog image.
///
/// Stored alongside [`crate::output::AssetOutcome`] when an image fails.
/// The overall migration continues; the failed URL is simply left untouched
/// in the document.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum AssetError {
    /// The HTTP request failed (connection, DNS, timeout).
    #[error("fetch failed for '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("'{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The fetched bytes did not decode or re-encode as an image.
    #[error("could not re-encode '{url}': {reason}")]
    Transcode { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changelog_not_found_display() {
        let e = ReleasePrepError::ChangelogNotFound {
            path: PathBuf::from("CHANGELOG.md"),
        };
        assert!(e.to_string().contains("CHANGELOG.md"));
    }

    #[test]
    fn releases_timeout_display() {
        let e = ReleasePrepError::ReleasesTimeout {
            url: "https://api.github.com/repos/a/b/releases".into(),
            secs: 30,
        };
        let msg = e.to_string();
        assert!(msg.contains("30s"), "got: {msg}");
        assert!(msg.contains("api.github.com"));
    }

    #[test]
    fn asset_http_status_display() {
        let e = AssetError::HttpStatus {
            url: "https://x/1.png".into(),
            status: 404,
        };
        assert!(e.to_string().contains("404"));
        assert!(e.to_string().contains("https://x/1.png"));
    }

    #[test]
    fn asset_error_serialises() {
        let e = AssetError::Transcode {
            url: "https://x/1.png".into(),
            reason: "not an image".into(),
        };
        let json = serde_json::to_string(&e).expect("AssetError must serialise");
        assert!(json.contains("not an image"));
    }
}
