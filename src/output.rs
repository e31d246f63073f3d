//! Result types returned by the release-prep tools.
//!
//! A migration run never hides partial failure: every discovered URL ends up
//! as exactly one [`AssetOutcome`] in the [`MigrationReport`], successful or
//! not, so callers (and the `--json` CLI output) can see precisely which
//! links were rewritten and why the others were left alone.

use crate::error::AssetError;
use serde::{Deserialize, Serialize};

/// What happened to one discovered image URL during a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssetOutcome {
    /// Fetched, re-encoded, and written to the assets directory.
    Migrated { url: String, path: String },

    /// Fetched and re-encoded; an identical asset was already cached, so
    /// nothing was written.
    CacheHit { url: String, path: String },

    /// Fetch or re-encode failed; the URL stays untouched in the document.
    Failed { url: String, error: AssetError },
}

impl AssetOutcome {
    /// The original URL this outcome refers to.
    pub fn url(&self) -> &str {
        match self {
            AssetOutcome::Migrated { url, .. }
            | AssetOutcome::CacheHit { url, .. }
            | AssetOutcome::Failed { url, .. } => url,
        }
    }

    /// The repository-relative path the URL now maps to, if it succeeded.
    pub fn path(&self) -> Option<&str> {
        match self {
            AssetOutcome::Migrated { path, .. } | AssetOutcome::CacheHit { path, .. } => {
                Some(path)
            }
            AssetOutcome::Failed { .. } => None,
        }
    }
}

/// Aggregate counters for a migration run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationStats {
    /// Distinct tracked image URLs found in the document.
    pub discovered: usize,
    /// URLs whose asset was newly written to the cache.
    pub migrated: usize,
    /// URLs whose asset was already cached.
    pub cache_hits: usize,
    /// URLs skipped because fetch or re-encode failed.
    pub failed: usize,
    /// Whether the document was rewritten and saved.
    pub document_rewritten: bool,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
}

/// Full result of one changelog image migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// One entry per distinct discovered URL, in discovery order.
    pub assets: Vec<AssetOutcome>,
    pub stats: MigrationStats,
}

impl MigrationReport {
    /// A report for a run that found nothing to do.
    pub(crate) fn empty(duration_ms: u64) -> Self {
        Self {
            assets: Vec::new(),
            stats: MigrationStats {
                duration_ms,
                ..MigrationStats::default()
            },
        }
    }
}

/// One release as it appears in the AppStream release XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEntry {
    /// Version string with any leading `v`/`V` tag prefix stripped.
    pub version: String,
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    /// Web page of the release (tag page on the forge).
    pub url: String,
}
