//! Changelog image migration entry points.
//!
//! One invocation runs the four pipeline stages strictly forward:
//! scan → fetch → transcode/cache → rewrite. URLs are processed one at a
//! time in discovery order; per-URL failures are recorded and skipped, and
//! only filesystem errors abort the run. The document is written back only
//! when at least one URL was successfully migrated.

use crate::config::MigrateConfig;
use crate::error::{AssetError, ReleasePrepError};
use crate::output::{AssetOutcome, MigrationReport, MigrationStats};
use crate::pipeline::{fetch, rewrite, scan, transcode};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Migrate remote changelog images into the local content-addressed cache
/// and rewrite the document to reference the cached copies.
///
/// # Returns
/// `Ok(MigrationReport)` on success, even if some URLs failed (check
/// `report.stats.failed`). A run that finds nothing to migrate returns an
/// empty report without touching the document.
///
/// # Errors
/// Returns `Err(ReleasePrepError)` only for fatal errors: unreadable
/// changelog, uncreatable assets directory, or a failed write of a cached
/// asset or the rewritten document.
pub async fn migrate(config: &MigrateConfig) -> Result<MigrationReport, ReleasePrepError> {
    let start = Instant::now();
    info!("Starting changelog image migration: {}", config.changelog.display());

    // ── Step 1: Read the document ────────────────────────────────────────
    let document = match tokio::fs::read_to_string(&config.changelog).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReleasePrepError::ChangelogNotFound {
                path: config.changelog.clone(),
            });
        }
        Err(e) => {
            return Err(ReleasePrepError::DocumentRead {
                path: config.changelog.clone(),
                source: e,
            });
        }
    };

    // ── Step 2: Scan for tracked image links ─────────────────────────────
    let urls = scan::scan_image_urls(&document, &config.tracked_extension);
    if urls.is_empty() {
        info!("No remote .{} links found; nothing to migrate", config.tracked_extension);
        return Ok(MigrationReport::empty(start.elapsed().as_millis() as u64));
    }
    info!("Found {} distinct image URL(s)", urls.len());

    // ── Step 3: Fetch, transcode, cache ──────────────────────────────────
    tokio::fs::create_dir_all(&config.assets_dir)
        .await
        .map_err(|e| ReleasePrepError::AssetsDirCreate {
            path: config.assets_dir.clone(),
            source: e,
        })?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()
        .map_err(|e| ReleasePrepError::Internal(format!("HTTP client: {e}")))?;

    let document_dir = config.changelog.parent().unwrap_or_else(|| Path::new(""));

    let mut mapping: HashMap<String, String> = HashMap::new();
    let mut outcomes = Vec::with_capacity(urls.len());

    for url in &urls {
        match process_url(&client, url, config, document_dir).await {
            Ok(ProcessedAsset { path, newly_written }) => {
                mapping.insert(url.clone(), path.clone());
                outcomes.push(if newly_written {
                    info!("migrated {} -> {}", url, path);
                    AssetOutcome::Migrated {
                        url: url.clone(),
                        path,
                    }
                } else {
                    info!("already cached {} -> {}", url, path);
                    AssetOutcome::CacheHit {
                        url: url.clone(),
                        path,
                    }
                });
            }
            Err(ProcessFailure::Asset(error)) => {
                outcomes.push(AssetOutcome::Failed {
                    url: url.clone(),
                    error,
                });
            }
            Err(ProcessFailure::Fatal(e)) => return Err(e),
        }
    }

    // ── Step 4: Rewrite and save ─────────────────────────────────────────
    let document_rewritten = if mapping.is_empty() {
        info!("No image could be migrated; leaving the changelog untouched");
        false
    } else {
        let updated = rewrite::rewrite_document(&document, &mapping);
        write_document(&config.changelog, &updated).await?;
        info!("Rewrote {} link target(s) in {}", mapping.len(), config.changelog.display());
        true
    };

    let stats = MigrationStats {
        discovered: urls.len(),
        migrated: outcomes
            .iter()
            .filter(|o| matches!(o, AssetOutcome::Migrated { .. }))
            .count(),
        cache_hits: outcomes
            .iter()
            .filter(|o| matches!(o, AssetOutcome::CacheHit { .. }))
            .count(),
        failed: outcomes
            .iter()
            .filter(|o| matches!(o, AssetOutcome::Failed { .. }))
            .count(),
        document_rewritten,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Migration complete: {}/{} URL(s) processed, {}ms",
        stats.migrated + stats.cache_hits,
        stats.discovered,
        stats.duration_ms
    );

    Ok(MigrationReport {
        assets: outcomes,
        stats,
    })
}

/// Synchronous wrapper around [`migrate`].
///
/// Creates a temporary tokio runtime internally.
pub fn migrate_sync(config: &MigrateConfig) -> Result<MigrationReport, ReleasePrepError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ReleasePrepError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(migrate(config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

struct ProcessedAsset {
    path: String,
    newly_written: bool,
}

enum ProcessFailure {
    /// Recoverable: this URL is skipped, the run continues.
    Asset(AssetError),
    /// Filesystem trouble: the run stops.
    Fatal(ReleasePrepError),
}

/// Fetch one URL and land it in the cache, returning the document-relative
/// reference.
async fn process_url(
    client: &reqwest::Client,
    url: &str,
    config: &MigrateConfig,
    document_dir: &Path,
) -> Result<ProcessedAsset, ProcessFailure> {
    let bytes = fetch::fetch_asset(client, url)
        .await
        .map_err(ProcessFailure::Asset)?;

    let encoded = transcode::transcode_to_jpeg(&bytes, config.jpeg_quality).map_err(|e| {
        warn!("could not re-encode {}: {}", url, e);
        ProcessFailure::Asset(AssetError::Transcode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    })?;

    let (path, newly_written) = transcode::store_asset(&config.assets_dir, &encoded)
        .map_err(|e| {
            ProcessFailure::Fatal(ReleasePrepError::AssetWrite {
                path: config.assets_dir.join(transcode::asset_filename(&encoded)),
                source: e,
            })
        })?;

    Ok(ProcessedAsset {
        path: transcode::relative_reference(&path, document_dir),
        newly_written,
    })
}

/// Overwrite the changelog atomically (temp file + rename) so a failed run
/// never leaves a half-written document.
async fn write_document(path: &Path, contents: &str) -> Result<(), ReleasePrepError> {
    let tmp_path = path.with_extension("md.tmp");

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| ReleasePrepError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ReleasePrepError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })
}
