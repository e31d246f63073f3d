//! # release-prep
//!
//! Automation for a desktop application's release/publishing workflow.
//!
//! Three independent, single-purpose tools live in this crate, each a linear
//! fetch/transform/write pipeline invoked once per run:
//!
//! * **releases** — fetch the repository's release list from the forge API
//!   and emit an AppStream-compatible release-metadata XML file.
//! * **changelog-images** — rewrite remote image links in the changelog to
//!   point at locally cached, re-encoded copies (the most involved of the
//!   three; see the pipeline below).
//! * **iconset** — generate the fixed set of resized icons the desktop
//!   packaging step expects from one source image.
//!
//! ## Changelog migration pipeline
//!
//! ```text
//! CHANGELOG.md
//!  │
//!  ├─ 1. Scan      distinct [text](https://…png) link targets
//!  ├─ 2. Fetch     HTTP GET per URL, bounded timeout, failures skipped
//!  ├─ 3. Transcode re-encode as JPEG, MD5-address into the asset cache
//!  └─ 4. Rewrite   substitute cached relative paths, save atomically
//! ```
//!
//! Stages run strictly forward, one URL at a time. The asset cache is
//! content-addressed and write-once: repeated runs over unchanged images
//! produce no new files and an unchanged document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use release_prep::{migrate, MigrateConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MigrateConfig::default();
//!     let report = migrate(&config).await?;
//!     eprintln!(
//!         "{} migrated, {} cached, {} failed",
//!         report.stats.migrated, report.stats.cache_hits, report.stats.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `release-prep` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! release-prep = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod iconset;
pub mod migrate;
pub mod output;
pub mod pipeline;
pub mod releases;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    IconsetConfig, MigrateConfig, MigrateConfigBuilder, ReleasesConfig, ReleasesConfigBuilder,
};
pub use error::{AssetError, ReleasePrepError};
pub use iconset::{generate_iconset, ICON_SIZES};
pub use migrate::{migrate, migrate_sync};
pub use output::{AssetOutcome, MigrationReport, MigrationStats, ReleaseEntry};
pub use releases::{fetch_releases, generate_release_metadata, render_release_xml};
