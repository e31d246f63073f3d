//! Configuration types for the three release-prep tools.
//!
//! Each tool gets its own config struct built via a builder. Keeping every
//! knob in an explicit struct — rather than module-level constants — makes it
//! trivial to share configs across callers, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builders let callers set only what they care about and rely on
//! well-documented defaults for the rest, and give `build()` one place to
//! validate cross-field constraints.

use crate::error::ReleasePrepError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the changelog image migration.
///
/// Built via [`MigrateConfig::builder()`] or using
/// [`MigrateConfig::default()`].
///
/// # Example
/// ```rust
/// use release_prep::MigrateConfig;
///
/// let config = MigrateConfig::builder()
///     .changelog("CHANGELOG.md")
///     .jpeg_quality(80)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Path to the changelog document. Read in full, rewritten in full.
    /// Default: `CHANGELOG.md`.
    pub changelog: PathBuf,

    /// Directory receiving the content-addressed asset files. Created if
    /// absent. Default: `docs/changelog-assets`.
    ///
    /// The directory is a write-once cache shared across runs: files are
    /// named after the MD5 of their encoded content and never overwritten,
    /// so re-running the migration on unchanged images is a no-op.
    pub assets_dir: PathBuf,

    /// File extension (without dot) a link URL must end with to be migrated.
    /// Default: `png`.
    ///
    /// The hosted screenshots this tool was built for are uploaded as PNG;
    /// everything else in the changelog is left alone.
    pub tracked_extension: String,

    /// JPEG quality for re-encoded assets. Range: 1–100. Default: 80.
    ///
    /// 80 keeps screenshots visually indistinguishable from the source while
    /// cutting the typical forge-hosted PNG to a fraction of its size, which
    /// is the point of caching them in the repository at all.
    pub jpeg_quality: u8,

    /// Per-request download timeout in seconds. Default: 30.
    pub fetch_timeout_secs: u64,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            changelog: PathBuf::from("CHANGELOG.md"),
            assets_dir: PathBuf::from("docs/changelog-assets"),
            tracked_extension: "png".to_string(),
            jpeg_quality: 80,
            fetch_timeout_secs: 30,
        }
    }
}

impl MigrateConfig {
    /// Create a new builder for `MigrateConfig`.
    pub fn builder() -> MigrateConfigBuilder {
        MigrateConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`MigrateConfig`].
#[derive(Debug)]
pub struct MigrateConfigBuilder {
    config: MigrateConfig,
}

impl MigrateConfigBuilder {
    pub fn changelog(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.changelog = path.into();
        self
    }

    pub fn assets_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.assets_dir = path.into();
        self
    }

    pub fn tracked_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.config.tracked_extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q.clamp(1, 100);
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MigrateConfig, ReleasePrepError> {
        let c = &self.config;
        if c.tracked_extension.is_empty() {
            return Err(ReleasePrepError::InvalidConfig(
                "Tracked extension must not be empty".into(),
            ));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ReleasePrepError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        Ok(self.config)
    }
}

/// Configuration for the release-metadata generator.
///
/// Points at a GitHub-style releases endpoint and an output XML path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasesConfig {
    /// Repository owner (organisation or user).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Path of the AppStream release XML to write.
    pub output: PathBuf,

    /// Include prereleases in the output. Drafts are always skipped.
    /// Default: false.
    pub include_prereleases: bool,

    /// Forge API base URL. Default: `https://api.github.com`.
    ///
    /// Overridable so tests (and GitHub Enterprise installs) can point the
    /// tool at a different host.
    pub api_base: String,

    /// API request timeout in seconds. Default: 30.
    pub api_timeout_secs: u64,
}

impl ReleasesConfig {
    /// Create a builder for the given `owner/repo` pair.
    pub fn builder(owner: impl Into<String>, repo: impl Into<String>) -> ReleasesConfigBuilder {
        ReleasesConfigBuilder {
            config: ReleasesConfig {
                owner: owner.into(),
                repo: repo.into(),
                output: PathBuf::from("metainfo/releases.xml"),
                include_prereleases: false,
                api_base: "https://api.github.com".to_string(),
                api_timeout_secs: 30,
            },
        }
    }
}

/// Builder for [`ReleasesConfig`].
#[derive(Debug)]
pub struct ReleasesConfigBuilder {
    config: ReleasesConfig,
}

impl ReleasesConfigBuilder {
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    pub fn include_prereleases(mut self, v: bool) -> Self {
        self.config.include_prereleases = v;
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ReleasesConfig, ReleasePrepError> {
        let c = &self.config;
        if c.owner.is_empty() || c.repo.is_empty() {
            return Err(ReleasePrepError::InvalidConfig(
                "Repository owner and name must not be empty".into(),
            ));
        }
        if !c.api_base.starts_with("http://") && !c.api_base.starts_with("https://") {
            return Err(ReleasePrepError::InvalidConfig(format!(
                "API base must be an HTTP(S) URL, got '{}'",
                c.api_base
            )));
        }
        Ok(self.config)
    }
}

/// Configuration for the iconset generator.
///
/// The emitted size set is fixed (see [`crate::iconset::ICON_SIZES`]) — the
/// packaging step expects exactly those files, so it is deliberately not a
/// knob here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconsetConfig {
    /// Source image to resize. Any format the image codec decodes.
    pub source: PathBuf,

    /// Directory receiving the resized icons. Created if absent.
    pub out_dir: PathBuf,
}

impl IconsetConfig {
    pub fn new(source: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            out_dir: out_dir.into(),
        }
    }
}
