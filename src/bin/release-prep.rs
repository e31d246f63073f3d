//! CLI binary for release-prep.
//!
//! A thin shim over the library crate that maps CLI flags onto the three
//! tool configs and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use release_prep::{
    generate_iconset, generate_release_metadata, migrate, AssetOutcome, IconsetConfig,
    MigrateConfig, MigrationReport, ReleasesConfig, ICON_SIZES,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Update the AppStream release metadata from the GitHub release list
  release-prep releases acme/app -o metainfo/releases.xml

  # Include prereleases
  release-prep releases acme/app --include-prereleases

  # Cache the changelog's remote screenshots locally and rewrite the links
  release-prep changelog-images

  # Same, against a non-default changelog and cache directory
  release-prep changelog-images --changelog docs/CHANGELOG.md --assets-dir docs/assets

  # Machine-readable migration report
  release-prep changelog-images --json

  # Regenerate the desktop iconset from the master image
  release-prep iconset artwork/icon.png -o assets/icons

ENVIRONMENT VARIABLES:
  RELEASE_PREP_REPOSITORY   Default owner/name for the releases subcommand
  RELEASE_PREP_API_BASE     Forge API base URL (default: https://api.github.com)
  RELEASE_PREP_CHANGELOG    Default changelog path
  RELEASE_PREP_ASSETS_DIR   Default asset cache directory
  RELEASE_PREP_VERBOSE      Enable debug logging
  RELEASE_PREP_QUIET        Suppress all output except errors

NOTES:
  Per-image failures during changelog migration are logged and skipped; the
  corresponding links are left untouched and the process still exits 0.
  The asset cache is content-addressed: re-running the migration never
  produces duplicate files or modifies existing ones.
"#;

/// Release/publishing workflow automation.
#[derive(Parser, Debug)]
#[command(
    name = "release-prep",
    version,
    about = "Release automation: AppStream release XML, changelog image migration, iconset generation",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "RELEASE_PREP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "RELEASE_PREP_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the forge release list and write AppStream release metadata XML.
    Releases {
        /// Repository in `owner/name` form.
        #[arg(env = "RELEASE_PREP_REPOSITORY")]
        repository: String,

        /// Path of the XML file to write.
        #[arg(
            short,
            long,
            env = "RELEASE_PREP_RELEASES_OUTPUT",
            default_value = "metainfo/releases.xml"
        )]
        output: PathBuf,

        /// Include prereleases (drafts are always skipped).
        #[arg(long)]
        include_prereleases: bool,

        /// Forge API base URL.
        #[arg(long, env = "RELEASE_PREP_API_BASE", default_value = "https://api.github.com")]
        api_base: String,

        /// API request timeout in seconds.
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },

    /// Migrate remote changelog images into the local asset cache.
    ChangelogImages {
        /// Changelog document to migrate.
        #[arg(long, env = "RELEASE_PREP_CHANGELOG", default_value = "CHANGELOG.md")]
        changelog: PathBuf,

        /// Directory receiving the content-addressed assets.
        #[arg(
            long,
            env = "RELEASE_PREP_ASSETS_DIR",
            default_value = "docs/changelog-assets"
        )]
        assets_dir: PathBuf,

        /// Link extension (without dot) to migrate.
        #[arg(long, default_value = "png")]
        extension: String,

        /// JPEG quality of re-encoded assets (1-100).
        #[arg(long, default_value_t = 80)]
        quality: u8,

        /// Per-download timeout in seconds.
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Print the migration report as JSON instead of the summary.
        #[arg(long)]
        json: bool,
    },

    /// Generate the fixed icon set from one source image.
    Iconset {
        /// Source image (any decodable format).
        source: PathBuf,

        /// Directory receiving the resized icons.
        #[arg(short, long, default_value = "assets/icons")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Releases {
            repository,
            output,
            include_prereleases,
            api_base,
            timeout,
        } => {
            let (owner, repo) = repository
                .split_once('/')
                .with_context(|| format!("Repository must be owner/name, got '{repository}'"))?;

            let config = ReleasesConfig::builder(owner, repo)
                .output(&output)
                .include_prereleases(include_prereleases)
                .api_base(api_base)
                .api_timeout_secs(timeout)
                .build()
                .context("Invalid configuration")?;

            let spinner = spinner(quiet, format!("Fetching releases of {repository}…"));
            let count = generate_release_metadata(&config)
                .await
                .context("Release metadata generation failed")?;
            finish(spinner);

            if !quiet {
                if count == 0 {
                    eprintln!("No published releases found; nothing written");
                } else {
                    eprintln!(
                        "{} {} release(s)  →  {}",
                        green("✔"),
                        bold(&count.to_string()),
                        bold(&output.display().to_string()),
                    );
                }
            }
        }

        Command::ChangelogImages {
            changelog,
            assets_dir,
            extension,
            quality,
            timeout,
            json,
        } => {
            let config = MigrateConfig::builder()
                .changelog(&changelog)
                .assets_dir(assets_dir)
                .tracked_extension(extension)
                .jpeg_quality(quality)
                .fetch_timeout_secs(timeout)
                .build()
                .context("Invalid configuration")?;

            let spinner = spinner(quiet, format!("Migrating images of {}…", changelog.display()));
            let report = migrate(&config).await.context("Migration failed")?;
            finish(spinner);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialise report")?
                );
            } else if !quiet {
                print_migration_summary(&report);
            }
        }

        Command::Iconset { source, out_dir } => {
            let config = IconsetConfig::new(&source, &out_dir);
            let written = generate_iconset(&config).context("Iconset generation failed")?;

            if !quiet {
                eprintln!(
                    "{} {} icon(s) ({}..{} px)  →  {}",
                    green("✔"),
                    bold(&written.len().to_string()),
                    ICON_SIZES[0],
                    ICON_SIZES[ICON_SIZES.len() - 1],
                    bold(&out_dir.display().to_string()),
                );
            }
        }
    }

    Ok(())
}

/// A steady-tick spinner for the network-bound commands, suppressed by
/// `--quiet` (logs already carry the per-URL detail in verbose runs).
fn spinner(quiet: bool, message: String) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

fn finish(spinner: Option<ProgressBar>) {
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
}

/// Per-asset outcome lines plus a one-line summary.
fn print_migration_summary(report: &MigrationReport) {
    for outcome in &report.assets {
        match outcome {
            AssetOutcome::Migrated { url, path } => {
                eprintln!("  {} {}  →  {}", green("✓"), url, path);
            }
            AssetOutcome::CacheHit { url, path } => {
                eprintln!("  {} {}  →  {}  {}", green("✓"), url, path, dim("(cached)"));
            }
            AssetOutcome::Failed { url, error } => {
                eprintln!("  {} {}  {}", red("✗"), url, red(&error.to_string()));
            }
        }
    }

    let s = &report.stats;
    if s.discovered == 0 {
        eprintln!("No tracked image links found; changelog untouched");
    } else if s.document_rewritten {
        eprintln!(
            "{} {}/{} image(s) migrated ({} new, {} cached, {} failed)  {}ms",
            if s.failed == 0 { green("✔") } else { red("⚠") },
            bold(&(s.migrated + s.cache_hits).to_string()),
            s.discovered,
            s.migrated,
            s.cache_hits,
            s.failed,
            s.duration_ms,
        );
    } else {
        eprintln!(
            "{} no image could be migrated ({} failed); changelog untouched",
            red("✘"),
            s.failed
        );
    }
}
