//! Release-metadata generation: forge release list → AppStream XML.
//!
//! Fetches the published releases of one repository from a GitHub-style
//! REST API and emits the `<releases>` document that AppStream metainfo
//! consumers (software centres, Flathub) read for version history. Unlike
//! the changelog migration there is no per-item failure tolerance here: if
//! the API call fails there is nothing to emit, so the error is fatal.

use crate::config::ReleasesConfig;
use crate::error::ReleasePrepError;
use crate::output::ReleaseEntry;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One release as the forge API reports it. Only the fields the XML needs.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForgeRelease {
    pub tag_name: String,
    pub html_url: String,
    pub published_at: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
}

/// Fetch the release list and write the AppStream release XML.
///
/// Returns the number of releases written. An empty release list is an
/// informational early exit: no file is written and `Ok(0)` is returned.
pub async fn generate_release_metadata(
    config: &ReleasesConfig,
) -> Result<usize, ReleasePrepError> {
    let entries = fetch_releases(config).await?;

    if entries.is_empty() {
        info!(
            "{}/{} has no published releases; nothing to write",
            config.owner, config.repo
        );
        return Ok(0);
    }

    let xml = render_release_xml(&entries)?;
    write_output(&config.output, &xml).await?;

    info!(
        "Wrote {} release(s) to {}",
        entries.len(),
        config.output.display()
    );
    Ok(entries.len())
}

/// Fetch and filter the release list for `config.owner/config.repo`.
///
/// Drafts are always skipped; prereleases are skipped unless configured in.
/// Releases come back newest first and are emitted in that order.
pub async fn fetch_releases(
    config: &ReleasesConfig,
) -> Result<Vec<ReleaseEntry>, ReleasePrepError> {
    let url = format!(
        "{}/repos/{}/{}/releases?per_page=100",
        config.api_base, config.owner, config.repo
    );
    info!("Fetching release list: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api_timeout_secs))
        // GitHub rejects requests without a User-Agent.
        .user_agent(concat!("release-prep/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ReleasePrepError::Internal(format!("HTTP client: {e}")))?;

    let response = client
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ReleasePrepError::ReleasesTimeout {
                    url: url.clone(),
                    secs: config.api_timeout_secs,
                }
            } else {
                ReleasePrepError::ReleasesFetch {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

    if !response.status().is_success() {
        return Err(ReleasePrepError::ReleasesFetch {
            url,
            reason: format!("HTTP {}", response.status()),
        });
    }

    let raw: Vec<ForgeRelease> = response
        .json()
        .await
        .map_err(|e| ReleasePrepError::ReleasesDecode {
            reason: e.to_string(),
        })?;

    if raw.len() == 100 {
        debug!("release list is a full page; older releases are not fetched");
    }

    Ok(to_entries(raw, config.include_prereleases))
}

/// Filter and convert raw forge releases into XML-ready entries.
pub(crate) fn to_entries(raw: Vec<ForgeRelease>, include_prereleases: bool) -> Vec<ReleaseEntry> {
    raw.into_iter()
        .filter(|r| !r.draft && (include_prereleases || !r.prerelease))
        .filter_map(|r| {
            let Some(published_at) = r.published_at else {
                warn!("release {} has no publication date; skipping", r.tag_name);
                return None;
            };
            let date = match chrono::DateTime::parse_from_rfc3339(&published_at) {
                Ok(dt) => dt.format("%Y-%m-%d").to_string(),
                Err(e) => {
                    warn!(
                        "release {} has unparsable date '{}': {}; skipping",
                        r.tag_name, published_at, e
                    );
                    return None;
                }
            };
            Some(ReleaseEntry {
                version: normalize_version(&r.tag_name),
                date,
                url: r.html_url,
            })
        })
        .collect()
}

/// Strip one leading `v`/`V` from a tag name, the common tagging convention.
fn normalize_version(tag: &str) -> String {
    tag.strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag)
        .to_string()
}

/// Render the AppStream `<releases>` document.
pub fn render_release_xml(entries: &[ReleaseEntry]) -> Result<String, ReleasePrepError> {
    fn xml_err(e: impl std::fmt::Display) -> ReleasePrepError {
        ReleasePrepError::XmlRender {
            reason: e.to_string(),
        }
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("releases")))
        .map_err(xml_err)?;

    for entry in entries {
        let mut release = BytesStart::new("release");
        release.push_attribute(("version", entry.version.as_str()));
        release.push_attribute(("date", entry.date.as_str()));
        writer.write_event(Event::Start(release)).map_err(xml_err)?;

        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Text(BytesText::new(&entry.url)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_err)?;

        writer
            .write_event(Event::End(BytesEnd::new("release")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("releases")))
        .map_err(xml_err)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_err)?;
    xml.push('\n');
    Ok(xml)
}

/// Write the XML atomically (temp file + rename).
async fn write_output(path: &Path, xml: &str) -> Result<(), ReleasePrepError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ReleasePrepError::OutputWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("xml.tmp");
    tokio::fs::write(&tmp_path, xml)
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
