//! Asset fetching: download one image URL with a bounded timeout.
//!
//! Failure here is deliberately soft. A changelog accumulates years of links
//! and the hosts behind them rot; one dead URL must not abort the migration
//! of every other image. Every failure path logs its cause and returns an
//! [`AssetError`] for the run report, and the caller moves on to the next URL.

use crate::error::AssetError;
use tracing::{debug, warn};

/// Fetch the raw bytes behind `url`.
///
/// The timeout is carried by the client (one client, one timeout, every
/// request — built once per run by the orchestrator). Returns the body on any
/// 2xx status; everything else — connect failure, timeout, non-success
/// status — becomes an [`AssetError`] that the caller records and skips.
pub async fn fetch_asset(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, AssetError> {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            let reason = if e.is_timeout() {
                "timed out".to_string()
            } else {
                e.to_string()
            };
            warn!("fetch failed for {}: {}", url, reason);
            return Err(AssetError::Fetch {
                url: url.to_string(),
                reason,
            });
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!("fetch failed for {}: HTTP {}", url, status);
        return Err(AssetError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    match response.bytes().await {
        Ok(bytes) => {
            debug!("fetched {} ({} bytes)", url, bytes.len());
            Ok(bytes.to_vec())
        }
        Err(e) => {
            warn!("fetch failed for {} while reading body: {}", url, e);
            Err(AssetError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
