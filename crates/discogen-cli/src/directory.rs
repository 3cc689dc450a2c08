//! Discovery directory client.
//!
//! Lists the APIs published in Google's Discovery directory and resolves a
//! `(name, version)` pair to the URL of its Discovery document. Thin glue
//! over the directory endpoint; all generation logic lives in the core crate.

use anyhow::{bail, Context};
use serde::Deserialize;

const DIRECTORY_URL: &str = "https://www.googleapis.com/discovery/v1/apis";

/// One API in the Discovery directory
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    /// `name:version` identifier, e.g. `bigquery:v2`
    pub id: String,
    pub name: String,
    pub version: String,
    pub title: Option<String>,
    #[serde(rename = "discoveryRestUrl")]
    pub discovery_rest_url: String,
    #[serde(default)]
    pub preferred: bool,
}

#[derive(Debug, Deserialize)]
struct DirectoryList {
    #[serde(default)]
    items: Vec<DirectoryEntry>,
}

/// Fetch the full directory listing, sorted by id.
pub async fn list_apis() -> anyhow::Result<Vec<DirectoryEntry>> {
    let response = reqwest::get(DIRECTORY_URL)
        .await
        .context("Failed to fetch the Discovery directory")?;
    if !response.status().is_success() {
        bail!(
            "Failed to fetch the Discovery directory: HTTP {}",
            response.status()
        );
    }
    let list: DirectoryList = response
        .json()
        .await
        .context("Failed to parse the Discovery directory listing")?;
    let mut items = list.items;
    items.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(items)
}

/// The canonical Discovery document URL for an API.
pub fn rest_url(name: &str, version: &str) -> String {
    format!("{DIRECTORY_URL}/{name}/{version}/rest")
}

/// Resolve `(name, version)` to its document URL, preferring the directory's
/// own `discoveryRestUrl` and falling back to the canonical shape when the
/// directory is unreachable or does not list the pair.
pub async fn resolve(name: &str, version: &str) -> anyhow::Result<String> {
    match list_apis().await {
        Ok(items) => {
            for item in items {
                if item.name == name && item.version == version {
                    return Ok(item.discovery_rest_url);
                }
            }
            tracing::debug!(name, version, "not in the directory, using the canonical URL");
            Ok(rest_url(name, version))
        }
        Err(e) => {
            tracing::warn!("directory lookup failed ({e:#}), using the canonical URL");
            Ok(rest_url(name, version))
        }
    }
}
