//! Drawable sync against the Material Design Icons catalog.

use crate::config::DrawablesConfig;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Local drawable path -> icon name, in file order
pub type Manifest = IndexMap<String, String>;

/// One entry of the remote `meta.json`. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IconRecord {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("icon {name} (for {path}) is not in the catalog")]
    UnknownIcon { name: String, path: String },
}

/// Files written and deprecated icons seen during a sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    pub deprecated: Vec<String>,
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read icon manifest {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse icon manifest {}", path.display()))?;
    info!("Loaded {} icons from {}", manifest.len(), path.display());
    Ok(manifest)
}

/// Fetch and parse the icon catalog
pub async fn fetch_meta(client: &reqwest::Client, url: &str) -> Result<Vec<IconRecord>> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to send request for icon metadata")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Icon metadata error ({}): {}", status, body);
    }

    let records: Vec<IconRecord> = response
        .json()
        .await
        .context("Failed to parse icon metadata")?;

    info!("Fetched {} icon records", records.len());
    Ok(records)
}

/// Index records by name; a later record with the same name replaces an earlier one
pub fn index_by_name(records: Vec<IconRecord>) -> HashMap<String, IconRecord> {
    records
        .into_iter()
        .map(|record| (record.name.clone(), record))
        .collect()
}

pub fn marker_contents(id: &str) -> String {
    format!(
        "<!-- File auto-synced, do not edit! MaterialDesignIcons ID: {}-->\n",
        id
    )
}

/// Write the marker for every manifest entry, stopping at the first unknown icon.
///
/// Relative manifest paths are resolved against `base_dir`.
pub fn sync_icons(
    manifest: &Manifest,
    index: &HashMap<String, IconRecord>,
    base_dir: &Path,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    for (icon_path, icon_name) in manifest {
        let icon = index.get(icon_name).ok_or_else(|| SyncError::UnknownIcon {
            name: icon_name.clone(),
            path: icon_path.clone(),
        })?;

        if icon.deprecated {
            warn!("Icon {} is deprecated.", icon_name);
            report.deprecated.push(icon_name.clone());
        }

        let target = base_dir.join(icon_path);
        fs::write(&target, marker_contents(&icon.id))
            .with_context(|| format!("Failed to write {}", target.display()))?;
        report.written.push(target);
    }

    Ok(report)
}

/// Load the manifest, fetch the catalog and write every marker under `base_dir`
pub async fn run(config: &DrawablesConfig, base_dir: &Path) -> Result<SyncReport> {
    let manifest = load_manifest(Path::new(&config.manifest_path))?;

    let client = reqwest::Client::new();
    let index = index_by_name(fetch_meta(&client, &config.meta_url).await?);

    let report = sync_icons(&manifest, &index, base_dir)?;
    info!(
        "Synced {} drawables ({} deprecated)",
        report.written.len(),
        report.deprecated.len()
    );
    Ok(report)
}
