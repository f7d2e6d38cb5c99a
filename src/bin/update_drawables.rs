//! Sync drawable markers with the Material Design Icons catalog
//!
//! Usage:
//!   cargo run --bin update-drawables
//!
//! Optional environment variables:
//! - ICONS_MANIFEST (defaults to icons.json)
//! - ICONS_META_URL (defaults to the MaterialDesign meta.json on GitHub)

use anyhow::Result;
use std::path::Path;
use tracing::info;
use treble_scripts::{config::DrawablesConfig, icons};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    treble_scripts::init_logging("update_drawables")?;

    let config = DrawablesConfig::from_env();
    info!(
        "Syncing {} against {}",
        config.manifest_path, config.meta_url
    );

    icons::run(&config, Path::new(".")).await?;

    Ok(())
}
