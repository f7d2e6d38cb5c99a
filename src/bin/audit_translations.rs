//! Translation audit - back-translates every POEditor translation and opens
//! an HTML report comparing them
//!
//! Usage:
//!   cargo run --bin audit-translations -- <API_TOKEN> <PROJECT_ID>
//!   cargo run --bin audit-translations -- <API_TOKEN> <PROJECT_ID> --save-cache
//!   cargo run --bin audit-translations -- <API_TOKEN> <PROJECT_ID> --use-cached
//!   cargo run --bin audit-translations -- <API_TOKEN> <PROJECT_ID> --no-open
//!
//! Optional environment variables:
//! - POEDITOR_API_URL, TRANSLATE_API_URL
//! - AUDIT_TARGET_LANGUAGE (defaults to en)
//! - AUDIT_TEMPLATE (defaults to the built-in template)
//! - AUDIT_OUTPUT (defaults to output.html)
//! - AUDIT_TRANSLATIONS_CACHE, AUDIT_FUZZY_CACHE (default tmp.json, 3.json)

use anyhow::Result;
use clap::Parser;
use tracing::info;
use treble_scripts::{
    audit::{self, AuditOptions},
    config::AuditConfig,
    report,
};

#[derive(Debug, Parser)]
#[command(name = "audit-translations", about = "Render a machine-translation audit of POEditor translations")]
struct Cli {
    /// POEditor API token
    api_token: String,

    /// POEditor project ID
    project_id: u64,

    /// Load translations from the cache files instead of POEditor
    #[arg(long, conflicts_with = "save_cache")]
    use_cached: bool,

    /// Save fetched translations to the cache files
    #[arg(long)]
    save_cache: bool,

    /// Write the report without opening a browser
    #[arg(long)]
    no_open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    treble_scripts::init_logging("audit_translations")?;

    let cli = Cli::parse();

    info!("Starting translation audit for project {}", cli.project_id);

    let config = AuditConfig::from_env(cli.api_token, cli.project_id);
    let outcome = audit::run(
        &config,
        AuditOptions {
            use_cached: cli.use_cached,
            save_cache: cli.save_cache,
        },
    )
    .await?;

    info!(
        "Audited {} terms ({} fuzzy)",
        outcome.term_count, outcome.fuzzy_count
    );

    if cli.no_open {
        info!("Report written to {}", outcome.report_path.display());
    } else {
        let url = report::open_in_browser(&outcome.report_path)?;
        info!("Opened {}", url);
    }

    Ok(())
}
