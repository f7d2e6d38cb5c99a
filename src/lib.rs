//! Developer scripts for the app repository.
//!
//! Two unrelated utilities share this library:
//!
//! - `audit-translations`: pulls translations from POEditor, back-translates
//!   them with Google Translate and renders an HTML audit report.
//! - `update-drawables`: resolves the icon manifest against the Material
//!   Design Icons catalog and writes marker drawables.

pub mod audit;
pub mod config;
pub mod icons;
pub mod poeditor;
pub mod report;
pub mod translate;

/// Install the tracing subscriber used by both binaries.
///
/// `bin_target` is the binary's own log target (e.g. `update_drawables`),
/// enabled at `info` alongside the library.
pub fn init_logging(bin_target: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("treble_scripts=info".parse()?)
                .add_directive(format!("{}=info", bin_target).parse()?),
        )
        .init();
    Ok(())
}
