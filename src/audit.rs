//! Translation audit pipeline: fetch, re-key, back-translate, render.

use crate::config::AuditConfig;
use crate::poeditor::{PoEditorClient, Term};
use crate::report::{self, AuditReport};
use crate::translate::MachineTranslator;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// language code -> term -> text
pub type LanguageTable = BTreeMap<String, BTreeMap<String, String>>;

/// term -> language code -> text
pub type TermTable = BTreeMap<String, BTreeMap<String, String>>;

/// (language code, term) pairs flagged as needing review
pub type FuzzySet = BTreeSet<(String, String)>;

/// Translations and fuzzy flags from one fetch of the project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub translations: LanguageTable,
    pub fuzzy: FuzzySet,
}

impl ProjectSnapshot {
    /// Merge one language's terms. Repeated terms overwrite earlier text.
    pub fn add_terms(&mut self, language: &str, terms: &[Term]) {
        let table = self.translations.entry(language.to_string()).or_default();
        for term in terms {
            table.insert(term.term.clone(), term.content().to_string());
            if term.is_fuzzy() {
                self.fuzzy.insert((language.to_string(), term.term.clone()));
            }
        }
    }
}

/// Where the audit takes its snapshot from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditOptions {
    /// Load the snapshot from the cache files instead of POEditor
    pub use_cached: bool,
    /// Write the freshly fetched snapshot to the cache files
    pub save_cache: bool,
}

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub report_path: PathBuf,
    pub term_count: usize,
    pub fuzzy_count: usize,
}

/// Fetch every translated language of the project
pub async fn fetch_snapshot(client: &PoEditorClient) -> Result<ProjectSnapshot> {
    let languages = client.list_languages().await?;
    info!(
        "Project {} has {} languages",
        client.project_id(),
        languages.len()
    );

    let mut snapshot = ProjectSnapshot::default();
    for language in &languages {
        if !language.has_translations() {
            debug!("Skipping {} ({}): no translations", language.name, language.code);
            continue;
        }

        let terms = client.list_terms(&language.code).await?;
        info!(
            "Fetched {} terms for {} ({})",
            terms.len(),
            language.name,
            language.code
        );
        snapshot.add_terms(&language.code, &terms);
    }

    Ok(snapshot)
}

/// Re-key a language -> term table into term -> language
pub fn rekey_by_term(translations: &LanguageTable) -> TermTable {
    let mut by_term = TermTable::new();
    for (language, terms) in translations {
        for (term, text) in terms {
            by_term
                .entry(term.clone())
                .or_default()
                .insert(language.clone(), text.clone());
        }
    }
    by_term
}

/// Back-translate every translation of every term.
///
/// The result has the same shape as `by_term`, with each text replaced by
/// its machine translation.
pub async fn machine_translate_terms(
    translator: &MachineTranslator,
    by_term: &TermTable,
) -> Result<TermTable> {
    info!(
        "Machine-translating {} terms into {}",
        by_term.len(),
        translator.target_language()
    );

    let mut output = TermTable::new();
    for (term, translations) in by_term {
        let (languages, texts): (Vec<&String>, Vec<String>) = translations
            .iter()
            .map(|(language, text)| (language, text.clone()))
            .unzip();

        let results = translator
            .translate_batch(&texts)
            .await
            .with_context(|| format!("Failed to machine-translate term {}", term))?;

        let entry = output.entry(term.clone()).or_default();
        for (language, translation) in languages.into_iter().zip(results) {
            entry.insert(language.clone(), translation.text);
        }
    }

    Ok(output)
}

/// Write the snapshot as two JSON files: the language table and a list of
/// `[language, term]` fuzzy pairs
pub fn save_snapshot(
    snapshot: &ProjectSnapshot,
    translations_path: &Path,
    fuzzy_path: &Path,
) -> Result<()> {
    let translations = serde_json::to_string_pretty(&snapshot.translations)?;
    fs::write(translations_path, translations).with_context(|| {
        format!(
            "Failed to write translations cache {}",
            translations_path.display()
        )
    })?;

    let fuzzy = serde_json::to_string_pretty(&snapshot.fuzzy)?;
    fs::write(fuzzy_path, fuzzy)
        .with_context(|| format!("Failed to write fuzzy cache {}", fuzzy_path.display()))?;

    info!(
        "Saved snapshot to {} and {}",
        translations_path.display(),
        fuzzy_path.display()
    );
    Ok(())
}

/// Load a snapshot written by [`save_snapshot`]
pub fn load_snapshot(translations_path: &Path, fuzzy_path: &Path) -> Result<ProjectSnapshot> {
    for cache_path in [translations_path, fuzzy_path] {
        if !cache_path.exists() {
            anyhow::bail!(
                "No cache found at {}. Run with --save-cache first.",
                cache_path.display()
            );
        }
    }

    let contents = fs::read_to_string(translations_path).with_context(|| {
        format!(
            "Failed to read translations cache {}",
            translations_path.display()
        )
    })?;
    let translations: LanguageTable = serde_json::from_str(&contents).with_context(|| {
        format!(
            "Failed to parse translations cache {}",
            translations_path.display()
        )
    })?;

    let contents = fs::read_to_string(fuzzy_path)
        .with_context(|| format!("Failed to read fuzzy cache {}", fuzzy_path.display()))?;
    let fuzzy: FuzzySet = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse fuzzy cache {}", fuzzy_path.display()))?;

    info!(
        "Loaded {} languages and {} fuzzy entries from cache",
        translations.len(),
        fuzzy.len()
    );
    Ok(ProjectSnapshot {
        translations,
        fuzzy,
    })
}

/// Run the whole audit and write the report. Opening it is left to the caller.
pub async fn run(config: &AuditConfig, options: AuditOptions) -> Result<AuditOutcome> {
    let http = reqwest::Client::new();
    let translations_cache = Path::new(&config.translations_cache);
    let fuzzy_cache = Path::new(&config.fuzzy_cache);

    let snapshot = if options.use_cached {
        info!("Using cached snapshot");
        load_snapshot(translations_cache, fuzzy_cache)?
    } else {
        let client = PoEditorClient::from_config(http.clone(), config);
        let snapshot = fetch_snapshot(&client).await?;
        if options.save_cache {
            save_snapshot(&snapshot, translations_cache, fuzzy_cache)?;
        }
        snapshot
    };

    let by_term = rekey_by_term(&snapshot.translations);

    let translator = MachineTranslator::from_config(http, config);
    let machine = machine_translate_terms(&translator, &by_term).await?;

    let template = report::load_template(config.template_path.as_deref())?;
    let rendered = report::render(
        &template,
        &AuditReport {
            originals: &by_term,
            machine: &machine,
            fuzzy: &snapshot.fuzzy,
        },
    );

    let report_path = PathBuf::from(&config.output_path);
    report::write_report(&report_path, &rendered)?;

    Ok(AuditOutcome {
        report_path,
        term_count: machine.len(),
        fuzzy_count: snapshot.fuzzy.len(),
    })
}
