//! HTML audit report.

use crate::audit::{FuzzySet, TermTable};
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::info;

const DEFAULT_TEMPLATE: &str = include_str!("../templates/audit_translations.html");

/// Everything the report shows
pub struct AuditReport<'a> {
    /// Translations as they are in POEditor
    pub originals: &'a TermTable,
    /// Machine translations of `originals`
    pub machine: &'a TermTable,
    pub fuzzy: &'a FuzzySet,
}

/// Read the template at `path`, or the built-in one when unset
pub fn load_template(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read report template {}", path)),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// Render the report into `template`.
///
/// Substitutes `{generated}`, `{term_count}`, `{fuzzy_count}`,
/// `{language_headers}` and `{rows}`.
pub fn render(template: &str, report: &AuditReport<'_>) -> String {
    let languages: BTreeSet<&str> = report
        .machine
        .values()
        .chain(report.originals.values())
        .flat_map(|langs| langs.keys().map(String::as_str))
        .collect();

    let mut headers = String::new();
    for language in &languages {
        headers.push_str("<th>");
        escape_html_into(&mut headers, language);
        headers.push_str("</th>");
    }

    let terms: BTreeSet<&str> = report
        .machine
        .keys()
        .chain(report.originals.keys())
        .map(String::as_str)
        .collect();

    let mut rows = String::with_capacity(terms.len() * 128);
    for term in &terms {
        rows.push_str("<tr><th class=\"term\">");
        escape_html_into(&mut rows, term);
        rows.push_str("</th>");

        for language in &languages {
            let original = report.originals.get(*term).and_then(|l| l.get(*language));
            let machine = report.machine.get(*term).and_then(|l| l.get(*language));

            if original.is_none() && machine.is_none() {
                rows.push_str("<td class=\"missing\"></td>");
                continue;
            }

            let is_fuzzy = report
                .fuzzy
                .contains(&(language.to_string(), term.to_string()));
            rows.push_str(if is_fuzzy {
                "<td class=\"fuzzy\">"
            } else {
                "<td>"
            });

            if let Some(original) = original {
                rows.push_str("<div class=\"original\">");
                escape_html_into(&mut rows, original);
                rows.push_str("</div>");
            }
            if let Some(machine) = machine {
                rows.push_str("<div class=\"machine\">");
                escape_html_into(&mut rows, machine);
                rows.push_str("</div>");
            }
            rows.push_str("</td>");
        }

        rows.push_str("</tr>\n");
    }

    let generated = Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();

    template
        .replace("{generated}", &generated)
        .replace("{term_count}", &terms.len().to_string())
        .replace("{fuzzy_count}", &report.fuzzy.len().to_string())
        .replace("{language_headers}", &headers)
        .replace("{rows}", &rows)
}

/// HTML-escape `s` into `out`
pub fn escape_html_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

pub fn write_report(path: &Path, rendered: &str) -> Result<()> {
    fs::write(path, rendered)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Wrote report to {}", path.display());
    Ok(())
}

/// `file://` URL for an existing file
pub fn file_url(path: &Path) -> Result<String> {
    let absolute = fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    Ok(file_url_for(&absolute.display().to_string()))
}

/// Build the URL for an absolute path. Windows verbatim paths (`\\?\C:\...`)
/// become `file:///C:/...`.
fn file_url_for(absolute: &str) -> String {
    match absolute.strip_prefix(r"\\?\") {
        Some(windows_path) => format!("file:///{}", windows_path.replace('\\', "/")),
        None => format!("file://{}", absolute),
    }
}

/// Open `path` in the default browser and return the URL that was opened
pub fn open_in_browser(path: &Path) -> Result<String> {
    let url = file_url(path)?;

    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };

    command
        .arg(&url)
        .spawn()
        .with_context(|| format!("Failed to open {} in a browser", url))?;

    Ok(url)
}
