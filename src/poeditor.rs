use crate::config::AuditConfig;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use tracing::debug;

/// Envelope wrapping every POEditor v2 response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    response: ResponseStatus,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    status: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesResult {
    languages: Vec<ProjectLanguage>,
}

#[derive(Debug, Deserialize)]
struct TermsResult {
    terms: Vec<Term>,
}

/// A language added to the project
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectLanguage {
    pub name: String,
    pub code: String,
    /// Number of translated terms
    #[serde(default)]
    pub translations: u32,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub updated: Option<String>,
}

impl ProjectLanguage {
    /// Languages with nothing translated are skipped by the audit
    pub fn has_translations(&self) -> bool {
        self.translations > 0
    }
}

/// A project term together with its translation in the requested language
#[derive(Debug, Clone, Deserialize)]
pub struct Term {
    pub term: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub translation: Option<Translation>,
}

impl Term {
    /// Translated text, empty when the term has no translation
    pub fn content(&self) -> &str {
        self.translation
            .as_ref()
            .map(|t| t.content.as_text())
            .unwrap_or("")
    }

    pub fn is_fuzzy(&self) -> bool {
        self.translation.as_ref().is_some_and(|t| t.fuzzy)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub content: TranslationContent,
    /// POEditor sends 0/1 here
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub fuzzy: bool,
}

/// Translation content: a plain string, or plural forms keyed by category
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TranslationContent {
    Text(String),
    Plural(BTreeMap<String, String>),
}

impl Default for TranslationContent {
    fn default() -> Self {
        TranslationContent::Text(String::new())
    }
}

impl TranslationContent {
    /// Plural terms collapse to their `other` form, falling back to the first form
    pub fn as_text(&self) -> &str {
        match self {
            TranslationContent::Text(text) => text,
            TranslationContent::Plural(forms) => forms
                .get("other")
                .or_else(|| forms.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Text(s) => s == "1" || s.eq_ignore_ascii_case("true"),
    })
}

/// Client for the POEditor v2 API, scoped to one project
pub struct PoEditorClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    project_id: u64,
}

impl PoEditorClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        project_id: u64,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_token: api_token.into(),
            project_id,
        }
    }

    pub fn from_config(http: reqwest::Client, config: &AuditConfig) -> Self {
        Self::new(
            http,
            config.poeditor_api_url.clone(),
            config.api_token.clone(),
            config.project_id,
        )
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// List the languages added to the project
    pub async fn list_languages(&self) -> Result<Vec<ProjectLanguage>> {
        let result: LanguagesResult = self.call("languages/list", &[]).await?;
        Ok(result.languages)
    }

    /// List every term with its translation in `language`
    pub async fn list_terms(&self, language: &str) -> Result<Vec<Term>> {
        let result: TermsResult = self
            .call("terms/list", &[("language", language)])
            .await
            .with_context(|| format!("Failed to list terms for language {}", language))?;
        Ok(result.terms)
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let project_id = self.project_id.to_string();

        let mut form = vec![("api_token", self.api_token.as_str()), ("id", project_id.as_str())];
        form.extend_from_slice(params);

        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .context("Failed to send request to POEditor API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("POEditor API error ({}): {}", status, body);
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .context("Failed to parse POEditor response")?;

        if envelope.response.status != "success" {
            anyhow::bail!(
                "POEditor API error ({}): {}",
                envelope.response.code,
                envelope.response.message
            );
        }

        envelope
            .result
            .with_context(|| format!("POEditor response for {} contained no result", endpoint))
    }
}
