use crate::config::AuditConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// A machine translation of one string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineTranslation {
    pub text: String,
    /// Source language as detected by the service, when reported
    pub detected_source: Option<String>,
}

/// Google Translate client using the public `translate_a/single` endpoint.
///
/// The source language is always auto-detected, so strings in different
/// languages can be sent through the same translator.
pub struct MachineTranslator {
    http: reqwest::Client,
    api_url: String,
    target_language: String,
}

impl MachineTranslator {
    pub fn new(
        http: reqwest::Client,
        api_url: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            target_language: target_language.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &AuditConfig) -> Self {
        Self::new(
            http,
            config.translate_api_url.clone(),
            config.target_language.clone(),
        )
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Translate a single string. Blank input translates to "" without a request.
    pub async fn translate(&self, text: &str) -> Result<MachineTranslation> {
        if text.trim().is_empty() {
            return Ok(MachineTranslation {
                text: String::new(),
                detected_source: None,
            });
        }

        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", self.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("Failed to send request to Google Translate")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google Translate API error ({}): {}", status, body);
        }

        let value: Value = response
            .json()
            .await
            .context("Failed to parse Google Translate response")?;

        parse_translation(&value)
    }

    /// Translate every string in order, one request at a time
    pub async fn translate_batch(&self, texts: &[String]) -> Result<Vec<MachineTranslation>> {
        let mut translations = Vec::with_capacity(texts.len());
        for text in texts {
            let translation = self.translate(text).await?;
            debug!(
                "Translated {:?} from {} to {}",
                text,
                translation.detected_source.as_deref().unwrap_or("?"),
                self.target_language
            );
            translations.push(translation);
        }
        Ok(translations)
    }
}

/// Pull the translated text out of the nested-array response.
///
/// Element 0 holds sentence segments `[translated, original, ...]`; element 2
/// is the detected source language.
fn parse_translation(value: &Value) -> Result<MachineTranslation> {
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .context("Google Translate response contained no segments")?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let detected_source = value.get(2).and_then(Value::as_str).map(str::to_string);

    Ok(MachineTranslation {
        text,
        detected_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Response Parsing Tests ====================

    #[test]
    fn test_parse_single_segment() {
        let value = serde_json::json!([[["Hello", "Hallo", null, null, 10]], null, "de"]);

        let translation = parse_translation(&value).expect("Should parse");
        assert_eq!(translation.text, "Hello");
        assert_eq!(translation.detected_source.as_deref(), Some("de"));
    }

    #[test]
    fn test_parse_joins_segments_in_order() {
        let value = serde_json::json!([
            [
                ["First sentence. ", "Erster Satz. ", null, null, 10],
                ["Second sentence.", "Zweiter Satz.", null, null, 10]
            ],
            null,
            "de"
        ]);

        let translation = parse_translation(&value).expect("Should parse");
        assert_eq!(translation.text, "First sentence. Second sentence.");
    }

    #[test]
    fn test_parse_missing_source_language() {
        let value = serde_json::json!([[["Hello", "Bonjour"]]]);

        let translation = parse_translation(&value).expect("Should parse");
        assert_eq!(translation.text, "Hello");
        assert!(translation.detected_source.is_none());
    }

    #[test]
    fn test_parse_unexpected_shape() {
        let value = serde_json::json!({"error": "nope"});
        assert!(parse_translation(&value).is_err());
    }

    // ==================== Translator Tests with Wiremock ====================

    #[tokio::test]
    async fn test_translate_sends_auto_detect_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("client", "gtx"))
            .and(query_param("sl", "auto"))
            .and(query_param("tl", "en"))
            .and(query_param("dt", "t"))
            .and(query_param("q", "Bonjour"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([[["Hello", "Bonjour"]], null, "fr"])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let translator = MachineTranslator::new(
            reqwest::Client::new(),
            format!("{}/translate_a/single", mock_server.uri()),
            "en",
        );

        let translation = translator.translate("Bonjour").await.expect("Should succeed");
        assert_eq!(translation.text, "Hello");
        assert_eq!(translation.detected_source.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_translate_blank_text_skips_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let translator = MachineTranslator::new(
            reqwest::Client::new(),
            format!("{}/translate_a/single", mock_server.uri()),
            "en",
        );

        let translation = translator.translate(" \n ").await.expect("Should succeed");
        assert_eq!(translation.text, "");
        assert!(translation.detected_source.is_none());
    }

    #[tokio::test]
    async fn test_translate_batch_preserves_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("q", "Hallo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([[["Hello", "Hallo"]], null, "de"])),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(query_param("q", "Hola"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([[["Hi", "Hola"]], null, "es"])),
            )
            .mount(&mock_server)
            .await;

        let translator = MachineTranslator::new(reqwest::Client::new(), mock_server.uri(), "en");

        let texts = vec!["Hola".to_string(), "Hallo".to_string()];
        let translations = translator.translate_batch(&texts).await.expect("Should succeed");

        assert_eq!(translations.len(), 2);
        assert_eq!(translations[0].text, "Hi");
        assert_eq!(translations[1].text, "Hello");
    }

    #[tokio::test]
    async fn test_translate_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&mock_server)
            .await;

        let translator = MachineTranslator::new(reqwest::Client::new(), mock_server.uri(), "en");

        let err = translator.translate("Hallo").await.unwrap_err().to_string();
        assert!(err.contains("429"));
    }
}
