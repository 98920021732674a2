use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::{TranslateError, Translator, EMPTY_TEXT_PLACEHOLDER};

const GOOGLE_GTX_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Translation over the public Google web endpoint (client=gtx). No API key;
/// the reply is a nested JSON array whose first element lists translated
/// sentence chunks.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_endpoint(GOOGLE_GTX_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn extract_translation(body: &serde_json::Value) -> Result<String, TranslateError> {
        let chunks = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| TranslateError::BadResponse("missing sentence list in reply".to_string()))?;

        let mut translated = String::new();
        for chunk in chunks {
            if let Some(part) = chunk.get(0).and_then(|v| v.as_str()) {
                translated.push_str(part);
            }
        }

        if translated.is_empty() {
            return Err(TranslateError::BadResponse("no translated text in reply".to_string()));
        }
        Ok(translated)
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(EMPTY_TEXT_PLACEHOLDER.to_string());
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::Http(format!(
                "service returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::BadResponse(e.to_string()))?;

        let translated = Self::extract_translation(&body)?;
        info!("Translated {} chars to '{}'", text.len(), target_lang);
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_text_short_circuits() {
        // endpoint is unroutable; an attempted call would error, proving the
        // placeholder path never touches the network
        let translator = GoogleTranslator::with_endpoint("http://127.0.0.1:9/translate_a/single");

        let out = translator.translate("", "kn").await.unwrap();
        assert_eq!(out, EMPTY_TEXT_PLACEHOLDER);

        let out = translator.translate("   \n", "fr").await.unwrap();
        assert_eq!(out, EMPTY_TEXT_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_service_failure_is_typed_with_prefix() {
        let translator = GoogleTranslator::with_endpoint("http://127.0.0.1:9/translate_a/single");

        let err = translator.translate("hello", "kn").await.unwrap_err();
        assert!(matches!(err, TranslateError::Http(_)));
        assert!(err.to_string().starts_with("Translation error:"));
    }

    #[test]
    fn test_extract_translation_concatenates_chunks() {
        let body = serde_json::json!([
            [
                ["Bonjour ", "Hello ", null],
                ["le monde", "world", null]
            ],
            null,
            "en"
        ]);
        let out = GoogleTranslator::extract_translation(&body).unwrap();
        assert_eq!(out, "Bonjour le monde");
    }

    #[test]
    fn test_extract_translation_rejects_malformed_reply() {
        let body = serde_json::json!({ "unexpected": "shape" });
        let err = GoogleTranslator::extract_translation(&body).unwrap_err();
        assert!(matches!(err, TranslateError::BadResponse(_)));
    }
}
