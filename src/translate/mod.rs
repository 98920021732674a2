use std::fmt::Display;
use async_trait::async_trait;

pub mod google;

pub use google::GoogleTranslator;

/// Target language used when a request doesn't carry one.
pub const DEFAULT_TARGET_LANG: &str = "kn";

/// Returned for empty input instead of calling the service.
pub const EMPTY_TEXT_PLACEHOLDER: &str = "No text provided";

#[derive(Debug)]
pub enum TranslateError {
    /// Transport or HTTP-level failure talking to the service.
    Http(String),
    /// The service answered but the reply couldn't be interpreted.
    BadResponse(String),
}

impl Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::Http(msg) => write!(f, "Translation error: {}", msg),
            TranslateError::BadResponse(msg) => write!(f, "Translation error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_lang`. Failures are a typed error, never
    /// an error message disguised as translated text.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}
