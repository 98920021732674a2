use anyhow::Result;
use serde::{Serialize, Deserialize};
use async_trait::async_trait;

pub mod whisper;

#[derive(Debug, Clone)]
pub struct AsrParams {
    pub language: Option<String>,
    pub single_segment: bool,
}

impl AsrParams {
    pub fn new() -> Self {
        Self {
            language: None,
            single_segment: false,
        }
    }

    pub fn set_language(&mut self, language: Option<String>) -> &Self {
        self.language = language;
        self
    }

    pub fn set_single_segment(&mut self, single_segment: bool) -> &Self {
        self.single_segment = single_segment;
        self
    }
}

impl Default for AsrParams {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResult {
    pub segments: Vec<TranscribeSegment>,
}

impl TranscribeResult {
    /// Collapse the timed segments into one string, single-space separated.
    /// No timing metadata survives past this point.
    pub fn joined_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
pub trait AsrEngine: Send + Sync {
    async fn transcribe(&self, audio: Vec<f32>, params: AsrParams) -> Result<TranscribeResult>;
}
