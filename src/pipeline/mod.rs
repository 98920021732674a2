use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

use crate::asr::{AsrEngine, AsrParams};
use crate::audio;
use crate::task::TaskRegistry;
use crate::translate::Translator;

/// Composes audio load → transcription → translation → registry write for one
/// recorded file. One spawned runner invocation per task; the runner is the
/// task's only producer.
pub struct PipelineRunner {
    asr: Arc<dyn AsrEngine>,
    translator: Arc<dyn Translator>,
    registry: Arc<TaskRegistry>,
    task_timeout: Duration,
}

impl PipelineRunner {
    pub fn new(
        asr: Arc<dyn AsrEngine>,
        translator: Arc<dyn Translator>,
        registry: Arc<TaskRegistry>,
        task_timeout: Duration,
    ) -> Self {
        Self {
            asr,
            translator,
            registry,
            task_timeout,
        }
    }

    /// Run the pipeline for a registered task. Errors (including deadline
    /// expiry) end up on the task as `failed`; nothing propagates. The audio
    /// file is deleted whatever the outcome.
    pub async fn run_task(&self, audio_path: PathBuf, task_id: &str, target_lang: &str) {
        match self.transcribe_and_translate(&audio_path, target_lang).await {
            Ok((transcription, translation)) => {
                self.registry.complete(task_id, transcription, translation).await;
            }
            Err(e) => {
                error!("Task {} failed: {}", task_id, e);
                self.registry.fail(task_id, e.to_string()).await;
            }
        }
        Self::cleanup_audio(&audio_path);
    }

    /// Run the pipeline without a registry entry; errors propagate to the
    /// caller. The audio file is deleted whatever the outcome.
    pub async fn run_inline(&self, audio_path: PathBuf, target_lang: &str) -> Result<(String, String)> {
        let outcome = self.transcribe_and_translate(&audio_path, target_lang).await;
        Self::cleanup_audio(&audio_path);
        outcome
    }

    async fn transcribe_and_translate(
        &self,
        audio_path: &Path,
        target_lang: &str,
    ) -> Result<(String, String)> {
        // one deadline across both external calls
        let deadline = Instant::now() + self.task_timeout;

        let samples = audio::load_wav_mono_16k(audio_path)?;

        let mut params = AsrParams::new();
        params.set_language(Some("en".to_string()));

        let result = timeout_at(deadline, self.asr.transcribe(samples, params))
            .await
            .map_err(|_| anyhow::anyhow!("transcription timed out after {:?}", self.task_timeout))??;
        let transcription = result.joined_text();
        info!("Transcription completed ({} segments)", result.segments.len());

        let translation = timeout_at(deadline, self.translator.translate(&transcription, target_lang))
            .await
            .map_err(|_| anyhow::anyhow!("translation timed out after {:?}", self.task_timeout))??;
        info!("Translation completed (target_lang={})", target_lang);

        Ok((transcription, translation))
    }

    fn cleanup_audio(path: &Path) {
        if path.exists() {
            match std::fs::remove_file(path) {
                Ok(_) => info!("Cleaned up audio file: {}", path.display()),
                Err(e) => warn!("Failed to remove audio file {}: {}", path.display(), e),
            }
        }
    }
}
