use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};
use anyhow::Result;
use crate::asr::{AsrEngine, AsrParams, TranscribeResult, TranscribeSegment};

/// Whisper-backed speech recognition. The model is expected to be a quantized
/// ggml file (e.g. ggml-base.en-q8_0.bin); it is loaded once and shared.
pub struct WhisperAsr {
    whisper_ctx: WhisperContext,
}

impl WhisperAsr {
    pub fn new(model_path: String) -> Result<Self> {
        match WhisperContext::new_with_params(&model_path, WhisperContextParameters::default()) {
            Ok(whisper_ctx) => Ok(Self { whisper_ctx }),
            Err(e) => Err(anyhow::anyhow!("failed to open whisper model: {}", e)),
        }
    }

    fn build_params(&self, ap: &AsrParams) -> FullParams {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        params.set_single_segment(ap.single_segment);

        // 设置使用的线程数，提高并行处理能力
        params.set_n_threads(8);

        params.set_temperature(0.0);

        // 识别结果交给外部翻译服务，whisper 自带的翻译保持关闭
        params.set_translate(false);

        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);

        params.set_suppress_blank(true);
        params.set_suppress_non_speech_tokens(true);

        params
    }
}

#[async_trait::async_trait]
impl AsrEngine for WhisperAsr {
    async fn transcribe(&self, audio: Vec<f32>, user_params: AsrParams) -> Result<TranscribeResult> {
        let mut state = self.whisper_ctx.create_state()?;
        let lan = user_params.language.clone().unwrap_or("en".to_string());
        let mut params = self.build_params(&user_params);
        params.set_language(Some(lan.as_str()));

        state.full(params, &audio)?;
        let num_segments = state.full_n_segments()?;

        let mut segments = Vec::new();
        for i in 0..num_segments {
            let text = state.full_get_segment_text(i)?;
            let start = state.full_get_segment_t0(i)?;
            let end = state.full_get_segment_t1(i)?;

            segments.push(TranscribeSegment {
                text,
                start: start as f64,
                end: end as f64,
            });
        }

        Ok(TranscribeResult { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crate::audio::load_wav_mono_16k;
    use anyhow::Result;

    #[tokio::test]
    #[ignore] // requires a local whisper model and test audio
    async fn test_transcribe() -> Result<()> {
        let audio_path = Path::new("./test/english.wav");
        let whisper_path = Path::new("./models/ggml-base.en-q8_0.bin");

        if !audio_path.exists() {
            panic!("audio file doesn't exist");
        }
        if !whisper_path.exists() {
            panic!("whisper file doesn't exist");
        }

        let samples = load_wav_mono_16k(audio_path)?;

        let asr = WhisperAsr::new(whisper_path.to_string_lossy().to_string())?;
        let mut params = AsrParams::new();
        params.set_language(Some("en".to_string()));

        let result = asr.transcribe(samples, params).await?;
        println!("{}", result.joined_text());
        assert!(!result.segments.is_empty());

        Ok(())
    }
}
