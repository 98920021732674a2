use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

/// Capture rate for microphone recordings. Matches what the ASR expects so
/// recordings skip the resampling path.
pub const RECORD_SAMPLE_RATE: u32 = 16_000;

/// Record `duration_secs` of mono 16-bit PCM from the default input device and
/// persist it as a uniquely named WAV file under `dir`.
///
/// Blocks the calling thread for the full duration; callers on the async
/// runtime go through `spawn_blocking`. Device and I/O errors propagate.
pub fn record_to_wav(duration_secs: u64, sample_rate: u32, dir: &Path) -> Result<PathBuf> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow::anyhow!("no default input device available"))?;

    info!(
        "Recording {}s from input device: {}",
        duration_secs,
        device.name().unwrap_or_else(|_| "unknown".to_string())
    );

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let buffer: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));
    let err_callback = |err| {
        tracing::error!("Audio stream error: {}", err);
    };

    // i16 first; fall back to f32 for devices that only expose float formats
    let stream = {
        let buf = Arc::clone(&buffer);
        match device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if let Ok(mut b) = buf.lock() {
                    b.extend_from_slice(data);
                }
            },
            err_callback,
            None,
        ) {
            Ok(stream) => stream,
            Err(_) => {
                let buf = Arc::clone(&buffer);
                device
                    .build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            if let Ok(mut b) = buf.lock() {
                                b.extend(
                                    data.iter()
                                        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                                );
                            }
                        },
                        err_callback,
                        None,
                    )
                    .map_err(|e| anyhow::anyhow!("failed to open input stream: {}", e))?
            }
        }
    };

    stream
        .play()
        .map_err(|e| anyhow::anyhow!("failed to start audio stream: {}", e))?;
    std::thread::sleep(std::time::Duration::from_secs(duration_secs));
    drop(stream);

    let samples = buffer
        .lock()
        .map_err(|e| anyhow::anyhow!("audio buffer poisoned: {}", e))?;
    let wanted = duration_secs as usize * sample_rate as usize;
    let samples = if samples.len() > wanted {
        &samples[..wanted]
    } else {
        &samples[..]
    };

    write_wav(samples, sample_rate, dir)
}

fn write_wav(samples: &[i16], sample_rate: u32, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("rec-{}.wav", Uuid::new_v4()));

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(&path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!("Saved recording to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::load_wav_mono_16k;

    #[test]
    fn test_write_wav_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let samples: Vec<i16> = (0..RECORD_SAMPLE_RATE as i32).map(|i| (i % 1000) as i16).collect();

        let path = write_wav(&samples, RECORD_SAMPLE_RATE, dir.path()).unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("rec-"));

        let loaded = load_wav_mono_16k(&path).unwrap();
        assert_eq!(loaded.len(), samples.len());
    }

    #[test]
    fn test_write_wav_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_wav(&[0i16; 16], RECORD_SAMPLE_RATE, dir.path()).unwrap();
        let b = write_wav(&[0i16; 16], RECORD_SAMPLE_RATE, dir.path()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    #[ignore] // requires audio hardware
    fn test_record_to_wav_from_default_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = record_to_wav(1, RECORD_SAMPLE_RATE, dir.path()).unwrap();
        assert!(path.exists());
    }
}
