use rubato::{SincFixedIn, SincInterpolationParameters, WindowFunction, Resampler};
use hound::{SampleFormat, WavReader};
use std::path::Path;
use anyhow::Result;
use tracing::info;

pub mod capture;

/// Sample rate the ASR engine expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// 读取 WAV 文件并转换为 16kHz 单声道样本
///
/// 处理步骤:
/// 1. 读取 WAV 文件 (仅支持 16 位整数格式)
/// 2. 转换为单声道
/// 3. 如果需要，重采样到 16kHz
pub fn load_wav_mono_16k(path: &Path) -> Result<Vec<f32>> {
    let (samples, num_channels, sample_rate) = read_wav_file(path)?;
    let mono_samples = convert_to_mono(&samples, num_channels);

    if sample_rate != TARGET_SAMPLE_RATE {
        resample_audio(&mono_samples, sample_rate)
    } else {
        Ok(mono_samples)
    }
}

fn read_wav_file(path: &Path) -> Result<(Vec<f32>, usize, u32)> {
    let mut reader = WavReader::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to read WAV file: {}", e))?;

    let num_channels = reader.spec().channels as usize;
    let sample_rate = reader.spec().sample_rate;

    if reader.spec().sample_format != SampleFormat::Int {
        return Err(anyhow::anyhow!("Unsupported sample format: expected integer format"));
    }

    if reader.spec().bits_per_sample != 16 {
        return Err(anyhow::anyhow!("Unsupported bits per sample: expected 16 bits"));
    }

    let samples: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| s.map(|val| val as f32 / 32768.0))
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|e| anyhow::anyhow!("Failed to read samples: {}", e))?;

    Ok((samples, num_channels, sample_rate))
}

/// 通过对每个采样的所有通道取平均值，将多声道音频转换为单声道
fn convert_to_mono(samples: &[f32], num_channels: usize) -> Vec<f32> {
    if num_channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(num_channels)
        .map(|chunk| chunk.iter().sum::<f32>() / num_channels as f32)
        .collect()
}

/// 将音频重采样到 16kHz 采样率
fn resample_audio(samples: &[f32], original_sample_rate: u32) -> Result<Vec<f32>> {
    info!("Resampling from {} Hz to {} Hz", original_sample_rate, TARGET_SAMPLE_RATE);

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: rubato::SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(
        TARGET_SAMPLE_RATE as f64 / original_sample_rate as f64,
        2.0,
        params,
        samples.len(),
        1,
    )
    .map_err(|e| anyhow::anyhow!("Failed to create resampler: {}", e))?;

    let resampled = resampler
        .process(&[samples.to_vec()], None)
        .map_err(|e| anyhow::anyhow!("Resampling failed: {}", e))?;

    Ok(resampled.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::path::PathBuf;

    fn write_test_wav(dir: &Path, name: &str, channels: u16, sample_rate: u32, frames: usize) -> PathBuf {
        let path = dir.join(name);
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for i in 0..frames {
            for _ in 0..channels {
                writer.write_sample(((i % 100) as i16) * 100).unwrap();
            }
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_load_mono_16k_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_wav(dir.path(), "mono.wav", 1, 16_000, 1600);

        let samples = load_wav_mono_16k(&path).unwrap();
        assert_eq!(samples.len(), 1600);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_load_stereo_mixes_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_wav(dir.path(), "stereo.wav", 2, 16_000, 800);

        let samples = load_wav_mono_16k(&path).unwrap();
        assert_eq!(samples.len(), 800);
    }

    #[test]
    fn test_load_resamples_non_16k() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_wav(dir.path(), "wideband.wav", 1, 32_000, 3200);

        let samples = load_wav_mono_16k(&path).unwrap();
        // 32kHz -> 16kHz halves the sample count, within resampler tolerance
        assert!((samples.len() as i64 - 1600).abs() < 64, "got {} samples", samples.len());
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let err = load_wav_mono_16k(Path::new("./no-such-file.wav")).unwrap_err();
        assert!(err.to_string().contains("Failed to read WAV file"));
    }

    #[test]
    fn test_load_rejects_float_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        let err = load_wav_mono_16k(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported sample format"));
    }
}
