use crate::types::AudioData;
use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Decode a WAV file to mono f64 samples in [-1.0, 1.0]
pub fn decode_wav<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path = path.as_ref();

    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("WAV file {} declares zero channels", path.display());
    }

    // Read interleaved samples, scaled to [-1.0, 1.0]
    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()
            .context("Failed to read float samples")?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 * scale))
                .collect::<std::result::Result<_, _>>()
                .context("Failed to read integer samples")?
        }
    };

    Ok(AudioData {
        samples: mix_to_mono(&interleaved, spec.channels as usize),
        sample_rate: spec.sample_rate,
    })
}

/// Average interleaved channels into a single channel
fn mix_to_mono(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}
