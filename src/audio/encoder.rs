use crate::types::AudioData;
use anyhow::{Context, Result};
use std::path::Path;

/// Write `audio` as mono 16-bit PCM.
///
/// Samples are expected in [-1.0, 1.0]; anything beyond is clamped to full
/// scale, so `-1.0` maps to `-32767` and the code `-32768` is never written.
pub fn encode_wav<P: AsRef<Path>>(audio: &AudioData, path: P) -> Result<()> {
    let path = path.as_ref();

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for &sample in &audio.samples {
        let pcm = (sample.clamp(-1.0, 1.0) * f64::from(i16::MAX)) as i16;
        writer
            .write_sample(pcm)
            .context("Failed to write audio sample")?;
    }

    writer.finalize().context("Failed to finalize WAV file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decoder::decode_wav;

    #[test]
    fn round_trips_through_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let audio = AudioData {
            samples: vec![0.0, 0.5, -1.5, 1.0],
            sample_rate: 16_000,
        };
        encode_wav(&audio, &path).unwrap();

        let decoded = decode_wav(&path).unwrap();
        assert_eq!(decoded.sample_rate, 16_000);
        let expected = [0.0, 16383.0 / 32768.0, -32767.0 / 32768.0, 32767.0 / 32768.0];
        for (got, want) in decoded.samples.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
    }

    #[test]
    fn out_of_range_samples_clamp_to_full_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loud.wav");
        let audio = AudioData {
            samples: vec![2.0, -3.0, -1.0, 0.25],
            sample_rate: 8_000,
        };
        encode_wav(&audio, &path).unwrap();

        let codes: Vec<i16> = hound::WavReader::open(&path)
            .unwrap()
            .samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(codes, vec![32767, -32767, -32767, 8191]);
    }
}
