//! Loading an existing WAV file for transcription (file mode).

use anyhow::{Context, Result};
use std::path::Path;

use super::recorder::Recording;
use super::resample::{TARGET_SAMPLE_RATE, to_target_rate};

/// Read a WAV file and return it as a 16kHz mono recording.
pub fn load_wav_file(path: &Path) -> Result<Recording> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("wav") => {}
        Some(ext) => anyhow::bail!("Unsupported audio format: .{ext}\nCurrently supported: WAV"),
        None => anyhow::bail!("File has no extension. Please provide a WAV file."),
    }

    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read float samples")?,
        hound::SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read int samples")?
        }
    };

    let samples = to_target_rate(&samples, spec.sample_rate, spec.channels)?;
    Ok(Recording {
        samples,
        sample_rate: TARGET_SAMPLE_RATE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encoder::encode_wav;

    #[test]
    fn rejects_non_wav_extension() {
        let err = load_wav_file(Path::new("note.ogg")).unwrap_err();
        assert!(err.to_string().contains("Unsupported audio format"));
    }

    #[test]
    fn rejects_missing_extension() {
        assert!(load_wav_file(Path::new("note")).is_err());
    }

    #[test]
    fn round_trips_a_16k_wav() {
        let samples: Vec<f32> = (0..1600).map(|i| (i as f32 * 0.01).sin() * 0.25).collect();
        let wav = encode_wav(&samples, TARGET_SAMPLE_RATE).unwrap();

        let dir = std::env::temp_dir();
        let path = dir.join(format!("vozlog_loader_test_{}.wav", std::process::id()));
        std::fs::write(&path, wav).unwrap();

        let recording = load_wav_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(recording.sample_rate, TARGET_SAMPLE_RATE);
        assert_eq!(recording.samples.len(), samples.len());
        // 16-bit quantization tolerance
        for (a, b) in recording.samples.iter().zip(samples.iter()) {
            assert!((a - b).abs() < 0.001);
        }
    }
}
