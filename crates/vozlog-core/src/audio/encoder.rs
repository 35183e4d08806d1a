//! In-memory encoding of recorded samples for upload.
//!
//! Two formats are supported: plain 16-bit WAV (direct upload) and 128kbps
//! MP3 via the embedded LAME encoder (smaller payloads, no FFmpeg
//! dependency). Which one goes over the wire is a settings choice; MP3 is
//! the default.

use anyhow::{Context, Result};
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm, Quality};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// Wire format for the audio payload sent to the transcription API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    Wav,
    #[default]
    Mp3,
}

impl UploadFormat {
    /// Filename advertised in the multipart upload.
    pub fn file_name(&self) -> &'static str {
        match self {
            UploadFormat::Wav => "voice_note.wav",
            UploadFormat::Mp3 => "voice_note.mp3",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            UploadFormat::Wav => "audio/wav",
            UploadFormat::Mp3 => "audio/mpeg",
        }
    }

    /// Encode 16kHz mono f32 samples into this format.
    pub fn encode(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
        match self {
            UploadFormat::Wav => encode_wav(samples, sample_rate),
            UploadFormat::Mp3 => encode_mp3(samples, sample_rate),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFormat::Wav => "wav",
            UploadFormat::Mp3 => "mp3",
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UploadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(UploadFormat::Wav),
            "mp3" => Ok(UploadFormat::Mp3),
            _ => Err(format!("Unknown upload format: {s}. Available: wav, mp3")),
        }
    }
}

/// Encode samples as an in-memory 16-bit PCM WAV.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
        for &sample in samples {
            let amplitude = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(amplitude)
                .context("Failed to write WAV sample")?;
        }
        writer.finalize().context("Failed to finalize WAV data")?;
    }

    Ok(cursor.into_inner())
}

/// Encode samples as 128kbps mono MP3 with the embedded LAME encoder.
pub fn encode_mp3(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let mut builder = Builder::new().context("Failed to create LAME builder")?;
    builder
        .set_num_channels(1)
        .map_err(|e| anyhow::anyhow!("Failed to set channels: {e:?}"))?;
    builder
        .set_sample_rate(sample_rate)
        .map_err(|e| anyhow::anyhow!("Failed to set sample rate: {e:?}"))?;
    builder
        .set_brate(Bitrate::Kbps128)
        .map_err(|e| anyhow::anyhow!("Failed to set bitrate: {e:?}"))?;
    builder
        .set_quality(Quality::Best)
        .map_err(|e| anyhow::anyhow!("Failed to set quality: {e:?}"))?;
    let mut encoder = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize LAME encoder: {e:?}"))?;

    let pcm: Vec<i16> = samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();

    let mut mp3 = Vec::new();
    mp3.reserve(mp3lame_encoder::max_required_buffer_size(pcm.len()));

    let written = encoder
        .encode(MonoPcm(&pcm), mp3.spare_capacity_mut())
        .map_err(|e| anyhow::anyhow!("Failed to encode MP3: {e:?}"))?;
    // SAFETY: the encoder guarantees exactly `written` bytes of the spare
    // capacity are initialized on success.
    unsafe {
        mp3.set_len(written);
    }

    let flushed = encoder
        .flush::<FlushNoGap>(mp3.spare_capacity_mut())
        .map_err(|e| anyhow::anyhow!("Failed to flush MP3 encoder: {e:?}"))?;
    // SAFETY: same contract as encode; `flushed` additional bytes are initialized.
    unsafe {
        mp3.set_len(mp3.len() + flushed);
    }

    Ok(mp3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect()
    }

    #[test]
    fn wav_output_has_riff_header() {
        let data = encode_wav(&tone(1600), 16_000).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
        // 44-byte header + 2 bytes per sample
        assert_eq!(data.len(), 44 + 1600 * 2);
    }

    #[test]
    fn mp3_output_is_nonempty_and_smaller_than_wav() {
        let samples = tone(16_000); // one second
        let wav = encode_wav(&samples, 16_000).unwrap();
        let mp3 = encode_mp3(&samples, 16_000).unwrap();
        assert!(!mp3.is_empty());
        assert!(mp3.len() < wav.len());
    }

    #[test]
    fn format_metadata_is_consistent() {
        assert_eq!(UploadFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(UploadFormat::Mp3.mime_type(), "audio/mpeg");
        assert!(UploadFormat::Wav.file_name().ends_with(".wav"));
        assert!(UploadFormat::Mp3.file_name().ends_with(".mp3"));
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("wav".parse::<UploadFormat>().unwrap(), UploadFormat::Wav);
        assert_eq!("MP3".parse::<UploadFormat>().unwrap(), UploadFormat::Mp3);
        assert!("ogg".parse::<UploadFormat>().is_err());
    }

    #[test]
    fn default_is_mp3() {
        assert_eq!(UploadFormat::default(), UploadFormat::Mp3);
    }
}
