//! Resampling captured audio to the 16kHz mono the Whisper API expects.

use anyhow::{Context, Result};
use rubato::{FftFixedIn, Resampler};

/// Sample rate required by the transcription service.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Downmix interleaved multichannel audio to mono and resample to 16kHz.
pub fn to_target_rate(samples: &[f32], source_rate: u32, channels: u16) -> Result<Vec<f32>> {
    let mono = if channels > 1 {
        downmix_to_mono(samples, channels)
    } else {
        samples.to_vec()
    };

    if source_rate == TARGET_SAMPLE_RATE || mono.is_empty() {
        return Ok(mono);
    }

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        TARGET_SAMPLE_RATE as usize,
        1024, // chunk size
        2,    // sub-chunks
        1,    // mono
    )
    .context("Failed to create resampler")?;

    let chunk_size = resampler.input_frames_max();
    let mut output = Vec::with_capacity(
        (mono.len() as u64 * TARGET_SAMPLE_RATE as u64 / source_rate as u64) as usize,
    );

    for chunk in mono.chunks(chunk_size) {
        // The final chunk is zero-padded up to the fixed input size; the
        // padding becomes a few milliseconds of trailing silence.
        let mut input = chunk.to_vec();
        input.resize(chunk_size, 0.0);

        let frames = resampler
            .process(&[input], None)
            .context("Resampling failed")?;
        output.extend_from_slice(&frames[0]);
    }

    Ok(output)
}

/// Average interleaved frames down to a single channel.
fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
