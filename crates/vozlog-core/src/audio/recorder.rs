//! Microphone capture with cpal.
//!
//! The cpal `Stream` is not `Send`, so the stream lives on a dedicated
//! capture thread for the duration of the recording. Samples are converted
//! to f32 in the audio callback and accumulated behind a mutex; `stop()`
//! joins the thread and hands back the clip resampled to 16kHz mono.

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::devices::find_input_device;
use super::resample::{TARGET_SAMPLE_RATE, to_target_rate};

/// Configuration for the audio recorder.
#[derive(Debug, Clone, Default)]
pub struct RecorderConfig {
    /// Device name to use (None = system default)
    pub device_name: Option<String>,
}

impl RecorderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }
}

/// One finished recording: 16kHz mono f32 samples.
#[derive(Debug, Clone)]
pub struct Recording {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Recording {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Captures audio from an input device between `start()` and `stop()`.
pub struct AudioRecorder {
    config: RecorderConfig,
    active: Arc<AtomicBool>,
    samples: Arc<Mutex<Vec<f32>>>,
    // (sample_rate, channels) of the device, filled in by the capture thread
    capture_format: Arc<Mutex<Option<(u32, u16)>>>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl AudioRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            active: Arc::new(AtomicBool::new(false)),
            samples: Arc::new(Mutex::new(Vec::new())),
            capture_format: Arc::new(Mutex::new(None)),
            worker: None,
        }
    }

    /// Begin capturing. Returns immediately; samples accumulate until `stop()`.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            anyhow::bail!("Recording already in progress");
        }

        self.samples.lock().unwrap().clear();
        self.active.store(true, Ordering::SeqCst);

        let device_name = self.config.device_name.clone();
        let active = Arc::clone(&self.active);
        let samples = Arc::clone(&self.samples);
        let capture_format = Arc::clone(&self.capture_format);

        self.worker = Some(std::thread::spawn(move || {
            capture_loop(device_name.as_deref(), active, samples, capture_format)
        }));

        Ok(())
    }

    /// Stop capturing and return the recorded clip as 16kHz mono samples.
    pub fn stop(&mut self) -> Result<Recording> {
        self.active.store(false, Ordering::SeqCst);

        let worker = self
            .worker
            .take()
            .context("Recorder was never started")?;
        worker
            .join()
            .map_err(|_| anyhow::anyhow!("Audio capture thread panicked"))??;

        let raw = std::mem::take(&mut *self.samples.lock().unwrap());
        let (rate, channels) = self
            .capture_format
            .lock()
            .unwrap()
            .take()
            .context("Audio capture never reported a stream format")?;

        crate::verbose!(
            "Captured {} samples at {} Hz / {} ch",
            raw.len(),
            rate,
            channels
        );

        let samples = to_target_rate(&raw, rate, channels)?;
        Ok(Recording {
            samples,
            sample_rate: TARGET_SAMPLE_RATE,
        })
    }
}

/// Body of the capture thread: open the device, run the stream until the
/// active flag drops, then let the stream close on drop.
fn capture_loop(
    device_name: Option<&str>,
    active: Arc<AtomicBool>,
    samples: Arc<Mutex<Vec<f32>>>,
    capture_format: Arc<Mutex<Option<(u32, u16)>>>,
) -> Result<()> {
    let device = find_input_device(device_name)?;
    let supported = device
        .default_input_config()
        .context("Failed to query default input configuration")?;

    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.config();
    *capture_format.lock().unwrap() = Some((config.sample_rate, config.channels));

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, samples)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, samples)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, samples)?,
        other => anyhow::bail!("Unsupported input sample format: {other:?}"),
    };

    stream.play().context("Failed to start audio stream")?;

    while active.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(50));
    }

    Ok(())
}

/// Build an input stream that converts incoming samples to f32 and appends
/// them to the shared buffer.
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let err_fn = |err| {
        // Stream errors (common with ALSA buffer timing) are non-fatal;
        // recording continues.
        crate::verbose!("Audio stream error (non-fatal): {err}");
    };

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mut buffer = samples.lock().unwrap();
            buffer.extend(data.iter().map(|&s| -> f32 { cpal::Sample::from_sample(s) }));
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
