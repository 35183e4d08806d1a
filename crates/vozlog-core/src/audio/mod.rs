//! Audio capture and encoding.
//!
//! Capture happens at whatever rate/channel count the input device offers;
//! everything downstream (encoders, the transcription API) works on 16kHz
//! mono, so captured samples are resampled once at stop time.

pub mod devices;
pub mod encoder;
pub mod loader;
pub mod recorder;
pub mod resample;

pub use devices::{AudioDeviceInfo, list_input_devices};
pub use recorder::{AudioRecorder, RecorderConfig, Recording};
pub use resample::TARGET_SAMPLE_RATE;
