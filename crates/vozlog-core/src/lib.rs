pub mod audio;
pub mod entry;
pub mod settings;
pub mod sheets;
pub mod transcription;
pub mod verbose;

#[cfg(test)]
pub(crate) mod testutil;

pub use audio::encoder::UploadFormat;
pub use audio::loader::load_wav_file;
pub use audio::{AudioRecorder, RecorderConfig, Recording, list_input_devices};
pub use entry::{LogEntry, parse_timezone};
pub use settings::Settings;
pub use sheets::{ServiceAccountKey, SheetsWriter};
pub use transcription::{
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, MAX_UPLOAD_BYTES, TranscribeError, Transcriber,
    TranscriptionRequest,
};
pub use verbose::set_verbose;
