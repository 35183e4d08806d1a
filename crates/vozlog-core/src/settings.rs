//! Persistent settings: TOML file in the platform config directory with
//! environment-variable fallbacks for the secrets.
//!
//! The settings file never has to exist; everything can come from the
//! environment (or a `.env` file loaded by the CLI). Adapters never read
//! settings themselves, they receive explicit config built from these.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::audio::encoder::UploadFormat;
use crate::transcription::DEFAULT_MODEL;

/// Env var fallback for the transcription API key.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
/// Env var fallback for the spreadsheet ID.
pub const SPREADSHEET_ID_ENV_VAR: &str = "VOZLOG_SPREADSHEET_ID";
/// Env var fallback for the service-account key file path.
pub const SERVICE_ACCOUNT_ENV_VAR: &str = "VOZLOG_SERVICE_ACCOUNT";

/// Default timezone for log-entry timestamps.
pub const DEFAULT_TIMEZONE: &str = "America/Buenos_Aires";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub transcription: TranscriptionSettings,
    #[serde(default)]
    pub sheet: SheetSettings,
    #[serde(default)]
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// OpenAI API key (falls back to OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Transcription model
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional language hint passed to the API
    #[serde(default)]
    pub language: Option<String>,

    /// Wire format for uploaded audio (wav or mp3)
    #[serde(default)]
    pub upload_format: UploadFormat,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            language: None,
            upload_format: UploadFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSettings {
    /// Spreadsheet to append to (falls back to VOZLOG_SPREADSHEET_ID)
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Path to the service-account JSON key file
    /// (falls back to VOZLOG_SERVICE_ACCOUNT)
    #[serde(default)]
    pub service_account_key: Option<PathBuf>,

    /// IANA timezone for log-entry timestamps
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            service_account_key: None,
            timezone: default_timezone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Input device name (None = system default)
    #[serde(default)]
    pub input_device: Option<String>,
}

impl Settings {
    /// Path to the settings file: `<config dir>/vozlog/settings.toml`.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vozlog")
            .join("settings.toml")
    }

    /// Load settings from disk, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        let path = Self::path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                crate::verbose!("Ignoring malformed settings file {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Write settings to disk, creating the config directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Transcription API key from settings or the environment.
    pub fn api_key(&self) -> Option<String> {
        self.transcription
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
    }

    /// Spreadsheet ID from settings or the environment.
    pub fn spreadsheet_id(&self) -> Option<String> {
        self.sheet
            .spreadsheet_id
            .clone()
            .or_else(|| std::env::var(SPREADSHEET_ID_ENV_VAR).ok())
    }

    /// Service-account key path from settings or the environment.
    pub fn service_account_key(&self) -> Option<PathBuf> {
        self.sheet
            .service_account_key
            .clone()
            .or_else(|| std::env::var(SERVICE_ACCOUNT_ENV_VAR).ok().map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.transcription.model, "whisper-1");
        assert_eq!(settings.transcription.upload_format, UploadFormat::Mp3);
        assert_eq!(settings.sheet.timezone, "America/Buenos_Aires");
        assert!(settings.audio.input_device.is_none());
    }

    #[test]
    fn toml_round_trip_preserves_fields() {
        let mut settings = Settings::default();
        settings.transcription.api_key = Some("sk-test".to_string());
        settings.transcription.language = Some("es".to_string());
        settings.transcription.upload_format = UploadFormat::Wav;
        settings.sheet.spreadsheet_id = Some("1q1z7cl5vg".to_string());
        settings.sheet.service_account_key = Some(PathBuf::from("/keys/sa.json"));
        settings.audio.input_device = Some("USB Microphone".to_string());

        let toml_text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_text).unwrap();

        assert_eq!(parsed.transcription.api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.transcription.language.as_deref(), Some("es"));
        assert_eq!(parsed.transcription.upload_format, UploadFormat::Wav);
        assert_eq!(parsed.sheet.spreadsheet_id.as_deref(), Some("1q1z7cl5vg"));
        assert_eq!(
            parsed.sheet.service_account_key,
            Some(PathBuf::from("/keys/sa.json"))
        );
        assert_eq!(parsed.audio.input_device.as_deref(), Some("USB Microphone"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Settings = toml::from_str(
            r#"
            [sheet]
            spreadsheet_id = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.sheet.spreadsheet_id.as_deref(), Some("abc"));
        assert_eq!(parsed.sheet.timezone, DEFAULT_TIMEZONE);
        assert_eq!(parsed.transcription.model, "whisper-1");
    }
}
