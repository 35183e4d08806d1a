//! `vozlog log` — the record → transcribe → append pipeline.
//!
//! One linear run: capture (or load) a clip, encode it, send it to the
//! transcription API, and append (timestamp, transcript) to the spreadsheet.
//! Any failure aborts the run with a reported error; nothing is retried and
//! no partial state survives.

use anyhow::{Context, Result};
use vozlog_core::{
    AudioRecorder, LogEntry, RecorderConfig, Recording, ServiceAccountKey, SheetsWriter,
    TranscriptionRequest, load_wav_file,
};
use vozlog_core::audio::encoder::encode_wav;

use super::interactive;
use crate::app::{self, PipelineConfig};
use crate::LogArgs;

pub async fn run(args: LogArgs) -> Result<()> {
    let settings = vozlog_core::Settings::load();
    let config = app::load_pipeline_config(&settings)?;

    // Resolve the spreadsheet side up front so a misconfigured sheet is
    // reported before the user records anything.
    let writer = if args.dry_run {
        None
    } else {
        Some(build_writer(&config)?)
    };

    let recording = match &args.file {
        Some(path) => {
            app::print_status(&format!("Loading {}", path.display()));
            load_wav_file(path)?
        }
        None => record_clip(config.input_device.as_deref())?,
    };

    if recording.is_empty() {
        anyhow::bail!("Recording is empty; nothing to transcribe");
    }
    app::print_status(&format!(
        "Captured {:.1}s of audio",
        recording.duration_secs()
    ));

    if let Some(path) = &args.save_audio {
        let wav = encode_wav(&recording.samples, recording.sample_rate)?;
        std::fs::write(path, wav)
            .with_context(|| format!("Failed to save audio to {}", path.display()))?;
        app::print_status(&format!("Saved clip to {}", path.display()));
    }

    // The explicit action trigger: nothing is uploaded until confirmed.
    if !args.yes
        && args.file.is_none()
        && !interactive::confirm("Transcribe and save?", true)?
    {
        println!("Discarded.");
        return Ok(());
    }

    let format = args.format.unwrap_or(config.upload_format);
    let audio = format.encode(&recording.samples, recording.sample_rate)?;

    app::print_status("Transcribing...");
    let request = TranscriptionRequest {
        audio,
        file_name: format.file_name().to_string(),
        mime_type: format.mime_type().to_string(),
        language: args.language.clone().or_else(|| config.language.clone()),
    };
    let transcript = config.transcriber.transcribe(request).await?;

    if transcript.trim().is_empty() {
        anyhow::bail!("Transcription came back empty; no row was written");
    }
    println!("\nTranscript: {transcript}\n");

    match writer {
        Some(writer) => {
            let entry = LogEntry::now(transcript, config.timezone);
            app::print_status("Appending to spreadsheet...");
            writer.append(&entry).await?;
            app::print_success(&format!("Logged at {}", entry.timestamp));
        }
        None => {
            app::print_status("Dry run: no row appended.");
        }
    }

    Ok(())
}

/// Build the spreadsheet writer, exiting with a setup hint when the sheet
/// side is not configured.
fn build_writer(config: &PipelineConfig) -> Result<SheetsWriter> {
    let spreadsheet_id = match &config.spreadsheet_id {
        Some(id) => id.clone(),
        None => {
            eprintln!("Error: No spreadsheet ID configured.");
            eprintln!(
                "\nRun 'vozlog setup', or set the VOZLOG_SPREADSHEET_ID environment variable."
            );
            std::process::exit(1);
        }
    };

    let key_path = match &config.service_account_key {
        Some(path) => path.clone(),
        None => {
            eprintln!("Error: No service-account key configured.");
            eprintln!(
                "\nRun 'vozlog setup', or set the VOZLOG_SERVICE_ACCOUNT environment variable \
                 to the key file path."
            );
            std::process::exit(1);
        }
    };

    let key = ServiceAccountKey::from_file(&key_path)?;
    SheetsWriter::new(key, spreadsheet_id)
}

/// Record from the microphone until the user presses Enter.
fn record_clip(device: Option<&str>) -> Result<Recording> {
    let mut recorder_config = RecorderConfig::new();
    if let Some(name) = device {
        recorder_config = recorder_config.with_device(name);
    }

    let mut recorder = AudioRecorder::new(recorder_config);
    recorder.start()?;

    print!("Recording... press Enter to stop ");
    app::wait_for_enter()?;
    println!();

    recorder.stop()
}
