//! `vozlog setup` — interactive configuration wizard.
//!
//! Walks through the transcription API key, the spreadsheet target, the
//! service-account key file, and the timestamp timezone, then writes the
//! settings file.

use anyhow::Result;
use std::path::PathBuf;
use vozlog_core::{ServiceAccountKey, Settings, UploadFormat, parse_timezone};

use super::interactive;

pub fn run() -> Result<()> {
    let mut settings = Settings::load();

    interactive::header("vozlog setup");

    // Step 1: transcription API key
    if settings.api_key().is_some()
        && interactive::confirm("An OpenAI API key is already configured. Keep it?", true)?
    {
        // keep the existing key
    } else {
        settings.transcription.api_key = Some(prompt_api_key()?);
    }

    // Step 2: spreadsheet target
    let spreadsheet_id = interactive::input(
        "Spreadsheet ID (from the sheet's URL)",
        settings.sheet.spreadsheet_id.as_deref(),
    )?;
    settings.sheet.spreadsheet_id = Some(spreadsheet_id);

    // Step 3: service-account key file, validated by parsing it
    settings.sheet.service_account_key = Some(prompt_service_account_key(
        settings.sheet.service_account_key.as_deref().map(|p| p.to_string_lossy().into_owned()),
    )?);

    // Step 4: timezone for the timestamp column
    loop {
        let tz = interactive::input("Timezone (IANA name)", Some(&settings.sheet.timezone))?;
        match parse_timezone(&tz) {
            Ok(_) => {
                settings.sheet.timezone = tz;
                break;
            }
            Err(e) => interactive::error(&e.to_string()),
        }
    }

    // Step 5: upload format
    let formats = [UploadFormat::Mp3, UploadFormat::Wav];
    let items = ["mp3 - compressed, smaller uploads", "wav - uncompressed"];
    let default = formats
        .iter()
        .position(|f| *f == settings.transcription.upload_format)
        .unwrap_or(0);
    let choice = interactive::select("Upload format?", &items, default)?;
    settings.transcription.upload_format = formats[choice];

    settings.save()?;

    println!();
    interactive::info(&format!("Settings written to {}", Settings::path().display()));
    println!("Run 'vozlog log' to record a voice note.");

    Ok(())
}

/// Prompt for an OpenAI API key, re-asking until the format looks right.
fn prompt_api_key() -> Result<String> {
    loop {
        let api_key = interactive::password("OpenAI API key")?;
        if api_key.starts_with("sk-") {
            return Ok(api_key);
        }
        interactive::error("Invalid OpenAI key format. Keys start with 'sk-'");
    }
}

/// Prompt for the service-account key path, re-asking until the file parses.
fn prompt_service_account_key(current: Option<String>) -> Result<PathBuf> {
    loop {
        let raw = interactive::input("Service-account key file (JSON)", current.as_deref())?;
        let path = PathBuf::from(raw);
        match ServiceAccountKey::from_file(&path) {
            Ok(key) => {
                interactive::info(&format!("Authenticating as {}", key.client_email));
                return Ok(path);
            }
            Err(e) => interactive::error(&e.to_string()),
        }
    }
}
