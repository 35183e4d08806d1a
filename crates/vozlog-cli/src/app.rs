use anyhow::Result;
use console::style;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::Write;
use std::path::PathBuf;
use vozlog_core::{Settings, Transcriber, UploadFormat, parse_timezone};

/// Everything one pipeline run needs, assembled up front so the adapters
/// never touch ambient state.
pub struct PipelineConfig {
    pub transcriber: Transcriber,
    pub upload_format: UploadFormat,
    pub language: Option<String>,
    pub timezone: chrono_tz::Tz,
    pub spreadsheet_id: Option<String>,
    pub service_account_key: Option<PathBuf>,
    pub input_device: Option<String>,
}

/// Build the pipeline config from settings and the environment. Exits with a
/// setup hint when the API key is missing; the sheet credentials are only
/// checked later (a dry run never needs them).
pub fn load_pipeline_config(settings: &Settings) -> Result<PipelineConfig> {
    let api_key = match settings.api_key() {
        Some(key) => key,
        None => {
            eprintln!("Error: No OpenAI API key configured.");
            eprintln!("\nRun 'vozlog setup', or set the OPENAI_API_KEY environment variable.");
            std::process::exit(1);
        }
    };

    let transcriber = Transcriber::new(api_key, settings.transcription.model.clone())?;
    let timezone = parse_timezone(&settings.sheet.timezone)?;

    Ok(PipelineConfig {
        transcriber,
        upload_format: settings.transcription.upload_format,
        language: settings.transcription.language.clone(),
        timezone,
        spreadsheet_id: settings.spreadsheet_id(),
        service_account_key: settings.service_account_key(),
        input_device: settings.audio.input_device.clone(),
    })
}

/// Block until the user presses Enter (raw mode, no echo).
pub fn wait_for_enter() -> Result<()> {
    std::io::stdout().flush()?;

    enable_raw_mode()?;
    loop {
        if let Event::Key(key_event) = event::read()? {
            if key_event.code == KeyCode::Enter {
                break;
            }
        }
    }
    disable_raw_mode()?;

    Ok(())
}

pub fn print_status(text: &str) {
    println!("{}", style(text).dim());
}

pub fn print_success(text: &str) {
    println!("{} {}", style("✓").green().bold(), text);
}

pub fn print_error(text: &str) {
    eprintln!("{} {}", style("✗").red().bold(), text);
}
