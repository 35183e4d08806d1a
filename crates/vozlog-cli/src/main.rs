mod app;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vozlog",
    version,
    about = "Record a voice note, transcribe it, and log it to a spreadsheet"
)]
struct Cli {
    /// Print verbose diagnostics to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Record a voice note and append (timestamp, transcript) to the sheet
    Log(LogArgs),
    /// Interactive configuration wizard
    Setup,
    /// List audio input devices
    Devices,
}

#[derive(clap::Args, Default)]
struct LogArgs {
    /// Transcribe an existing WAV file instead of recording
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Save the recorded clip as a WAV file for review
    #[arg(long, value_name = "PATH")]
    save_audio: Option<PathBuf>,

    /// Language hint for the transcription API (e.g. "es")
    #[arg(long)]
    language: Option<String>,

    /// Override the configured upload format (wav or mp3)
    #[arg(long)]
    format: Option<vozlog_core::UploadFormat>,

    /// Transcribe only; do not append a row to the spreadsheet
    #[arg(long)]
    dry_run: bool,

    /// Skip the confirmation prompt before transcribing
    #[arg(short = 'y', long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    // Secrets may come from a .env file instead of the settings file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    vozlog_core::set_verbose(cli.verbose);

    let result: Result<()> = match cli.command {
        None => commands::log::run(LogArgs::default()).await,
        Some(Command::Log(args)) => commands::log::run(args).await,
        Some(Command::Setup) => commands::setup::run(),
        Some(Command::Devices) => commands::devices::run(),
    };

    if let Err(e) = result {
        app::print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
