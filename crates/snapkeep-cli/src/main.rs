//! Snapkeep CLI — save files, text, and images from the terminal.
//!
//! Set SNAPKEEP_ACCESS_TOKEN and SNAPKEEP_API_URL. Uses bearer auth.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use snapkeep_api_client::ApiClient;
use snapkeep_capture::sources::file::{FileCaptureSource, PickedFile};
use snapkeep_capture::sources::image_url::ImageUrlCaptureSource;
use snapkeep_capture::sources::text::TextCaptureSource;
use snapkeep_capture::{CaptureContext, HttpByteFetcher, TracingProgressSink, UploadOrchestrator};
use snapkeep_cli::{init_tracing, media_type_for_path};
use snapkeep_core::{ClientConfig, Platform};

#[derive(Parser)]
#[command(name = "snapkeep", about = "Snapkeep upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a local file (image or text)
    SaveFile {
        /// Path to the file to save
        file: PathBuf,
    },
    /// Save a piece of text
    SaveText {
        /// The text to save
        text: String,
    },
    /// Save an image by its URL
    SaveUrl {
        /// URL of the image to download and save
        url: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = ApiClient::from_env();
    let config = ClientConfig::from_env();
    let orchestrator =
        UploadOrchestrator::new(client, &config, Arc::new(TracingProgressSink::default()));

    let receipt = match cli.command {
        Commands::SaveFile { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            let context = CaptureContext::new(
                format!("file://{}", file.display()),
                file_name.clone(),
                Platform::App,
            );
            let picked = PickedFile {
                file_name,
                bytes: bytes.into(),
                declared_media_type: media_type_for_path(&file),
            };
            let request = FileCaptureSource::capture(picked, &context)?;
            orchestrator.upload(request).await?
        }
        Commands::SaveText { text } => {
            let context = CaptureContext::new("cli://save-text", "snapkeep", Platform::App);
            let request = TextCaptureSource::capture(&text, &context)?;
            orchestrator.upload(request).await?
        }
        Commands::SaveUrl { url } => {
            let context = CaptureContext::new(url.clone(), "snapkeep", Platform::App);
            let source = ImageUrlCaptureSource::new(Arc::new(HttpByteFetcher::new()));
            let request = source.capture(&url, &context).await?;
            orchestrator.upload(request).await?
        }
    };

    print_json(&receipt)?;
    Ok(())
}
