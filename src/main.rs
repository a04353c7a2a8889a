//! Remofy - generative AI background remover and store page generator
//!
//! Two small apps over Gemini: `remove-background` strips the background
//! from a photo, `store-page` looks up a business through maps grounding and
//! renders a landing page for it.

mod gateway;
mod input;
mod llm;
mod page;
mod runtime;
mod state_machine;

use clap::{Parser, Subcommand};
use gateway::background::{save_data_uri, DEFAULT_DOWNLOAD_NAME, DEFAULT_IMAGE_MODEL};
use gateway::store::{DEFAULT_MAPS_URL, DEFAULT_TEXT_MODEL};
use gateway::{BackgroundRemover, StoreDataFetcher};
use llm::{GeminiConfig, GeminiService, GenerativeService, LoggingService, DEFAULT_BASE_URL};
use runtime::{RemoverSession, StorePageSession};
use state_machine::{RemoverState, StorePageState};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "remofy")]
#[command(about = "Background remover and store page generator backed by Gemini")]
struct Cli {
    /// Gemini API key
    #[arg(long, env = "API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove the background from an image
    RemoveBackground {
        image: PathBuf,

        #[arg(long, default_value = DEFAULT_IMAGE_MODEL)]
        image_model: String,

        /// Where to save the result
        #[arg(long, default_value = DEFAULT_DOWNLOAD_NAME)]
        out: PathBuf,
    },
    /// Fetch a business from Google Maps and render its landing page
    StorePage {
        #[arg(long, default_value = DEFAULT_TEXT_MODEL)]
        text_model: String,

        #[arg(long, default_value = DEFAULT_MAPS_URL)]
        maps_url: String,

        /// Write the page here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the structured store data as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remofy=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    if cli.api_key.is_empty() {
        tracing::warn!("No API key configured. Set API_KEY; requests will be rejected.");
    }

    let config = GeminiConfig::new(cli.api_key, cli.base_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    match cli.command {
        Commands::RemoveBackground {
            image,
            image_model,
            out,
        } => remove_background(&config, image, &image_model, out).await,
        Commands::StorePage {
            text_model,
            maps_url,
            out,
            json,
        } => store_page(&config, &text_model, maps_url, out, json).await,
    }
}

fn service(
    config: &GeminiConfig,
    model: &str,
) -> Result<Arc<dyn GenerativeService>, llm::LlmError> {
    let gemini: Arc<dyn GenerativeService> = Arc::new(GeminiService::new(config, model)?);
    Ok(Arc::new(LoggingService::new(gemini)))
}

async fn remove_background(
    config: &GeminiConfig,
    image: PathBuf,
    model: &str,
    out: PathBuf,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let session = RemoverSession::new(BackgroundRemover::new(service(config, model)?));

    let selected = input::load_image(Some(&image)).await?;
    if let Some(selected) = &selected {
        tracing::info!(
            preview = %selected.preview.display(),
            mime = %selected.mime_type,
            "Image selected"
        );
    }
    session.select_image(selected)?;
    if !session.state().can_generate() {
        return Err(format!("no image selected from {}", image.display()).into());
    }
    session.generate().await?;

    match session.state() {
        RemoverState::Success { result, .. } => {
            save_data_uri(&result, &out).await?;
            println!("{}", out.display());
            Ok(ExitCode::SUCCESS)
        }
        RemoverState::Error { message, .. } => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        other => Err(format!("unexpected state after removal: {}", other.label()).into()),
    }
}

async fn store_page(
    config: &GeminiConfig,
    model: &str,
    maps_url: String,
    out: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let session = StorePageSession::new(StoreDataFetcher::new(service(config, model)?, maps_url));
    session.mount().await?;

    match session.state() {
        StorePageState::Success { store } => {
            let rendered = if json {
                serde_json::to_string_pretty(&store)?
            } else {
                page::render_store_page(&store)
            };
            match out {
                Some(path) => {
                    tokio::fs::write(&path, rendered).await?;
                    tracing::info!(path = %path.display(), "Store page written");
                }
                None => println!("{rendered}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        StorePageState::Error { message } => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        other => Err(format!("unexpected state after fetch: {other:?}").into()),
    }
}
