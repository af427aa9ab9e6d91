use base64::Engine;
use clap::{Args, Parser, Subcommand};
use nr_core::{ArticleStorage, Error, Result};
use nr_pipeline::{IngestEvent, IngestWorkflow, ListingWorkflow, API_KEY_HEADER};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod config;
mod logging;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Newsroom ingest and listing service", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    config: AppConfig,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve GET /newsroom, POST /health and POST /ingest
    Serve,
    /// Ingest one article
    Ingest(IngestArgs),
    /// Print the newsroom listing as JSON
    List,
    /// Print the content fingerprint of a title and body
    Fingerprint { title: String, body: String },
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// Invocation event document ({"headers": {...}, "body": ...}); `-` reads stdin
    #[arg(long, conflicts_with_all = ["title", "body", "source", "url", "image"])]
    event: Option<PathBuf>,
    #[arg(long, required_unless_present = "event")]
    title: Option<String>,
    #[arg(long, required_unless_present = "event")]
    body: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    url: Option<String>,
    /// JPEG file to attach
    #[arg(long)]
    image: Option<PathBuf>,
}

fn read_input(path: &PathBuf) -> Result<String> {
    let mut input = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| Error::External(e.into()))?;
    } else {
        input = std::fs::read_to_string(path).map_err(|e| Error::External(e.into()))?;
    }
    Ok(input)
}

fn build_event(args: IngestArgs, api_key: &str) -> Result<IngestEvent> {
    if let Some(path) = &args.event {
        return Ok(serde_json::from_str(&read_input(path)?)?);
    }

    let mut body = json!({
        "title": args.title,
        "body": args.body,
        "source": args.source,
        "url": args.url,
    });
    if let Some(path) = &args.image {
        let bytes = std::fs::read(path).map_err(|e| Error::External(e.into()))?;
        body["imageBase64"] = json!(base64::engine::general_purpose::STANDARD.encode(bytes));
    }

    Ok(IngestEvent::default()
        .with_header(API_KEY_HEADER, api_key)
        .with_json_body(body))
}

async fn ingest_workflow(config: &AppConfig, storage: Arc<dyn ArticleStorage>) -> Result<IngestWorkflow> {
    let images = nr_storage::create_image_storage(&config.image_config()).await?;
    let inference = nr_inference::create_model(&config.inference_config()).await?;
    Ok(IngestWorkflow::new(storage, images, inference, config.api_key.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();
    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::Fingerprint { title, body } => {
            println!("{}", nr_core::fingerprint(&title, &body));
        }
        Commands::Serve => {
            let storage = nr_storage::create_storage(&config.storage_config()).await?;
            let state = nr_web::AppState {
                ingest: ingest_workflow(&config, storage.clone()).await?,
                listing: ListingWorkflow::new(storage),
            };
            nr_web::serve(state, &config.bind).await?;
        }
        Commands::Ingest(args) => {
            let event = build_event(args, &config.api_key)?;
            let storage = nr_storage::create_storage(&config.storage_config()).await?;
            let workflow = ingest_workflow(&config, storage).await?;

            let response = workflow.handle(&event).await;
            info!("📨 Ingest finished with status {}", response.status);
            println!("{}", response.body);
            if response.status >= 400 {
                return Err(Error::External(anyhow::anyhow!(
                    "ingest failed with status {}",
                    response.status
                )));
            }
        }
        Commands::List => {
            let storage = nr_storage::create_storage(&config.storage_config()).await?;
            let listing = ListingWorkflow::new(storage).list().await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}
