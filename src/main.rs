use anyhow::Result;
use clap::Parser;
use scribe_server::nats::run_ingest_loop;
use scribe_server::providers::{SummarizationChain, TranscriptionChain};
use scribe_server::session::{EventSink, SessionRegistry, SessionStore};
use scribe_server::{create_router, AppState, Config, NatsClient};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "scribe-server",
    about = "Session ingestion and transcription server"
)]
struct Args {
    /// Configuration file name (TOML, extension omitted); missing file falls
    /// back to built-in defaults plus SCRIBE_* environment overrides
    #[arg(long, default_value = "config/scribe-server")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);
    info!("Segment storage: {}", cfg.storage.segments_dir.display());
    info!("Transcript storage: {}", cfg.storage.sessions_dir.display());

    let store = SessionStore::from_config(&cfg.storage);
    let transcription = Arc::new(TranscriptionChain::from_config(&cfg.providers));
    let summarization = Arc::new(SummarizationChain::from_config(&cfg.providers));

    let nats = Arc::new(NatsClient::connect(&cfg.nats.url).await?);
    let events: Arc<dyn EventSink> = nats.clone();

    let registry = SessionRegistry::new(store, transcription, summarization, events);

    let ingest_client = Arc::clone(&nats);
    let ingest_registry = registry.clone();
    tokio::spawn(async move {
        if let Err(e) = run_ingest_loop(&ingest_client, ingest_registry).await {
            error!("Ingest loop terminated: {:#}", e);
        }
    });

    let state = AppState::new(registry);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
