use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocrlink::api::{create_router, AppState};
use ocrlink::config::Config;
use ocrlink::fetch::ImageFetcher;
use ocrlink::ocr::{OcrProvider, TextRecognizer};
use ocrlink::services::RecognitionService;
use ocrlink::storage::ScratchStore;

#[derive(Parser)]
#[command(name = "ocrlink")]
#[command(about = "Extract text from images referenced by URL")]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Scratch directory for downloaded images (overrides UPLOAD_DIR)
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocrlink=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(upload_dir) = args.upload_dir {
        config.storage.upload_dir = upload_dir;
    }

    let store = ScratchStore::init(&config.storage.upload_dir).await?;

    tracing::info!("Initializing OCR engine: {}...", config.ocr.languages);
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - every recognition request will fail");
    }

    let fetcher = ImageFetcher::new(&config.fetch)?;
    let recognizer: Arc<dyn TextRecognizer> = Arc::new(ocr.clone());
    let recognition = RecognitionService::new(fetcher, store, recognizer)
        .with_recognition_timeout(Duration::from_secs(config.ocr.timeout_secs));

    let state = AppState::new(config.clone(), recognition);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        "Server is running on http://{}:{}",
        config.display_host(),
        config.server.port
    );
    tracing::info!("  API docs:     http://{}/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ocr.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
