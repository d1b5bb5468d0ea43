use anyhow::Context;
use api::AppState;
use backend::BackendClient;
use clap::Parser;
use config::ServerConfig;
use ingest::{IngestSettings, Ingestor};
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tactcore::telemetry::{CompositeObserver, LogObserver, MetricsRecorder};
use tactcore::{DetectionStore, SharedDetectionStore};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod api;
mod backend;
mod config;
mod ingest;

#[derive(Parser)]
#[command(author, version, about = "Detection record store and ingestion API")]
struct Args {
    /// Load a server config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Base URL of the object detection backend
    #[arg(long, env = "FASTAPI_URL")]
    backend_url: Option<String>,
    #[arg(long)]
    max_detections: Option<usize>,
    #[arg(long, env = "MAX_FILE_SIZE")]
    max_upload_bytes: Option<usize>,
    /// Fail uploads instead of serving generated detections when the backend is down
    #[arg(long, default_value_t = false)]
    no_mock_fallback: bool,
    #[arg(long)]
    mock_seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(url) = self.backend_url {
            config.backend_url = url;
        }
        if let Some(max) = self.max_detections {
            config.store.max_detections = max;
        }
        if let Some(max) = self.max_upload_bytes {
            config.max_upload_bytes = max;
        }
        if self.no_mock_fallback {
            config.mock_fallback = false;
        }
        if let Some(seed) = self.mock_seed {
            config.mock_seed = seed;
        }
        Ok(config)
    }
}

fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let metrics = Arc::new(MetricsRecorder::new());
    let observer = CompositeObserver::new()
        .with(Arc::new(LogObserver))
        .with(metrics.clone());
    let store = DetectionStore::new(config.store.clone())
        .context("building detection store")?
        .with_observer(Arc::new(observer));
    let store = Arc::new(SharedDetectionStore::new(store));

    let backend = BackendClient::new(&config.backend_url, config.backend_timeout())
        .context("building detection backend client")?;
    let ingestor = Arc::new(Ingestor::new(
        store.clone(),
        backend,
        IngestSettings::from(config),
    ));

    Ok(AppState {
        store,
        ingestor,
        metrics,
        max_upload_bytes: config.max_upload_bytes,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Args::parse().into_config()?;
    let state = build_state(&config)?;

    info!(
        "store capacity {}, backend {}, mock fallback {}",
        config.store.max_detections, config.backend_url, config.mock_fallback
    );

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating server runtime")?;
    runtime.block_on(async {
        let shutdown = async {
            if let Err(err) = signal::ctrl_c().await {
                log::error!("awaiting Ctrl+C failed: {}", err);
            }
            info!("shutting down");
        };
        let (addr, server) = warp::serve(api::routes(state))
            .try_bind_with_graceful_shutdown(config.bind, shutdown)
            .with_context(|| format!("binding {}", config.bind))?;
        info!("listening on http://{}", addr);
        server.await;
        Ok::<(), anyhow::Error>(())
    })
}
