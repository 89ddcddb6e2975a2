//! # ripple
//!
//! Assembles the HTTP server from the adapters enabled at compile time.

#[cfg(not(all(feature = "web-axum", feature = "auth-jwt")))]
compile_error!("ripple needs the `web-axum` and `auth-jwt` features");

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use api_adapters::{router, AppState, Metrics};
use auth_adapters::JwtAuth;
use configs::{LogFormat, Settings};
use domains::{FundraisingStore, GenerationParams, ReportRepository};
use inference_adapters::{HuggingFaceClient, HuggingFaceConfig};
use services::{OutreachService, ReportService};
use storage_adapters::InMemoryStore;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-postgres")]
use secrecy::ExposeSecret;
#[cfg(feature = "db-postgres")]
use storage_adapters::PostgresStore;

type Stores = (Arc<dyn FundraisingStore>, Arc<dyn ReportRepository>);

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn in_memory() -> Stores {
    let store = Arc::new(InMemoryStore::new());
    (store.clone(), store)
}

#[cfg(feature = "db-postgres")]
async fn open_stores(settings: &Settings) -> Result<Stores> {
    let Some(url) = settings.database.url.as_ref() else {
        warn!("DATABASE_URL not set, using the in-memory store");
        return Ok(in_memory());
    };
    let store = PostgresStore::connect(url.expose_secret(), settings.database.max_connections)
        .await
        .context("connecting to Postgres")?;
    store.migrate().await.context("running migrations")?;
    let store = Arc::new(store);
    Ok((store.clone(), store))
}

#[cfg(not(feature = "db-postgres"))]
async fn open_stores(_settings: &Settings) -> Result<Stores> {
    warn!("built without db-postgres, using the in-memory store");
    Ok(in_memory())
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    init_tracing(settings.log.format);

    let (store, reports) = open_stores(&settings).await?;

    let generation = &settings.generation;
    if generation.api_key.is_none() {
        warn!("HUGGINGFACE_API_KEY not set, AI endpoints will fail");
    }
    let generator = Arc::new(
        HuggingFaceClient::new(HuggingFaceConfig {
            api_key: generation.api_key.clone(),
            base_url: generation.base_url.clone(),
            model: generation.model.clone(),
            timeout: Duration::from_secs(generation.timeout_secs),
        })
        .context("building inference client")?,
    );
    let params = GenerationParams {
        max_new_tokens: generation.max_new_tokens,
        temperature: generation.temperature,
        return_full_text: false,
    };

    let state = AppState {
        reports: Arc::new(ReportService::new(
            store.clone(),
            reports,
            generator.clone(),
            params.clone(),
            settings.report.organization_id,
        )),
        outreach: Arc::new(OutreachService::new(store.clone(), generator, params)),
        store,
        sessions: Arc::new(JwtAuth::new(&settings.auth.jwt_secret)),
        metrics: Arc::new(Metrics::new()),
    };

    let addr = settings.server.addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(model = %generation.model, "listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
