mod config;
mod embedding;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod screening;
mod sources;
mod state;

#[cfg(test)]
mod testing;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::HttpEmbedder;
use crate::jobs::store::PgJobStore;
use crate::llm_client::LlmClient;
use crate::pipeline::guard::RunGuard;
use crate::pipeline::orchestrator::{Pipeline, PipelineSettings};
use crate::routes::build_router;
use crate::screening::gate::QualitativeGate;
use crate::screening::similarity::SimilarityScorer;
use crate::sources::jobspy::JobSpyClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job screener v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(PgJobStore::connect(&config.database_url).await?);

    let llm = Arc::new(LlmClient::new(config.gemini_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let embedder = Arc::new(HttpEmbedder::new(&config.embedding_url)?);
    info!(
        "Embedding client initialized (model: {}, url: {})",
        embedding::EMBEDDING_MODEL,
        config.embedding_url
    );

    let source = Arc::new(JobSpyClient::new(
        &config.jobspy_url,
        config.job_sites.clone(),
        Duration::from_secs(config.scrape_timeout_secs),
    )?);
    info!("Job source: {} ({})", config.jobspy_url, config.job_sites.join(", "));

    let gate = QualitativeGate::new(llm);
    let settings = PipelineSettings {
        similarity_threshold: config.similarity_threshold,
        rating_threshold: config.gemini_rating_threshold,
        results_wanted: config.results_wanted,
    };
    let pipeline = Arc::new(Pipeline::new(
        store.clone(),
        source,
        SimilarityScorer::new(embedder),
        gate.clone(),
        settings,
    ));

    if std::env::args().nth(1).as_deref() == Some("run-once") {
        let summary = pipeline.run().await;
        info!("Run complete: {summary:?}");
        return Ok(());
    }

    let state = AppState {
        pipeline,
        run_guard: RunGuard::new(),
        store,
        gate,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Allows the configured frontend origins. Unparseable entries are dropped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
