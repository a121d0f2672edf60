mod assessment;
mod config;
mod db;
mod errors;
mod learning;
mod llm_client;
mod models;
mod profile;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::generator::{
    FallbackQuestionGenerator, LlmQuestionGenerator, MockQuestionGenerator, QuestionGenerator,
};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::profile::memory::InMemoryProfileStore;
use crate::profile::store::{PgProfileStore, ProfileStore};
use crate::routes::build_router;
use crate::skills::benchmark::BenchmarkCatalog;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Maverick API v{}", env!("CARGO_PKG_VERSION"));

    // Role benchmarks: built-in unless a JSON file is configured
    let catalog = match &config.role_benchmarks_path {
        Some(path) => BenchmarkCatalog::load(path)
            .with_context(|| format!("Failed to load role benchmarks from {}", path.display()))?,
        None => BenchmarkCatalog::default(),
    };
    info!("Loaded {} role benchmarks", catalog.roles().len());

    // Profile store: PostgreSQL when configured, otherwise process memory
    let store: Arc<dyn ProfileStore> = match &config.database_url {
        Some(url) => Arc::new(PgProfileStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; profiles are kept in memory and lost on restart");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    // LLM client and question generator (mock only without an API key)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; using mock questions, resume extraction disabled");
            None
        }
    };
    let question_generator: Arc<dyn QuestionGenerator> = match &llm {
        Some(client) => Arc::new(FallbackQuestionGenerator::new(Box::new(
            LlmQuestionGenerator(client.clone()),
        ))),
        None => Arc::new(MockQuestionGenerator),
    };

    let state = AppState {
        store,
        question_generator,
        catalog: Arc::new(catalog),
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
