use std::sync::Arc;

use crate::assessment::generator::QuestionGenerator;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profile::store::ProfileStore;
use crate::skills::benchmark::BenchmarkCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable profile store. Default: PgProfileStore; InMemoryProfileStore without DATABASE_URL.
    pub store: Arc<dyn ProfileStore>,
    /// Pluggable quiz source. Default: LLM with mock fallback; mock only without an API key.
    pub question_generator: Arc<dyn QuestionGenerator>,
    pub catalog: Arc<BenchmarkCatalog>,
    /// Present only when ANTHROPIC_API_KEY is set. Used for resume skill extraction.
    pub llm: Option<LlmClient>,
    pub config: Config,
}
