use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, ConfigService, LlmSettings, Settings};
use crate::llm::{CompletionClient, EmbeddingClient, OpenAiProvider};
use crate::rag::{
    ContextAssembler, Ingestor, JsonFileStore, PipelineOptions, RagChatService, VectorStore,
};

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// Holds the resolved settings plus the two entry points into the RAG core:
/// the per-query chat service and the corpus ingestor. Both share one
/// vector store.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub chat: Arc<RagChatService>,
    pub ingestor: Arc<Ingestor>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading the merged configuration under `paths`
    /// 2. Building the OpenAI-compatible provider client
    /// 3. Wiring the JSON vector store into the chat service and the ingestor
    ///
    /// Install logging before calling this so startup warnings are recorded.
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let settings = ConfigService::new(paths)
            .load_settings()
            .map_err(InitializationError::Config)?;

        warn_if_missing_api_key(&settings.llm);

        let provider = Arc::new(
            OpenAiProvider::new(&settings.llm).map_err(InitializationError::Llm)?,
        );
        let store = Arc::new(JsonFileStore::new(settings.rag.vector_store_path.clone()));

        Ok(Arc::new(Self::from_parts(
            settings,
            store,
            provider.clone(),
            provider,
        )))
    }

    /// Assembles state around explicit backends.
    pub fn from_parts(
        settings: Settings,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingClient>,
        completer: Arc<dyn CompletionClient>,
    ) -> Self {
        let chat = RagChatService::new(
            store.clone(),
            embedder.clone(),
            completer,
            ContextAssembler::new(settings.chat.system_prompt.clone()),
            PipelineOptions::from_settings(&settings),
        );
        let ingestor = Ingestor::new(
            embedder,
            store,
            settings.llm.embedding_model.clone(),
            settings.rag.ingest_concurrency,
        );

        Self {
            settings,
            chat: Arc::new(chat),
            ingestor: Arc::new(ingestor),
            started_at: Utc::now(),
        }
    }
}

fn warn_if_missing_api_key(llm: &LlmSettings) -> bool {
    if llm.api_key.is_some() {
        return false;
    }
    tracing::warn!(
        "No API key configured for {}; provider calls will be unauthenticated",
        llm.base_url
    );
    true
}
