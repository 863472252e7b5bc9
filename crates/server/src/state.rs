//! Application state (composition root)
//!
//! Services are built once, in dependency order: providers from their
//! factories, the vector store over the cached embedder, then the domain
//! services. Everything is an `Arc` singleton; handlers clone handles,
//! never rebuild services.

use std::sync::Arc;

use vox_cache::CacheFactory;
use vox_config::Settings;
use vox_core::{CacheStore, EmbeddingProvider, LanguageModel, Result};
use vox_embeddings::EmbeddingFactory;
use vox_llm::LlmFactory;
use vox_persistence::{InMemorySessionStore, SessionRepository, SqliteSessionStore};
use vox_rag::{CachedEmbedder, KnowledgeBase};
use vox_tools::WeatherClient;
use vox_vector::VectorStore;

use crate::chat::ChatService;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub llm: Arc<dyn LanguageModel>,
    pub cache: Arc<dyn CacheStore>,
    pub vector_store: Arc<VectorStore>,
    pub knowledge_base: Arc<KnowledgeBase>,
    pub sessions: Arc<dyn SessionRepository>,
    pub weather: Arc<WeatherClient>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    /// Build the full service graph from settings.
    pub fn build(settings: Settings) -> Result<Self> {
        let raw_embedder = EmbeddingFactory::create(&settings.embedding)?;
        let llm = LlmFactory::create(&settings.llm)?;
        let cache = CacheFactory::create(&settings.cache)?;

        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(CachedEmbedder::new(raw_embedder, cache.clone()));

        let vector_store = Arc::new(VectorStore::new(
            &settings.vector_store,
            embedder.clone(),
        )?);

        let knowledge_base = Arc::new(KnowledgeBase::new(
            vector_store.clone(),
            embedder.clone(),
            settings.vector_store.collection.clone(),
        ));

        let sessions: Arc<dyn SessionRepository> = if settings.persistence.enabled {
            Arc::new(SqliteSessionStore::open(&settings.persistence.db_path)?)
        } else {
            tracing::info!("persistence disabled, using in-memory session store");
            Arc::new(InMemorySessionStore::new())
        };

        let weather = Arc::new(WeatherClient::new()?);

        let chat = Arc::new(ChatService::new(
            llm.clone(),
            knowledge_base.clone(),
            sessions.clone(),
            settings.chat.clone(),
        ));

        Ok(Self {
            settings: Arc::new(settings),
            embedder,
            llm,
            cache,
            vector_store,
            knowledge_base,
            sessions,
            weather,
            chat,
        })
    }
}
