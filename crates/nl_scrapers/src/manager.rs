use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use nl_core::{
    Config, ContentChunk, DocumentLoader, Error, InferenceModel, NewsletterReport,
    NewsletterRequest, Result, SearchProvider, SearchRequest,
};
use nl_inference::{create_model, ArticleSelector, ModelKind, NewsletterComposer, Summarizer};
use nl_storage::{MemoryConfig, SimilarityIndex};
use uuid::Uuid;

use crate::chunker::TextChunker;
use crate::loader::UrlLoader;
use crate::logging::Logger;
use crate::search::SerperClient;

/// Chunks shown back to the reader as the run's source material.
pub const DEFAULT_CONTEXT_K: usize = 4;

/// Drives one newsletter run end to end: search, pick articles, read them,
/// index the text, then summarize and write.
///
/// Every step runs strictly after the previous one. Dropping the future
/// returned by [`NewsletterManager::run`] abandons the run.
pub struct NewsletterManager {
    search: Arc<dyn SearchProvider>,
    loader: Arc<dyn DocumentLoader>,
    inference: Arc<dyn InferenceModel>,
    chunker: TextChunker,
    summary_k: usize,
    context_k: usize,
    memory_config: MemoryConfig,
}

impl fmt::Debug for NewsletterManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsletterManager")
            .field("search", &self.search.name())
            .field("inference", &self.inference.name())
            .field("chunker", &self.chunker)
            .field("summary_k", &self.summary_k)
            .field("context_k", &self.context_k)
            .finish()
    }
}

impl NewsletterManager {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        loader: Arc<dyn DocumentLoader>,
        inference: Arc<dyn InferenceModel>,
    ) -> Self {
        Self {
            search,
            loader,
            inference,
            chunker: TextChunker::default(),
            summary_k: nl_inference::summarizer::DEFAULT_TOP_K,
            context_k: DEFAULT_CONTEXT_K,
            memory_config: MemoryConfig::default(),
        }
    }

    /// Wires the real Serper search and HTTP loader to the chosen model.
    /// The OpenAI key is only required when the OpenAI model is chosen.
    pub fn from_config(kind: ModelKind, config: &Config) -> Result<Self> {
        config.validate_with(kind == ModelKind::Openai)?;
        let search = Arc::new(SerperClient::new(config)?);
        let loader = Arc::new(UrlLoader::new(config)?);
        let inference = create_model(kind, config)?;
        Ok(Self::new(search, loader, inference))
    }

    pub fn with_memory_config(mut self, config: MemoryConfig) -> Self {
        self.memory_config = config;
        self
    }

    pub async fn run(&self, request: &NewsletterRequest) -> Result<NewsletterReport> {
        request.validate()?;
        let run_id = Uuid::new_v4();
        let logger = Logger::new().with_prefix(format!("[{}]", &run_id.to_string()[..8]));
        let topic = request.topic.trim();

        logger.info(&format!(
            "🔎 Searching {} results for '{}' (last {})",
            request.genre, topic, request.window
        ));
        let search_request = SearchRequest::new(topic, request.window, request.genre);
        let search_results = self.search.search(&search_request).await?;
        logger.info(&format!(
            "✨ {} returned {} results",
            self.search.name(),
            search_results.len()
        ));

        let urls = ArticleSelector::new(self.inference.clone())
            .select(&search_results, topic)
            .await?;
        logger.info(&format!("📰 Selected {} articles", urls.len()));

        let chunks = self.load_chunks(&urls, &logger).await?;

        logger.info(&format!("🔢 Embedding {} chunks", chunks.len()));
        let index =
            SimilarityIndex::build(&chunks, self.inference.clone(), self.memory_config)
                .await?;

        logger.info("🤖 Summarizing selected articles");
        let digest = Summarizer::new(self.inference.clone())
            .with_top_k(self.summary_k)
            .summarize(&index, topic)
            .await?;

        logger.info(&format!("✍️ Writing newsletter ({})", request.tone.label()));
        let newsletter = NewsletterComposer::new(self.inference.clone())
            .compose(&digest, topic, request.tone.description())
            .await?;

        let context = index
            .search(topic, self.context_k)
            .await?
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        logger.info("✅ Newsletter ready");
        Ok(NewsletterReport {
            run_id,
            topic: topic.to_string(),
            generated_at: Utc::now(),
            search_results,
            urls,
            context,
            digest,
            newsletter,
        })
    }

    /// Loads every URL in order. A URL that fails is logged and skipped; the
    /// run only fails when none of them yields any text.
    async fn load_chunks(&self, urls: &[String], logger: &Logger) -> Result<Vec<ContentChunk>> {
        let mut chunks = Vec::new();
        for url in urls {
            match self.loader.load(url).await {
                Ok(document) => {
                    let doc_chunks = self.chunker.chunk_document(&document);
                    logger.debug(&format!(
                        "{} ({}) -> {} chunks",
                        url,
                        document.title.as_deref().unwrap_or("untitled"),
                        doc_chunks.len()
                    ));
                    if doc_chunks.is_empty() {
                        logger.warn(&format!("⚠️ No readable text at {}", url));
                    }
                    chunks.extend(doc_chunks);
                }
                Err(e) => logger.warn(&format!("⚠️ Skipping {}: {}", url, e)),
            }
        }
        if chunks.is_empty() {
            logger.error(&format!("❌ None of the {} selected URLs had readable text", urls.len()));
            return Err(Error::NoContent(urls.len()));
        }
        Ok(chunks)
    }
}
