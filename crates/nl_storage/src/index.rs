use std::fmt;
use std::sync::Arc;

use nl_core::{ChunkStorage, ContentChunk, InferenceModel, Result, ScoredChunk};
use tracing::debug;

use crate::backends::{MemoryConfig, MemoryStorage};

/// Per-run nearest-neighbour index over chunk embeddings.
///
/// Built from scratch for every newsletter and dropped with it; nothing is
/// written anywhere else.
pub struct SimilarityIndex {
    storage: Arc<dyn ChunkStorage>,
    model: Arc<dyn InferenceModel>,
}

impl fmt::Debug for SimilarityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityIndex")
            .field("storage", &"<dyn ChunkStorage>")
            .field("model", &self.model.name())
            .finish()
    }
}

impl SimilarityIndex {
    pub fn new(storage: Arc<dyn ChunkStorage>, model: Arc<dyn InferenceModel>) -> Self {
        Self { storage, model }
    }

    /// Embeds every chunk, one model call each, in order.
    pub async fn build(
        chunks: &[ContentChunk],
        model: Arc<dyn InferenceModel>,
        config: MemoryConfig,
    ) -> Result<Self> {
        let index = Self::new(Arc::new(MemoryStorage::new(config)), model);
        for chunk in chunks {
            index.add(chunk).await?;
        }
        Ok(index)
    }

    pub async fn add(&self, chunk: &ContentChunk) -> Result<()> {
        let embedding = self.model.generate_embeddings(&chunk.text).await?;
        debug!(
            source = %chunk.source_url,
            index = chunk.index,
            dimensions = embedding.len(),
            "embedded chunk"
        );
        self.storage.store_chunk(chunk, &embedding).await
    }

    /// The `k` chunks nearest to the embedding of `query`.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let embedding = self.model.generate_embeddings(query).await?;
        self.search_embedding(&embedding, k).await
    }

    pub async fn search_embedding(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        self.storage.find_similar(embedding, k).await
    }

    pub async fn len(&self) -> Result<usize> {
        self.storage.len().await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        self.storage.is_empty().await
    }
}
