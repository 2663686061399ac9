use std::sync::Arc;

use async_trait::async_trait;
use nl_core::{ChunkStorage, ContentChunk, Error, Result, ScoredChunk};
use tokio::sync::RwLock;

use crate::DistanceMetric;

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryConfig {
    pub metric: DistanceMetric,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(metric: DistanceMetric) -> Self {
        Self { metric }
    }
}

/// Brute-force store: every query is compared against every stored vector.
pub struct MemoryStore {
    metric: DistanceMetric,
    /// Width of the first stored embedding; later ones must match.
    vector_size: Option<usize>,
    chunks: Vec<(ContentChunk, Vec<f32>)>,
}

impl MemoryStore {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            vector_size: None,
            chunks: Vec::new(),
        }
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        match self.vector_size {
            Some(size) if size != embedding.len() => Err(Error::Storage(format!(
                "embedding has {} dimensions, index expects {}",
                embedding.len(),
                size
            ))),
            _ => Ok(()),
        }
    }

    pub fn store_chunk(&mut self, chunk: &ContentChunk, embedding: &[f32]) -> Result<()> {
        if embedding.is_empty() {
            return Err(Error::Storage("refusing to store an empty embedding".to_string()));
        }
        self.check_dimension(embedding)?;
        self.vector_size.get_or_insert(embedding.len());
        self.chunks.push((chunk.clone(), embedding.to_vec()));
        Ok(())
    }

    pub fn find_similar(&self, embedding: &[f32], limit: usize) -> Result<Vec<ScoredChunk>> {
        if self.chunks.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        self.check_dimension(embedding)?;

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|(chunk, stored)| ScoredChunk {
                chunk: chunk.clone(),
                distance: self.metric.distance(embedding, stored),
            })
            .collect();
        // Stable sort keeps insertion order among equal distances.
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(limit);
        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(config.metric))),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(MemoryConfig::new())
    }
}

#[async_trait]
impl ChunkStorage for MemoryStorage {
    async fn store_chunk(&self, chunk: &ContentChunk, embedding: &[f32]) -> Result<()> {
        let mut store = self.store.write().await;
        store.store_chunk(chunk, embedding)
    }

    async fn find_similar(&self, embedding: &[f32], limit: usize) -> Result<Vec<ScoredChunk>> {
        let store = self.store.read().await;
        store.find_similar(embedding, limit)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.store.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> ContentChunk {
        ContentChunk {
            source_url: "https://example.com/a".to_string(),
            index,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage_orders_by_distance() {
        let storage = MemoryStorage::default();
        storage.store_chunk(&chunk(0, "far"), &[10.0, 10.0]).await.unwrap();
        storage.store_chunk(&chunk(1, "near"), &[1.0, 1.0]).await.unwrap();
        storage.store_chunk(&chunk(2, "middle"), &[4.0, 4.0]).await.unwrap();

        let similar = storage.find_similar(&[0.0, 0.0], 2).await.unwrap();
        let texts: Vec<_> = similar.iter().map(|s| s.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["near", "middle"]);
        assert!(similar[0].distance <= similar[1].distance);
        assert_eq!(storage.len().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_limit_larger_than_store() {
        let storage = MemoryStorage::default();
        storage.store_chunk(&chunk(0, "only"), &[1.0, 0.0]).await.unwrap();
        let similar = storage.find_similar(&[1.0, 0.0], 4).await.unwrap();
        assert_eq!(similar.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_store_returns_nothing() {
        let storage = MemoryStorage::default();
        assert!(storage.is_empty().await.unwrap());
        assert!(storage.find_similar(&[1.0], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let storage = MemoryStorage::default();
        storage.store_chunk(&chunk(0, "a"), &[1.0, 0.0, 0.0]).await.unwrap();
        assert!(storage.store_chunk(&chunk(1, "b"), &[1.0, 0.0]).await.is_err());
        assert!(storage.find_similar(&[1.0, 0.0], 1).await.is_err());
    }

    #[tokio::test]
    async fn test_cosine_metric_ignores_magnitude() {
        let storage = MemoryStorage::new(MemoryConfig::with_metric(DistanceMetric::Cosine));
        storage.store_chunk(&chunk(0, "same direction"), &[100.0, 0.0]).await.unwrap();
        storage.store_chunk(&chunk(1, "orthogonal"), &[0.0, 1.0]).await.unwrap();
        let similar = storage.find_similar(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(similar[0].chunk.text, "same direction");
    }
}
