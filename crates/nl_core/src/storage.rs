use async_trait::async_trait;
use crate::types::{ContentChunk, ScoredChunk};
use crate::Result;

#[async_trait]
pub trait ChunkStorage: Send + Sync {
    /// Store a chunk alongside its embedding
    async fn store_chunk(&self, chunk: &ContentChunk, embedding: &[f32]) -> Result<()>;

    /// Find the `limit` chunks closest to `embedding`, closest first
    async fn find_similar(&self, embedding: &[f32], limit: usize) -> Result<Vec<ScoredChunk>>;

    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
