use std::fmt;
use std::sync::Arc;

use nl_core::{InferenceModel, Result};
use nl_storage::SimilarityIndex;
use tracing::debug;

use crate::prompts;

/// Chunks retrieved for the digest.
pub const DEFAULT_TOP_K: usize = 2;

pub struct Summarizer {
    model: Arc<dyn InferenceModel>,
    top_k: usize,
}

impl fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.model.name())
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl Summarizer {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self {
            model,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Digest of the chunks most relevant to `topic`, with newlines removed.
    pub async fn summarize(&self, index: &SimilarityIndex, topic: &str) -> Result<String> {
        let hits = index.search(topic, self.top_k).await?;
        let docs = hits
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(chunks = hits.len(), chars = docs.len(), "summarizing retrieved chunks");

        let response = self.model.generate(&prompts::summarize(&docs, topic)).await?;
        Ok(response.replace('\n', ""))
    }
}
