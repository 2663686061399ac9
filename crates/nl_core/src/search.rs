use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::options::{Genre, TimeWindow};
use crate::types::SearchHit;
use crate::Result;

/// Hits requested per search.
pub const DEFAULT_RESULT_LIMIT: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub window: TimeWindow,
    pub genre: Genre,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, window: TimeWindow, genre: Genre) -> Self {
        Self {
            query: query.into(),
            window,
            genre,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns at most `request.limit` hits
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>>;
}
