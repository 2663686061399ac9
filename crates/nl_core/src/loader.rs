use async_trait::async_trait;
use crate::types::Document;
use crate::Result;

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Fetch a URL and extract its readable text
    async fn load(&self, url: &str) -> Result<Document>;
}
