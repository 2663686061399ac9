use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// JSON schema a model response is asked to conform to.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

impl ResponseSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Complete a single prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Complete a prompt whose answer must be JSON matching `schema`.
    ///
    /// Backends without native structured output fall back to a plain
    /// completion; callers still validate the text they get back.
    async fn generate_structured(&self, prompt: &str, _schema: &ResponseSchema) -> Result<String> {
        self.generate(prompt).await
    }

    /// Generate embeddings for a piece of text
    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>>;
}
