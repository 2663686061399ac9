use std::fmt;

use async_trait::async_trait;
use nl_core::{InferenceModel, ResponseSchema, Result};
use serde_json::json;

const EMBEDDING_SIZE: usize = 768;
const SUMMARY_WORDS: usize = 20;
const MAX_URLS: usize = 5;

/// Offline model: echoes prompts, picks URLs it can see, and embeds text as a
/// character histogram. Deterministic, so runs are reproducible.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

fn urls_in(text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for token in text.split(|c: char| c.is_whitespace() || c == '"' || c == ',') {
        let token = token.trim_end_matches(['.', ')', ']', '}']);
        if (token.starts_with("http://") || token.starts_with("https://"))
            && !urls.iter().any(|u| u == token)
        {
            urls.push(token.to_string());
        }
        if urls.len() == MAX_URLS {
            break;
        }
    }
    urls
}

#[async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        // Take first 20 words and join them
        let words: Vec<&str> = prompt.split_whitespace().take(SUMMARY_WORDS).collect();
        Ok(words.join(" "))
    }

    async fn generate_structured(&self, prompt: &str, _schema: &ResponseSchema) -> Result<String> {
        Ok(json!({ "urls": urls_in(prompt) }).to_string())
    }

    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0; EMBEDDING_SIZE];

        let text_len = text.chars().count().max(1) as f32;
        embedding[0] = text_len / 1000.0;

        for c in text.chars().flat_map(char::to_lowercase) {
            let slot = 1 + (c as usize) % (EMBEDDING_SIZE - 1);
            embedding[slot] += 1.0 / text_len;
        }

        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_generate_truncates() {
        let model = DummyModel::new();
        let prompt = (0..50).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let text = model.generate(&prompt).await.unwrap();
        assert_eq!(text.split_whitespace().count(), SUMMARY_WORDS);
        assert!(text.starts_with("w0 w1"));
    }

    #[tokio::test]
    async fn test_dummy_structured_picks_visible_urls() {
        let model = DummyModel::new();
        let prompt = r#"[{"url":"https://a.example/1"},{"url":"https://b.example/2"},{"url":"https://a.example/1"}]"#;
        let schema = ResponseSchema::new("url_list", json!({}));
        let text = model.generate_structured(prompt, &schema).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["urls"], json!(["https://a.example/1", "https://b.example/2"]));
    }

    #[tokio::test]
    async fn test_dummy_embeddings_are_deterministic() {
        let model = DummyModel::new();
        let first = model.generate_embeddings("Test text").await.unwrap();
        let second = model.generate_embeddings("Test text").await.unwrap();
        assert_eq!(first.len(), EMBEDDING_SIZE);
        assert_eq!(first, second);
        assert!(first[0] > 0.0);
    }
}
