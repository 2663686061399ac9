use std::fmt;
use std::sync::Arc;

use nl_core::{Error, InferenceModel, ResponseSchema, Result, SearchHit};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::prompts;

pub const MIN_URLS: usize = 3;
pub const MAX_URLS: usize = 5;

/// Asks a model to pick the best articles out of a list of search hits.
pub struct ArticleSelector {
    model: Arc<dyn InferenceModel>,
}

impl fmt::Debug for ArticleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleSelector")
            .field("model", &self.model.name())
            .finish()
    }
}

impl ArticleSelector {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub fn schema() -> ResponseSchema {
        ResponseSchema::new(
            "url_list",
            json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "type": "array",
                        "items": { "type": "string" }
                    }
                },
                "required": ["urls"],
                "additionalProperties": false
            }),
        )
    }

    pub async fn select(&self, hits: &[SearchHit], topic: &str) -> Result<Vec<String>> {
        let results_json = serde_json::to_string(hits)?;
        let prompt = prompts::select_articles(&results_json, topic);
        let response = self
            .model
            .generate_structured(&prompt, &Self::schema())
            .await?;
        debug!(response = %response, "article selection response");
        parse_url_list(&response)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UrlListResponse {
    List(Vec<String>),
    Object { urls: Vec<String> },
}

/// Validates a selection response: JSON (optionally inside a Markdown code
/// fence), either `[...]` or `{"urls": [...]}`, holding 3 to 5 http(s) URLs.
pub fn parse_url_list(response: &str) -> Result<Vec<String>> {
    let body = strip_code_fence(response);
    let parsed: UrlListResponse = serde_json::from_str(body).map_err(|e| {
        Error::Parse(format!(
            "expected a JSON list of URLs, got {:?}: {}",
            truncate(body, 200),
            e
        ))
    })?;
    let raw = match parsed {
        UrlListResponse::List(urls) | UrlListResponse::Object { urls } => urls,
    };

    if !(MIN_URLS..=MAX_URLS).contains(&raw.len()) {
        return Err(Error::Parse(format!(
            "expected {} to {} URLs, got {}",
            MIN_URLS,
            MAX_URLS,
            raw.len()
        )));
    }

    raw.iter().map(|candidate| normalize_url(candidate)).collect()
}

fn normalize_url(candidate: &str) -> Result<String> {
    let candidate = candidate.trim();
    let with_scheme = if candidate.contains("://") {
        candidate.to_string()
    } else {
        // The prompt's own fallback is a bare host such as www.google.com.
        format!("https://{}", candidate)
    };
    let url = Url::parse(&with_scheme)
        .map_err(|e| Error::Parse(format!("{:?} is not a valid URL: {}", candidate, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::Parse(format!("{:?} is not an http(s) URL", candidate)));
    }
    Ok(url.to_string())
}

fn strip_code_fence(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyModel;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn test_parse_array() {
        let urls = parse_url_list(
            r#"["https://a.com/1", "https://b.com/2", "http://c.com/3"]"#,
        )
        .unwrap();
        assert_eq!(urls, vec!["https://a.com/1", "https://b.com/2", "http://c.com/3"]);
    }

    #[test]
    fn test_parse_object_in_code_fence() {
        let response = "```json\n{\"urls\": [\"https://a.com\", \"https://b.com\", \"https://c.com\", \"https://d.com\"]}\n```";
        let urls = parse_url_list(response).unwrap();
        assert_eq!(urls.len(), 4);
        assert_eq!(urls[0], "https://a.com/");
    }

    #[test]
    fn test_placeholder_host_gets_scheme() {
        let urls = parse_url_list(r#"["www.google.com", "https://b.com/x", "https://c.com/y"]"#).unwrap();
        assert_eq!(urls[0], "https://www.google.com/");
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = parse_url_list("Here are the best articles: https://a.com").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_wrong_count_is_rejected() {
        assert!(matches!(
            parse_url_list(r#"["https://a.com", "https://b.com"]"#),
            Err(Error::Parse(_))
        ));
        assert!(matches!(parse_url_list("[]"), Err(Error::Parse(_))));
        let six = r#"["https://a.com","https://b.com","https://c.com","https://d.com","https://e.com","https://f.com"]"#;
        assert!(matches!(parse_url_list(six), Err(Error::Parse(_))));
    }

    #[test]
    fn test_non_string_entries_are_rejected() {
        assert!(parse_url_list("[1, 2, 3]").is_err());
        assert!(parse_url_list(r#"["ftp://a.com/f", "https://b.com", "https://c.com"]"#).is_err());
    }

    #[derive(Debug, Default)]
    struct CapturingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InferenceModel for CapturingModel {
        fn name(&self) -> &str {
            "capturing"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            unreachable!("selection must use structured output")
        }

        async fn generate_structured(&self, prompt: &str, schema: &ResponseSchema) -> Result<String> {
            assert_eq!(schema.name, "url_list");
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(r#"{"urls":["https://a.com/1","https://b.com/2","https://c.com/3"]}"#.to_string())
        }

        async fn generate_embeddings(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![])
        }
    }

    fn hits() -> Vec<SearchHit> {
        (1..=3)
            .map(|i| SearchHit {
                title: format!("Article {}", i),
                url: format!("https://news{}.example/story", i),
                snippet: "snippet".to_string(),
                published: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_select_sends_results_and_topic() {
        let model = Arc::new(CapturingModel::default());
        let selector = ArticleSelector::new(model.clone());
        let urls = selector.select(&hits(), "quantum computing").await.unwrap();
        assert_eq!(urls.len(), 3);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("https://news2.example/story"));
        assert!(prompts[0].contains("query quantum computing"));
    }

    #[tokio::test]
    async fn test_select_with_dummy_model() {
        let selector = ArticleSelector::new(Arc::new(DummyModel::new()));
        let urls = selector.select(&hits(), "rust").await.unwrap();
        assert_eq!(urls[0], "https://news1.example/story");
    }
}
