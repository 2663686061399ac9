use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nl_core::{Config, Error, Genre, Result, SearchHit, SearchProvider, SearchRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
    tbs: String,
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperHit>,
    #[serde(default)]
    news: Vec<SerperHit>,
}

#[derive(Deserialize)]
struct SerperHit {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    date: Option<String>,
}

impl From<SerperHit> for SearchHit {
    fn from(hit: SerperHit) -> Self {
        SearchHit {
            title: hit.title,
            url: hit.link,
            snippet: hit.snippet,
            published: hit.date,
        }
    }
}

/// Google results through serper.dev.
pub struct SerperClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for SerperClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SerperClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.serper_api_key.trim().is_empty() {
            return Err(Error::MissingCredential(
                nl_core::config::SERPER_API_KEY_VAR.to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key: config.serper_api_key.clone(),
            base_url: config.serper_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(genre: Genre) -> &'static str {
        match genre {
            Genre::News => "news",
            Genre::General => "search",
        }
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    fn name(&self) -> &str {
        "Serper"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let body = SerperRequest {
            q: &request.query,
            num: request.limit,
            tbs: request.window.filter(),
        };
        let url = format!("{}/{}", self.base_url, Self::endpoint(request.genre));
        debug!(url = %url, tbs = %body.tbs, "search request");

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Serper API error ({}): {}",
                status, error_text
            )));
        }

        let payload: SerperResponse = response.json().await?;
        let hits = match request.genre {
            Genre::News => payload.news,
            Genre::General => payload.organic,
        };
        Ok(hits
            .into_iter()
            .take(request.limit)
            .map(SearchHit::from)
            .collect())
    }
}
