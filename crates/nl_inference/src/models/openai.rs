use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nl_core::{Config, Error, InferenceModel, ResponseSchema, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<JsonSchemaFormat<'a>>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Models that predate structured outputs reject `json_schema` with a 400.
fn supports_json_schema(model: &str) -> bool {
    !(model.starts_with("gpt-3.5") || model == "gpt-4" || model.starts_with("gpt-4-"))
}

/// Chat completions and embeddings against an OpenAI-compatible endpoint.
pub struct OpenAiModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        if config.openai_api_key.trim().is_empty() {
            return Err(Error::MissingCredential(
                nl_core::config::OPENAI_API_KEY_VAR.to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
        })
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response.json::<R>().await?)
    }

    async fn complete(&self, prompt: &str, schema: Option<&ResponseSchema>) -> Result<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            response_format: schema.map(|schema| {
                if supports_json_schema(&self.chat_model) {
                    ResponseFormat {
                        format_type: "json_schema",
                        json_schema: Some(JsonSchemaFormat {
                            name: &schema.name,
                            strict: true,
                            schema: &schema.schema,
                        }),
                    }
                } else {
                    // JSON mode only; the caller still validates the shape.
                    ResponseFormat {
                        format_type: "json_object",
                        json_schema: None,
                    }
                }
            }),
        };

        debug!(model = %self.chat_model, structured = schema.is_some(), "chat completion request");
        let response: ChatResponse = self.post("/chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Inference("No completion in OpenAI response".to_string()))
    }
}

#[async_trait]
impl InferenceModel for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt, None).await
    }

    async fn generate_structured(&self, prompt: &str, schema: &ResponseSchema) -> Result<String> {
        self.complete(prompt, Some(schema)).await
    }

    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text,
            model: &self.embedding_model,
        };

        let response: EmbeddingResponse = self.post("/embeddings", &request).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| Error::Inference("No embedding in OpenAI response".to_string()))
    }
}
