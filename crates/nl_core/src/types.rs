use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::options::{Genre, TimeUnit, TimeWindow, Tone};
use crate::{Error, Result};

/// One hit returned by the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// Readable text extracted from one fetched URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    pub source_url: String,
    /// Position of the chunk within its source document.
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: ContentChunk,
    /// Lower is closer.
    pub distance: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawNewsletterRequest")]
pub struct NewsletterRequest {
    pub topic: String,
    pub window: TimeWindow,
    pub genre: Genre,
    pub tone: Tone,
}

#[derive(Deserialize)]
struct RawNewsletterRequest {
    topic: String,
    #[serde(default)]
    unit: TimeUnit,
    #[serde(default = "default_count")]
    count: u8,
    #[serde(default)]
    genre: Genre,
    #[serde(default)]
    tone: Tone,
}

fn default_count() -> u8 {
    1
}

impl TryFrom<RawNewsletterRequest> for NewsletterRequest {
    type Error = Error;

    fn try_from(raw: RawNewsletterRequest) -> Result<Self> {
        Ok(Self {
            topic: raw.topic,
            window: TimeWindow::new(raw.unit, raw.count)?,
            genre: raw.genre,
            tone: raw.tone,
        })
    }
}

impl NewsletterRequest {
    pub fn new(topic: impl Into<String>, window: TimeWindow, genre: Genre, tone: Tone) -> Self {
        Self {
            topic: topic.into(),
            window,
            genre,
            tone,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::InvalidInput("topic must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Everything a run produced, in the order it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterReport {
    pub run_id: Uuid,
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub search_results: Vec<SearchHit>,
    pub urls: Vec<String>,
    /// Top chunks for the topic, joined by a space.
    pub context: String,
    pub digest: String,
    pub newsletter: String,
}
